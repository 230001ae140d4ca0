//! Publisher HTTP – POST do JSON para o endpoint de ingestão.
//!
//! A credencial é opaca: vai como está no header `Authorization`.

use reqwest::blocking::Client;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use rink_core::config::{Credential, PublisherConfig};
use rink_core::publish::{PublishError, Publisher};
use std::time::Duration;
use tracing::debug;

/// Cliente de ingestão via HTTP(S).
pub struct HttpPublisher {
    endpoint: String,
    credential: Credential,
    timeout_secs: f64,
    client: Option<Client>,
}

impl HttpPublisher {
    pub fn new(cfg: &PublisherConfig) -> Self {
        Self {
            endpoint: cfg.endpoint.clone(),
            credential: cfg.connection_string.clone(),
            timeout_secs: cfg.request_timeout_secs,
            client: None,
        }
    }
}

impl Publisher for HttpPublisher {
    fn connect(&mut self) -> Result<(), PublishError> {
        let url = reqwest::Url::parse(&self.endpoint)
            .map_err(|e| PublishError::Connect(format!("endpoint {:?}: {e}", self.endpoint)))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(PublishError::Connect(format!(
                "esquema não suportado: {}",
                url.scheme()
            )));
        }

        let timeout = Duration::try_from_secs_f64(self.timeout_secs).map_err(|e| {
            PublishError::Connect(format!("timeout inválido {}: {e}", self.timeout_secs))
        })?;

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| PublishError::Connect(e.to_string()))?;

        self.client = Some(client);
        Ok(())
    }

    fn publish(&mut self, message: &str) -> Result<(), PublishError> {
        let Some(client) = &self.client else {
            return Err(PublishError::Send("cliente HTTP não inicializado".into()));
        };

        let mut request = client
            .post(&self.endpoint)
            .header(CONTENT_TYPE, "application/json")
            .body(message.to_string());
        if !self.credential.is_empty() {
            request = request.header(AUTHORIZATION, self.credential.expose());
        }

        let response = request
            .send()
            .map_err(|e| PublishError::Send(e.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            return Err(PublishError::Send(format!("HTTP {status}")));
        }

        debug!("→ {} bytes para {} ({status})", message.len(), self.endpoint);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{BufRead, BufReader, Read, Write};
    use std::net::TcpListener;
    use std::thread;

    /// Servidor de uma requisição: devolve (headers, body) recebidos.
    fn one_shot_server(status_line: &'static str) -> (String, thread::JoinHandle<(String, String)>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let url = format!("http://{}/ingest", listener.local_addr().unwrap());

        let handle = thread::spawn(move || {
            let (stream, _) = listener.accept().unwrap();
            let mut reader = BufReader::new(stream.try_clone().unwrap());

            let mut headers = String::new();
            let mut content_length = 0usize;
            loop {
                let mut line = String::new();
                reader.read_line(&mut line).unwrap();
                if line == "\r\n" || line.is_empty() {
                    break;
                }
                if let Some(v) = line.to_ascii_lowercase().strip_prefix("content-length:") {
                    content_length = v.trim().parse().unwrap();
                }
                headers.push_str(&line);
            }

            let mut body = vec![0u8; content_length];
            reader.read_exact(&mut body).unwrap();

            let mut stream = stream;
            write!(
                stream,
                "{status_line}\r\ncontent-length: 0\r\nconnection: close\r\n\r\n"
            )
            .unwrap();
            stream.flush().unwrap();

            (headers, String::from_utf8(body).unwrap())
        });

        (url, handle)
    }

    fn config(endpoint: &str, credential: &str) -> PublisherConfig {
        PublisherConfig {
            mode: "http".into(),
            endpoint: endpoint.into(),
            connection_string: Credential::new(credential),
            request_timeout_secs: 5.0,
            ..Default::default()
        }
    }

    #[test]
    fn posts_json_with_authorization() {
        let (url, server) = one_shot_server("HTTP/1.1 204 No Content");
        let mut publisher = HttpPublisher::new(&config(&url, "SharedAccessSignature sr=x"));
        publisher.connect().unwrap();

        let message = r#"{"location":"Dow's Lake","iceThickness":31}"#;
        publisher.publish(message).unwrap();

        let (headers, body) = server.join().unwrap();
        let headers = headers.to_ascii_lowercase();
        assert!(headers.starts_with("post /ingest"));
        assert!(headers.contains("content-type: application/json"));
        assert!(headers.contains("authorization: sharedaccesssignature sr=x"));
        assert_eq!(body, message);
    }

    #[test]
    fn error_status_is_send_failure() {
        let (url, server) = one_shot_server("HTTP/1.1 503 Service Unavailable");
        let mut publisher = HttpPublisher::new(&config(&url, ""));
        publisher.connect().unwrap();

        let err = publisher.publish("{}").unwrap_err();
        assert!(matches!(err, PublishError::Send(ref m) if m.contains("503")));

        let (headers, _) = server.join().unwrap();
        assert!(!headers.to_ascii_lowercase().contains("authorization"));
    }

    #[test]
    fn invalid_endpoint_fails_connect() {
        let mut publisher = HttpPublisher::new(&config("not a url", ""));
        assert!(matches!(publisher.connect(), Err(PublishError::Connect(_))));

        let mut publisher = HttpPublisher::new(&config("ftp://example.com/x", ""));
        assert!(matches!(publisher.connect(), Err(PublishError::Connect(_))));
    }

    #[test]
    fn unrepresentable_timeout_fails_connect() {
        for bad in [f64::INFINITY, f64::NAN, 1e30, -1.0] {
            let mut cfg = config("http://127.0.0.1:9/", "");
            cfg.request_timeout_secs = bad;
            let mut publisher = HttpPublisher::new(&cfg);
            assert!(
                matches!(publisher.connect(), Err(PublishError::Connect(_))),
                "timeout {bad}"
            );
        }
    }

    #[test]
    fn publish_before_connect_fails() {
        let mut publisher = HttpPublisher::new(&config("http://127.0.0.1:9/", ""));
        assert!(matches!(publisher.publish("{}"), Err(PublishError::Send(_))));
    }
}
