//! Capacidade de publicação (cliente de ingestão).
//!
//! O transporte, autenticação e política de reenvio ficam com quem
//! implementa o trait. O loop só conhece `connect` e `publish`.

/// Erros de publicação.
#[derive(Debug, thiserror::Error)]
pub enum PublishError {
    #[error("Falha de conexão: {0}")]
    Connect(String),

    #[error("Falha ao enviar mensagem: {0}")]
    Send(String),

    #[error("Mensagem muito grande ({0} bytes)")]
    TooLarge(usize),
}

/// Cliente de ingestão que transporta mensagens serializadas.
pub trait Publisher {
    /// Estabelece a conexão. Chamado uma vez antes do loop.
    fn connect(&mut self) -> Result<(), PublishError>;

    /// Envia uma mensagem. Bloqueia até o envio terminar.
    fn publish(&mut self, message: &str) -> Result<(), PublishError>;
}

impl<P: Publisher + ?Sized> Publisher for Box<P> {
    fn connect(&mut self) -> Result<(), PublishError> {
        (**self).connect()
    }

    fn publish(&mut self, message: &str) -> Result<(), PublishError> {
        (**self).publish(message)
    }
}

/// Publisher em memória: guarda as mensagens enviadas.
///
/// Útil para testes e simulações sem rede.
#[derive(Debug, Default)]
pub struct MemoryPublisher {
    connected: bool,
    messages: Vec<String>,
    fail_connect: bool,
    fail_after: Option<usize>,
}

impl MemoryPublisher {
    pub fn new() -> Self {
        Self::default()
    }

    /// `connect` sempre falha.
    pub fn refusing_connection() -> Self {
        Self {
            fail_connect: true,
            ..Self::default()
        }
    }

    /// Aceita `count` mensagens e falha na seguinte.
    pub fn failing_after(count: usize) -> Self {
        Self {
            fail_after: Some(count),
            ..Self::default()
        }
    }

    pub fn messages(&self) -> &[String] {
        &self.messages
    }
}

impl Publisher for MemoryPublisher {
    fn connect(&mut self) -> Result<(), PublishError> {
        if self.fail_connect {
            return Err(PublishError::Connect("conexão recusada".into()));
        }
        self.connected = true;
        Ok(())
    }

    fn publish(&mut self, message: &str) -> Result<(), PublishError> {
        if !self.connected {
            return Err(PublishError::Send("não conectado".into()));
        }
        if self.fail_after.is_some_and(|n| self.messages.len() >= n) {
            return Err(PublishError::Send("hub indisponível".into()));
        }
        self.messages.push(message.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn publish_requires_connect() {
        let mut p = MemoryPublisher::new();
        assert!(matches!(p.publish("{}"), Err(PublishError::Send(_))));
        p.connect().unwrap();
        p.publish("{}").unwrap();
        assert_eq!(p.messages(), ["{}"]);
    }

    #[test]
    fn boxed_publisher_delegates() {
        let mut p: Box<dyn Publisher> = Box::new(MemoryPublisher::refusing_connection());
        assert!(matches!(p.connect(), Err(PublishError::Connect(_))));
    }

    #[test]
    fn failing_after_limit() {
        let mut p = MemoryPublisher::failing_after(1);
        p.connect().unwrap();
        p.publish("a").unwrap();
        assert!(p.publish("b").is_err());
        assert_eq!(p.messages().len(), 1);
    }
}
