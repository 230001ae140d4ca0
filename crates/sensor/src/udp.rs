//! Publisher UDP – envia cada mensagem JSON como um datagrama.
//!
//! Unicast para `dest_ip:port` ou broadcast na rede local.

use rink_core::config::PublisherConfig;
use rink_core::protocol::MAX_DATAGRAM_PAYLOAD;
use rink_core::publish::{PublishError, Publisher};
use std::net::{SocketAddr, ToSocketAddrs, UdpSocket};
use tracing::{debug, info};

/// Cliente de ingestão via UDP.
pub struct UdpPublisher {
    bind_addr: String,
    dest_addr: String,
    broadcast: bool,
    sock: Option<UdpSocket>,
}

impl UdpPublisher {
    pub fn new(cfg: &PublisherConfig) -> Self {
        let bind_addr = if cfg.bind_ip.is_empty() {
            "0.0.0.0:0".to_string()
        } else {
            format!("{}:0", cfg.bind_ip)
        };

        Self {
            bind_addr,
            dest_addr: format!("{}:{}", cfg.dest_ip, cfg.port),
            broadcast: cfg.mode == "broadcast" || cfg.dest_ip == "255.255.255.255",
            sock: None,
        }
    }

    fn resolve_dest(&self) -> Result<SocketAddr, PublishError> {
        self.dest_addr
            .to_socket_addrs()
            .map_err(|e| PublishError::Connect(format!("destino {}: {e}", self.dest_addr)))?
            .next()
            .ok_or_else(|| PublishError::Connect(format!("destino {} sem endereço", self.dest_addr)))
    }
}

impl Publisher for UdpPublisher {
    fn connect(&mut self) -> Result<(), PublishError> {
        let sock = UdpSocket::bind(&self.bind_addr)
            .map_err(|e| PublishError::Connect(format!("bind {}: {e}", self.bind_addr)))?;

        if self.broadcast {
            sock.set_broadcast(true)
                .map_err(|e| PublishError::Connect(format!("broadcast: {e}")))?;
            info!("Modo BROADCAST ativado");
        } else {
            info!("Modo UNICAST → {}", self.dest_addr);
        }

        let dest = self.resolve_dest()?;
        sock.connect(dest)
            .map_err(|e| PublishError::Connect(format!("{dest}: {e}")))?;

        self.sock = Some(sock);
        Ok(())
    }

    fn publish(&mut self, message: &str) -> Result<(), PublishError> {
        let Some(sock) = &self.sock else {
            return Err(PublishError::Send("socket não conectado".into()));
        };
        if message.len() > MAX_DATAGRAM_PAYLOAD {
            return Err(PublishError::TooLarge(message.len()));
        }

        let sent = sock
            .send(message.as_bytes())
            .map_err(|e| PublishError::Send(format!("UDP para {}: {e}", self.dest_addr)))?;
        debug!("→ {sent} bytes para {}", self.dest_addr);
        Ok(())
    }
}
