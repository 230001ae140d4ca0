//! Publisher de console – imprime cada mensagem (dry run, sem rede).

use rink_core::publish::{PublishError, Publisher};
use std::io::Write;

/// Escreve uma mensagem por linha no writer dado (stdout por padrão).
pub struct ConsolePublisher<W: Write = std::io::Stdout> {
    out: W,
}

impl ConsolePublisher {
    pub fn stdout() -> Self {
        Self::with_writer(std::io::stdout())
    }
}

impl<W: Write> ConsolePublisher<W> {
    pub fn with_writer(out: W) -> Self {
        Self { out }
    }

    #[cfg(test)]
    pub fn get_ref(&self) -> &W {
        &self.out
    }
}

impl<W: Write> Publisher for ConsolePublisher<W> {
    fn connect(&mut self) -> Result<(), PublishError> {
        Ok(())
    }

    fn publish(&mut self, message: &str) -> Result<(), PublishError> {
        writeln!(self.out, "{message}")
            .and_then(|_| self.out.flush())
            .map_err(|e| PublishError::Send(e.to_string()))
    }
}
