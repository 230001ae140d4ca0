//! Loop de telemetria: gera → serializa → publica → dorme.
//!
//! Uma única tarefa, sem estado compartilhado entre iterações. A única
//! suspensão é o sleep do intervalo. Falhas de publicação não são
//! reenviadas: o erro sobe para quem supervisiona o processo.

use crate::clock::Clock;
use crate::generator::ReadingGenerator;
use crate::protocol::{ProtocolError, encode_message};
use crate::publish::{PublishError, Publisher};
use crate::types::Reading;
use rand::Rng;
use std::convert::Infallible;
use std::time::Duration;
use tracing::{debug, info};

/// Estado do loop. Não há estado terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    /// Antes da primeira publicação bem-sucedida.
    Connecting,
    /// Regime permanente.
    Running,
}

/// Erros do loop.
#[derive(Debug, thiserror::Error)]
pub enum LoopError {
    #[error("Não foi possível conectar ao hub: {0}")]
    Connect(#[source] PublishError),

    #[error("Falha ao publicar leitura: {0}")]
    Publish(#[source] PublishError),

    #[error(transparent)]
    Protocol(#[from] ProtocolError),
}

/// Loop periódico de leituras sintéticas.
pub struct TelemetryLoop<P, C, R> {
    generator: ReadingGenerator,
    publisher: P,
    clock: C,
    rng: R,
    interval: Duration,
    state: LoopState,
    sent: u64,
}

impl<P, C, R> TelemetryLoop<P, C, R>
where
    P: Publisher,
    C: Clock,
    R: Rng,
{
    pub fn new(
        generator: ReadingGenerator,
        publisher: P,
        clock: C,
        rng: R,
        interval: Duration,
    ) -> Self {
        Self {
            generator,
            publisher,
            clock,
            rng,
            interval,
            state: LoopState::Connecting,
            sent: 0,
        }
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    /// Mensagens publicadas até agora.
    pub fn sent(&self) -> u64 {
        self.sent
    }

    pub fn publisher(&self) -> &P {
        &self.publisher
    }

    /// Conecta o publisher. Falha aqui é fatal: o loop não deve começar.
    pub fn connect(&mut self) -> Result<(), LoopError> {
        self.publisher.connect().map_err(LoopError::Connect)?;
        info!("Conectado ao hub de ingestão");
        Ok(())
    }

    /// Um tick: gera, serializa e publica uma leitura.
    pub fn tick(&mut self) -> Result<Reading, LoopError> {
        let reading = self.generator.generate(&mut self.rng, self.clock.utc_now());
        let message = encode_message(&reading)?;

        self.publisher
            .publish(&message)
            .map_err(LoopError::Publish)?;

        if self.state == LoopState::Connecting {
            debug!("Primeira leitura publicada, loop em regime");
            self.state = LoopState::Running;
        }
        self.sent += 1;
        info!("Sent: {message}");

        Ok(reading)
    }

    /// Executa `count` ticks, dormindo o intervalo entre eles.
    pub fn run_ticks(&mut self, count: u64) -> Result<(), LoopError> {
        for i in 0..count {
            let cycle_start = self.clock.monotonic();
            self.tick()?;
            if i + 1 < count {
                self.sleep_rest(cycle_start);
            }
        }
        Ok(())
    }

    /// Executa para sempre. Só retorna com o primeiro erro.
    pub fn run(&mut self) -> Result<Infallible, LoopError> {
        loop {
            let cycle_start = self.clock.monotonic();
            self.tick()?;
            self.sleep_rest(cycle_start);
        }
    }

    // Dormir pelo tempo restante do intervalo
    fn sleep_rest(&self, cycle_start: Duration) {
        let elapsed = self.clock.monotonic().saturating_sub(cycle_start);
        if elapsed < self.interval {
            self.clock.sleep(self.interval - elapsed);
        }
    }
}

// ──────────────────────────────────────────────
// Testes
// ──────────────────────────────────────────────
