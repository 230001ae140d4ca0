//! # Rink Core
//!
//! Crate compartilhada do sensor simulado de condições do gelo: modelo da
//! leitura, gerador aleatório, protocolo JSON, relógio injetável, trait de
//! publicação e o loop periódico.
//!
//! ## Módulos
//! - [`types`] – [`Reading`] e faixas válidas
//! - [`generator`] – Sorteio de leituras
//! - [`protocol`] – Encode/decode JSON
//! - [`clock`] – Relógio do sistema e relógio manual
//! - [`publish`] – Trait do cliente de ingestão
//! - [`runner`] – Loop gera → serializa → publica → dorme
//! - [`config`] – Configuração unificada via TOML

pub mod types;
pub mod generator;
pub mod protocol;
pub mod clock;
pub mod publish;
pub mod runner;
pub mod config;

// Re-exports convenientes
pub use types::Reading;
pub use generator::ReadingGenerator;
pub use protocol::{encode_message, decode_message};
pub use clock::{Clock, SystemClock, ManualClock};
pub use publish::{Publisher, PublishError};
pub use runner::{TelemetryLoop, LoopState, LoopError};
pub use config::{AppConfig, SensorConfig, PublisherConfig};
