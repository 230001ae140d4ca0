//! Protocolo de mensagem – JSON compacto.
//!
//! Formato do corpo da mensagem (ordem das chaves fixa):
//!
//! ```text
//! {"location":"NAC","iceThickness":27,"surfaceTemperature":-3.4,
//!  "snowAccumulation":5,"externalTemperature":1.2,
//!  "timestamp":"2026-01-15T12:00:00.000000Z"}
//! ```
//!
//! Consumidores downstream dependem dos nomes e da ordem das chaves.

use crate::types::{Reading, ReadingError};

/// Tamanho máximo de pacote UDP seguro (sem fragmentação).
pub const MAX_DATAGRAM_PAYLOAD: usize = 65507;

/// Erros do protocolo.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    #[error("Erro de serialização: {0}")]
    Serialize(String),

    #[error("Erro de deserialização: {0}")]
    Deserialize(String),

    #[error("Leitura inválida: {0}")]
    Invalid(#[from] ReadingError),
}

/// Serializa uma [`Reading`] para o corpo JSON da mensagem.
pub fn encode_message(reading: &Reading) -> Result<String, ProtocolError> {
    serde_json::to_string(reading).map_err(|e| ProtocolError::Serialize(e.to_string()))
}

/// Decodifica o corpo JSON em [`Reading`].
///
/// Rejeita chaves desconhecidas, valores fora das faixas e temperaturas
/// com mais de uma casa decimal.
pub fn decode_message(data: &str) -> Result<Reading, ProtocolError> {
    let reading: Reading =
        serde_json::from_str(data).map_err(|e| ProtocolError::Deserialize(e.to_string()))?;
    reading.check()?;
    Ok(reading)
}

// ──────────────────────────────────────────────
// Testes
// ──────────────────────────────────────────────
