//! Configuração unificada via TOML.
//!
//! Um único `config.toml` ao lado do executável. A credencial de conexão
//! nunca é fixa no código: vem do arquivo ou de `RINK_CONNECTION_STRING`.

use crate::types::DEFAULT_LOCATIONS;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, warn};

/// Variável de ambiente que sobrescreve a credencial do arquivo.
pub const CONNECTION_STRING_ENV: &str = "RINK_CONNECTION_STRING";

/// Modos de publicação aceitos.
pub const PUBLISH_MODES: [&str; 4] = ["udp", "broadcast", "http", "console"];

/// Credencial opaca do cliente de ingestão. Nunca aparece em logs.
#[derive(Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Credential(String);

impl Credential {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            f.write_str("Credential(<vazia>)")
        } else {
            f.write_str("Credential(<oculta>)")
        }
    }
}

/// Configuração do sensor simulado.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SensorConfig {
    /// Identificador do dispositivo (apenas para logs)
    pub device_id: String,
    /// Intervalo entre leituras em segundos
    pub interval_secs: f64,
    /// Locais sorteados nas leituras
    pub locations: Vec<String>,
}

impl Default for SensorConfig {
    fn default() -> Self {
        Self {
            device_id: "sensor1".into(),
            interval_secs: 10.0,
            locations: DEFAULT_LOCATIONS.iter().map(|l| l.to_string()).collect(),
        }
    }
}

impl SensorConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_secs_f64(self.interval_secs)
    }
}

/// Configuração do cliente de ingestão.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PublisherConfig {
    /// Modo: "udp", "broadcast", "http" ou "console"
    pub mode: String,
    /// IP de destino (UDP)
    pub dest_ip: String,
    /// Porta UDP
    pub port: u16,
    /// IP local para bind (vazio = auto)
    pub bind_ip: String,
    /// URL do endpoint de ingestão (HTTP)
    pub endpoint: String,
    /// Credencial opaca, repassada ao transporte
    pub connection_string: Credential,
    /// Timeout de requisição HTTP (segundos)
    pub request_timeout_secs: f64,
}

impl Default for PublisherConfig {
    fn default() -> Self {
        Self {
            mode: "udp".into(),
            dest_ip: "127.0.0.1".into(),
            port: 5005,
            bind_ip: String::new(),
            endpoint: String::new(),
            connection_string: Credential::default(),
            request_timeout_secs: 10.0,
        }
    }
}

/// Configuração raiz do aplicativo.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub sensor: SensorConfig,
    pub publisher: PublisherConfig,
}

impl AppConfig {
    /// Carrega configuração de um arquivo TOML.
    pub fn load(path: &Path) -> Self {
        if path.exists() {
            match std::fs::read_to_string(path) {
                Ok(content) => match toml::from_str::<AppConfig>(&content) {
                    Ok(config) => {
                        info!("Configuração carregada de {}", path.display());
                        return config;
                    }
                    Err(e) => {
                        warn!("Erro ao parsear {}: {}", path.display(), e);
                    }
                },
                Err(e) => {
                    warn!("Erro ao ler {}: {}", path.display(), e);
                }
            }
        }

        info!("Usando configuração padrão");
        AppConfig::default()
    }

    /// Salva configuração em arquivo TOML.
    pub fn save(&self, path: &Path) -> Result<(), String> {
        let content = toml::to_string_pretty(self).map_err(|e| e.to_string())?;
        std::fs::write(path, content).map_err(|e| e.to_string())?;
        info!("Configuração salva em {}", path.display());
        Ok(())
    }

    /// Retorna o caminho padrão do config.toml.
    pub fn default_path() -> PathBuf {
        let exe_dir = std::env::current_exe()
            .map(|p| p.parent().unwrap_or(Path::new(".")).to_path_buf())
            .unwrap_or_else(|_| PathBuf::from("."));
        exe_dir.join("config.toml")
    }

    /// Aplica `RINK_CONNECTION_STRING`, se definida.
    pub fn with_env_overrides(self) -> Self {
        self.with_connection_string(std::env::var(CONNECTION_STRING_ENV).ok())
    }

    /// Substitui a credencial quando `value` não é vazio.
    pub fn with_connection_string(mut self, value: Option<String>) -> Self {
        if let Some(v) = value.filter(|v| !v.is_empty()) {
            info!("Credencial lida de {CONNECTION_STRING_ENV}");
            self.publisher.connection_string = Credential::new(v);
        }
        self
    }

    /// Valida a configuração e retorna lista de erros.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if !(0.1..=3600.0).contains(&self.sensor.interval_secs) {
            errors.push(format!(
                "Intervalo do sensor inválido: {} (0.1–3600.0)",
                self.sensor.interval_secs
            ));
        }
        if self.sensor.locations.is_empty() {
            errors.push("Lista de locais não pode ser vazia".into());
        }
        if self.sensor.locations.iter().any(|l| l.trim().is_empty()) {
            errors.push("Nome de local em branco".into());
        }

        let mode = self.publisher.mode.as_str();
        if !PUBLISH_MODES.contains(&mode) {
            errors.push(format!(
                "Modo de publicação desconhecido: {mode:?} (use {})",
                PUBLISH_MODES.join(", ")
            ));
        }
        if matches!(mode, "udp" | "broadcast") && self.publisher.port == 0 {
            errors.push("Porta do publisher não pode ser 0".into());
        }
        if mode == "http" {
            if self.publisher.endpoint.trim().is_empty() {
                errors.push("Endpoint HTTP não configurado".into());
            }
            if !(0.1..=3600.0).contains(&self.publisher.request_timeout_secs) {
                errors.push(format!(
                    "Timeout HTTP inválido: {} (0.1–3600.0)",
                    self.publisher.request_timeout_secs
                ));
            }
        }

        errors
    }
}
