//! # Rink Sensor
//!
//! Sensor simulado de condições do gelo. A cada intervalo gera uma leitura
//! sintética e publica o JSON no cliente de ingestão configurado.
//! Roda até ser encerrado por sinal; qualquer falha de conexão ou envio
//! encerra o processo com código 1 para o supervisor reiniciar.
//!
//! ## Uso
//! ```bash
//! RINK_CONNECTION_STRING="..." rink_sensor   # lê config.toml ao lado do executável
//! RUST_LOG=debug rink_sensor                   # logs detalhados
//! ```

mod console;
mod http;
mod udp;

use console::ConsolePublisher;
use http::HttpPublisher;
use rink_core::clock::SystemClock;
use rink_core::config::{AppConfig, PublisherConfig};
use rink_core::generator::ReadingGenerator;
use rink_core::publish::Publisher;
use rink_core::runner::TelemetryLoop;
use std::process::ExitCode;
use tracing::{error, info, warn};
use udp::UdpPublisher;

fn main() -> ExitCode {
    // ── Logging ──
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    // ── Carregar config ──
    let config_path = AppConfig::default_path();
    let config = AppConfig::load(&config_path).with_env_overrides();

    // Salva config padrão se não existir
    if !config_path.exists() {
        if let Err(e) = config.save(&config_path) {
            warn!("Não foi possível salvar config padrão: {e}");
        }
    }

    let errors = config.validate();
    if !errors.is_empty() {
        for e in &errors {
            error!("Config inválida: {e}");
        }
        return ExitCode::FAILURE;
    }

    let sensor_cfg = &config.sensor;
    let generator = match ReadingGenerator::new(sensor_cfg.locations.iter().cloned()) {
        Ok(g) => g,
        Err(e) => {
            error!("Config inválida: {e}");
            return ExitCode::FAILURE;
        }
    };

    let Some(publisher) = build_publisher(&config.publisher) else {
        error!("Modo de publicação desconhecido: {}", config.publisher.mode);
        return ExitCode::FAILURE;
    };

    let mut telemetry = TelemetryLoop::new(
        generator,
        publisher,
        SystemClock::new(),
        rand::rng(),
        sensor_cfg.interval(),
    );

    // ── Conexão (fatal se falhar) ──
    if let Err(e) = telemetry.connect() {
        error!("{e}");
        return ExitCode::FAILURE;
    }

    // ── Banner ──
    println!();
    println!("══════════════════════════════════════════════");
    println!("   ❄ RINK SENSOR – ATIVO ({})", sensor_cfg.device_id);
    println!("══════════════════════════════════════════════");
    println!("  Destino:   {}", describe_destination(&config.publisher));
    println!("  Intervalo: {:.1}s", sensor_cfg.interval_secs);
    println!("  Locais:    {}", sensor_cfg.locations.join(", "));
    println!("══════════════════════════════════════════════");
    println!();

    // ── Loop principal ──
    match telemetry.run() {
        Ok(never) => match never {},
        Err(e) => {
            error!("{e}");
            info!("Encerrando após {} leituras enviadas", telemetry.sent());
            ExitCode::FAILURE
        }
    }
}

/// Cria o publisher correspondente ao modo configurado.
fn build_publisher(cfg: &PublisherConfig) -> Option<Box<dyn Publisher>> {
    match cfg.mode.as_str() {
        "udp" | "broadcast" => Some(Box::new(UdpPublisher::new(cfg))),
        "http" => Some(Box::new(HttpPublisher::new(cfg))),
        "console" => Some(Box::new(ConsolePublisher::stdout())),
        _ => None,
    }
}

fn describe_destination(cfg: &PublisherConfig) -> String {
    match cfg.mode.as_str() {
        "http" => cfg.endpoint.clone(),
        "console" => "stdout".into(),
        mode => format!("{}:{} ({mode})", cfg.dest_ip, cfg.port),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use rink_core::clock::{Clock, ManualClock};
    use rink_core::protocol::decode_message;
    use rink_core::runner::LoopState;
    use std::time::Duration;

    #[test]
    fn every_mode_builds_a_publisher() {
        for mode in rink_core::config::PUBLISH_MODES {
            let cfg = PublisherConfig {
                mode: mode.into(),
                ..Default::default()
            };
            assert!(build_publisher(&cfg).is_some(), "modo {mode}");
        }

        let cfg = PublisherConfig {
            mode: "mqtt".into(),
            ..Default::default()
        };
        assert!(build_publisher(&cfg).is_none());
    }

    #[test]
    fn destination_description() {
        let mut cfg = PublisherConfig::default();
        assert_eq!(describe_destination(&cfg), "127.0.0.1:5005 (udp)");
        cfg.mode = "http".into();
        cfg.endpoint = "https://hub.example/ingest".into();
        assert_eq!(describe_destination(&cfg), "https://hub.example/ingest");
    }

    #[test]
    fn console_pipeline_emits_valid_lines() {
        let clock = ManualClock::new(Utc.with_ymd_and_hms(2026, 2, 10, 6, 0, 0).unwrap());
        let mut telemetry = TelemetryLoop::new(
            ReadingGenerator::default(),
            ConsolePublisher::with_writer(Vec::new()),
            &clock,
            StdRng::seed_from_u64(17),
            Duration::from_secs(10),
        );
        telemetry.connect().unwrap();
        telemetry.run_ticks(3).unwrap();
        assert_eq!(telemetry.state(), LoopState::Running);
        assert_eq!(clock.monotonic(), Duration::from_secs(20));

        let out = std::str::from_utf8(telemetry.publisher().get_ref()).unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 3);
        for line in lines {
            decode_message(line).unwrap();
        }
    }
}
