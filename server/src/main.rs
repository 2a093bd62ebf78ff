//! Talkroom Server – Einstiegspunkt
//!
//! Laedt die Konfiguration, initialisiert das Logging und startet den Server.

use anyhow::Result;
use talkroom_server::{config::ServerConfig, Server};

#[tokio::main]
async fn main() -> Result<()> {
    // Konfigurationsdatei-Pfad aus Umgebungsvariable oder Standard
    let config_pfad = std::env::var("TALKROOM_CONFIG").unwrap_or_else(|_| "config.toml".into());

    let (config, warnungen) = ServerConfig::aus_umgebung_laden(&config_pfad)?;

    talkroom_observability::logging_initialisieren(&config.logging.level, &config.logging.format);

    for warnung in &warnungen {
        tracing::warn!(warnung = %warnung, "Konfiguration");
    }

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        config = %config_pfad,
        "Talkroom Server wird initialisiert"
    );

    Server::neu(config).starten().await
}
