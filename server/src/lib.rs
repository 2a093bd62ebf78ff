//! talkroom-server – Bibliotheks-Root
//!
//! Token-Server fuer Push-to-Talk-Clients: gibt signierte Zugangstoken fuer
//! je einen eigenen Medienraum aus, schickt den Sprach-Agenten hinein und
//! liefert die Weboberflaeche aus.

pub mod config;
pub mod dispatch;
pub mod error;
pub mod handlers;
pub mod oauth;
pub mod routes;
pub mod state;

use anyhow::Result;
use config::ServerConfig;
use state::AppState;

/// Haelt den laufenden Server-Zustand zusammen
pub struct Server {
    pub config: ServerConfig,
}

impl Server {
    /// Erstellt einen neuen Server aus der gegebenen Konfiguration
    pub fn neu(config: ServerConfig) -> Self {
        Self { config }
    }

    /// Startet den HTTP-Server und laeuft bis zum Shutdown-Signal (Ctrl-C)
    pub async fn starten(self) -> Result<()> {
        let adresse = self.config.bind_adresse();

        match self.config.medien_zugang() {
            Some(zugang) => tracing::info!(url = %zugang.url, "Medien-Dienst konfiguriert"),
            None => tracing::warn!(
                "Zugangsdaten fehlen: LIVEKIT_URL, LIVEKIT_API_KEY und LIVEKIT_API_SECRET setzen"
            ),
        }

        let app = routes::app(AppState::neu(self.config)?);

        let listener = tokio::net::TcpListener::bind(&adresse).await?;
        tracing::info!(adresse = %adresse, "Token-Server gestartet");

        axum::serve(listener, app)
            .with_graceful_shutdown(async {
                let _ = tokio::signal::ctrl_c().await;
                tracing::info!("Shutdown-Signal empfangen, Server wird beendet");
            })
            .await?;
        Ok(())
    }
}
