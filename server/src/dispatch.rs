//! Agent-Dispatch
//!
//! Nach jeder Token-Ausgabe wird der Sprach-Agent explizit in den neuen Raum
//! geschickt. Der Aufruf geht an die Twirp-API des Medien-Dienstes und ist
//! best-effort: Fehler landen im Log, die Token-Antwort bleibt unberuehrt.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use talkroom_token::{AccessToken, VideoGrants};

use crate::config::MedienZugang;
use crate::error::DispatchError;

const DISPATCH_PFAD: &str = "/twirp/livekit.AgentDispatchService/CreateDispatch";

/// Gueltigkeit des Admin-Tokens fuer den Dispatch-Aufruf
const ADMIN_TTL_SEKUNDEN: i64 = 600;

/// Schickt einen Agenten in einen Raum
#[async_trait]
pub trait AgentDispatcher: Send + Sync {
    async fn dispatch(&self, raum: &str) -> Result<(), DispatchError>;
}

/// Dispatch deaktiviert oder nicht konfiguriert
#[derive(Debug, Default)]
pub struct KeinDispatch;

#[async_trait]
impl AgentDispatcher for KeinDispatch {
    async fn dispatch(&self, raum: &str) -> Result<(), DispatchError> {
        tracing::debug!(raum = raum, "Agent-Dispatch deaktiviert");
        Ok(())
    }
}

#[derive(Debug, Serialize)]
struct DispatchAnfrage<'a> {
    room: &'a str,
    agent_name: &'a str,
    metadata: &'a str,
}

#[derive(Debug, Deserialize)]
struct DispatchAntwort {
    #[serde(default)]
    id: String,
}

/// Dispatch ueber die Twirp-HTTP-API des Medien-Dienstes
#[derive(Debug, Clone)]
pub struct TwirpDispatcher {
    client: Client,
    basis_url: String,
    api_key: String,
    api_secret: String,
    agent_name: String,
}

impl TwirpDispatcher {
    pub fn neu(
        zugang: &MedienZugang,
        agent_name: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, DispatchError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            basis_url: http_basis(&zugang.url)?,
            api_key: zugang.api_key.clone(),
            api_secret: zugang.api_secret.clone(),
            agent_name: agent_name.into(),
        })
    }

    pub fn basis_url(&self) -> &str {
        &self.basis_url
    }
}

#[async_trait]
impl AgentDispatcher for TwirpDispatcher {
    async fn dispatch(&self, raum: &str) -> Result<(), DispatchError> {
        let token = AccessToken::neu(&self.api_key, &self.api_secret)
            .mit_grants(VideoGrants::raum_admin(raum))
            .mit_ttl(ADMIN_TTL_SEKUNDEN)
            .to_jwt()?;

        let response = self
            .client
            .post(format!("{}{}", self.basis_url, DISPATCH_PFAD))
            .bearer_auth(token)
            .json(&DispatchAnfrage {
                room: raum,
                agent_name: &self.agent_name,
                metadata: "",
            })
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let text = response.text().await.unwrap_or_default();
            return Err(DispatchError::Api { status, text });
        }

        let antwort: DispatchAntwort = response.json().await?;
        tracing::info!(raum = raum, dispatch_id = %antwort.id, "Agent in Raum geschickt");
        Ok(())
    }
}

/// Leitet aus der Client-URL (ws/wss) die HTTP-Basis fuer API-Aufrufe ab
pub fn http_basis(url: &str) -> Result<String, DispatchError> {
    let url = url.trim().trim_end_matches('/');
    let basis = if let Some(rest) = url.strip_prefix("wss://") {
        format!("https://{rest}")
    } else if let Some(rest) = url.strip_prefix("ws://") {
        format!("http://{rest}")
    } else if url.starts_with("https://") || url.starts_with("http://") {
        url.to_string()
    } else {
        return Err(DispatchError::Url(url.to_string()));
    };
    Ok(basis)
}
