//! Geteilter Zustand der HTTP-Handler

use std::sync::Arc;
use std::time::Duration;

use crate::config::ServerConfig;
use crate::dispatch::{AgentDispatcher, KeinDispatch, TwirpDispatcher};

/// Axum-State fuer alle API-Handler
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServerConfig>,
    pub dispatcher: Arc<dyn AgentDispatcher>,
}

impl AppState {
    /// Waehlt den Dispatcher anhand der Konfiguration
    pub fn neu(config: ServerConfig) -> anyhow::Result<Self> {
        let dispatcher: Arc<dyn AgentDispatcher> = match config.medien_zugang() {
            Some(zugang) if config.agent.dispatch_aktiviert => {
                let dispatcher = TwirpDispatcher::neu(
                    &zugang,
                    config.agent.agent_name.clone(),
                    Duration::from_millis(config.agent.timeout_ms),
                )?;
                tracing::info!(basis = %dispatcher.basis_url(), "Agent-Dispatch aktiv");
                Arc::new(dispatcher)
            }
            _ => Arc::new(KeinDispatch),
        };
        Ok(Self::mit_dispatcher(config, dispatcher))
    }

    pub fn mit_dispatcher(config: ServerConfig, dispatcher: Arc<dyn AgentDispatcher>) -> Self {
        Self {
            config: Arc::new(config),
            dispatcher,
        }
    }
}
