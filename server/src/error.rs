//! Fehlertypen des Token-Servers

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde_json::json;
use thiserror::Error;

/// Fehler die ein HTTP-Handler zurueckgeben kann
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Zugangsdaten fuer den Medien-Dienst nicht konfiguriert")]
    MedienNichtKonfiguriert,

    #[error("Anfrage nicht lesbar: {0}")]
    UngueltigeAnfrage(String),

    #[error("Token-Erzeugung fehlgeschlagen: {0}")]
    Token(#[from] talkroom_token::TokenError),

    #[error("OAuth in dieser Umgebung nicht verfuegbar")]
    OAuthNichtVerfuegbar,

    #[error("OAuth-Start fehlgeschlagen: {0}")]
    OAuth(String),

    #[error("Interner Fehler: {0}")]
    Intern(#[from] anyhow::Error),
}

pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    pub fn http_status(&self) -> StatusCode {
        match self {
            Self::UngueltigeAnfrage(_) | Self::OAuthNichtVerfuegbar => StatusCode::BAD_REQUEST,
            Self::MedienNichtKonfiguriert | Self::Token(_) | Self::OAuth(_) | Self::Intern(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Zusatzhinweis fuer den Client
    fn hinweis(&self) -> Option<&'static str> {
        match self {
            Self::OAuthNichtVerfuegbar => Some(
                "Lokal einmal autorisieren und den Inhalt von token.json als GOOGLE_TOKEN_JSON setzen.",
            ),
            _ => None,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.http_status();
        if status.is_server_error() {
            tracing::error!(fehler = %self, "Anfrage fehlgeschlagen");
        } else {
            tracing::debug!(fehler = %self, "Anfrage abgelehnt");
        }

        let body = match self.hinweis() {
            Some(hinweis) => json!({ "error": self.to_string(), "hint": hinweis }),
            None => json!({ "error": self.to_string() }),
        };
        (status, Json(body)).into_response()
    }
}

/// Fehler beim Agent-Dispatch (werden nur protokolliert)
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("HTTP-Fehler: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Dienst antwortete mit {status}: {text}")]
    Api { status: u16, text: String },

    #[error("Admin-Token nicht erzeugbar: {0}")]
    Token(#[from] talkroom_token::TokenError),

    #[error("Ungueltige Dienst-URL: {0}")]
    Url(String),
}
