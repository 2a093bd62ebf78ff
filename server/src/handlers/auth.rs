//! REST-Handler fuer den Auth-Bildschirm

use axum::{extract::State, response::Json};
use serde_json::{json, Value};

use crate::error::ApiResult;
use crate::oauth::{self, AuthStatus, OAuthStart};
use crate::state::AppState;

/// GET /api/auth/status
pub async fn get_auth_status(State(state): State<AppState>) -> Json<AuthStatus> {
    Json(oauth::status_ermitteln(&state.config.auth).await)
}

/// POST /api/auth/google
pub async fn post_google_oauth(State(state): State<AppState>) -> ApiResult<Json<Value>> {
    let antwort = match oauth::google_starten(&state.config.auth).await? {
        OAuthStart::BereitsAutorisiert => json!({
            "success": true,
            "message": "Google bereits ueber Umgebungsvariable autorisiert",
        }),
        OAuthStart::Zustimmung { url } => json!({
            "success": true,
            "message": "Zustimmung im Browser erteilen",
            "authorizationUrl": url,
        }),
    };
    Ok(Json(antwort))
}
