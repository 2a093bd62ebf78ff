//! Auth-Status der Zusatzdienste (Google, GitHub) und Start des Google-OAuth
//!
//! Der eigentliche OAuth-Rueckruf laeuft beim Anbieter; hier wird nur
//! festgestellt ob ein Token vorliegt und die Zustimmungs-URL gebaut.

use std::path::Path;

use reqwest::Url;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::AuthEinstellungen;
use crate::error::{ApiError, ApiResult};

pub const GOOGLE_SCOPES: [&str; 2] = [
    "https://www.googleapis.com/auth/gmail.readonly",
    "https://www.googleapis.com/auth/calendar.readonly",
];

const GOOGLE_AUTH_URI: &str = "https://accounts.google.com/o/oauth2/auth";
const STANDARD_REDIRECT: &str = "http://localhost";

/// Herkunft eines Google-Tokens
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenQuelle {
    Env,
    File,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GoogleStatus {
    pub connected: bool,
    pub has_credentials: bool,
    pub source: Option<TokenQuelle>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GithubStatus {
    pub connected: bool,
}

/// Antwort von `GET /api/auth/status`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthStatus {
    pub google: GoogleStatus,
    pub github: GithubStatus,
}

/// Ergebnis von `POST /api/auth/google`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OAuthStart {
    BereitsAutorisiert,
    Zustimmung { url: String },
}

/// Ein Token-JSON gilt als gueltig wenn es `token` oder `access_token` enthaelt
pub fn token_json_gueltig(roh: &str) -> bool {
    token_json_pruefen(roh).unwrap_or(false)
}

/// `None` wenn kein JSON-Objekt, sonst ob ein Token enthalten ist
fn token_json_pruefen(roh: &str) -> Option<bool> {
    let wert: Value = serde_json::from_str(roh).ok()?;
    let obj = wert.as_object()?;
    Some(obj.contains_key("token") || obj.contains_key("access_token"))
}

/// Ermittelt den Status; Umgebung hat Vorrang vor der Token-Datei.
///
/// Die Quelle wird gesetzt sobald ein lesbares Token-JSON vorliegt, auch
/// wenn es kein Token enthaelt. Die Datei wird nur ohne gueltiges
/// Umgebungs-Token gelesen.
pub async fn status_ermitteln(auth: &AuthEinstellungen) -> AuthStatus {
    let env_token = auth.google_token_json.as_deref();

    let mut connected = false;
    let mut quelle = None;

    if let Some(gueltig) = env_token.and_then(token_json_pruefen) {
        connected = gueltig;
        quelle = Some(TokenQuelle::Env);
    }

    if !connected {
        if let Ok(inhalt) = tokio::fs::read_to_string(&auth.token_datei).await {
            if let Some(gueltig) = token_json_pruefen(&inhalt) {
                connected = gueltig;
                quelle = Some(TokenQuelle::File);
            }
        }
    }

    let credentials_vorhanden = Path::new(&auth.credentials_datei).exists();

    AuthStatus {
        google: GoogleStatus {
            connected,
            has_credentials: credentials_vorhanden || env_token.is_some(),
            source: quelle,
        },
        github: GithubStatus {
            connected: auth.github_token.as_deref().is_some_and(|t| !t.is_empty()),
        },
    }
}

#[derive(Debug, Deserialize)]
struct ClientSecrets {
    installed: Option<ClientDaten>,
    web: Option<ClientDaten>,
}

#[derive(Debug, Deserialize)]
struct ClientDaten {
    client_id: String,
    #[serde(default)]
    auth_uri: Option<String>,
    #[serde(default)]
    redirect_uris: Vec<String>,
}

/// Startet den Google-OAuth-Ablauf
pub async fn google_starten(auth: &AuthEinstellungen) -> ApiResult<OAuthStart> {
    if auth
        .google_token_json
        .as_deref()
        .is_some_and(token_json_gueltig)
    {
        return Ok(OAuthStart::BereitsAutorisiert);
    }

    let inhalt = match tokio::fs::read_to_string(&auth.credentials_datei).await {
        Ok(inhalt) => inhalt,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(ApiError::OAuthNichtVerfuegbar)
        }
        Err(e) => return Err(ApiError::OAuth(format!("Client-Daten nicht lesbar: {e}"))),
    };

    let url = zustimmungs_url(&inhalt)?;
    tracing::info!("Google-Zustimmungs-URL erzeugt");
    Ok(OAuthStart::Zustimmung { url })
}

/// Baut die Zustimmungs-URL aus dem Inhalt der Client-Daten-Datei
pub fn zustimmungs_url(credentials_json: &str) -> ApiResult<String> {
    let secrets: ClientSecrets = serde_json::from_str(credentials_json)
        .map_err(|e| ApiError::OAuth(format!("Client-Daten ungueltig: {e}")))?;
    let client = secrets
        .installed
        .or(secrets.web)
        .ok_or_else(|| ApiError::OAuth("Weder 'installed' noch 'web' in den Client-Daten".into()))?;

    let auth_uri = client.auth_uri.as_deref().unwrap_or(GOOGLE_AUTH_URI);
    let redirect = client
        .redirect_uris
        .first()
        .map(String::as_str)
        .unwrap_or(STANDARD_REDIRECT);
    let scope = GOOGLE_SCOPES.join(" ");

    let url = Url::parse_with_params(
        auth_uri,
        [
            ("client_id", client.client_id.as_str()),
            ("redirect_uri", redirect),
            ("response_type", "code"),
            ("scope", scope.as_str()),
            ("access_type", "offline"),
            ("prompt", "consent"),
        ],
    )
    .map_err(|e| ApiError::OAuth(format!("auth_uri ungueltig: {e}")))?;

    Ok(url.into())
}
