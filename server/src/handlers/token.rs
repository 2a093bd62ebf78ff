//! REST-Handler fuer die Token-Ausgabe

use axum::{body::Bytes, extract::State, response::Json};
use serde_json::Value;
use talkroom_token::{
    details::STANDARD_NAME, AccessToken, BenutzerDetails, SitzungsIdentitaet, TokenAntwort,
    VideoGrants,
};

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// GET /api/token – Token ohne Benutzerdetails
pub async fn get_token(State(state): State<AppState>) -> ApiResult<Json<TokenAntwort>> {
    token_erstellen(&state, None).await.map(Json)
}

/// POST /api/token – Token mit `userDetails` als Name und Metadaten
pub async fn post_token(
    State(state): State<AppState>,
    body: Bytes,
) -> ApiResult<Json<TokenAntwort>> {
    let anfrage: Value =
        serde_json::from_slice(&body).map_err(|e| ApiError::UngueltigeAnfrage(e.to_string()))?;
    let Value::Object(mut felder) = anfrage else {
        return Err(ApiError::UngueltigeAnfrage(
            "Anfrage muss ein JSON-Objekt sein".into(),
        ));
    };

    // Nur JSON-Objekte zaehlen als Details, alles andere wird ignoriert
    let details = match felder.remove("userDetails") {
        Some(Value::Object(felder)) => Some(BenutzerDetails(felder)),
        _ => None,
    };
    token_erstellen(&state, details).await.map(Json)
}

/// Erzeugt Sitzung und Token und schickt danach den Agenten in den Raum
pub async fn token_erstellen(
    state: &AppState,
    details: Option<BenutzerDetails>,
) -> ApiResult<TokenAntwort> {
    let zugang = state
        .config
        .medien_zugang()
        .ok_or(ApiError::MedienNichtKonfiguriert)?;

    let sitzung = SitzungsIdentitaet::generieren(&state.config.medien.raum_praefix);
    let name = details
        .as_ref()
        .map(BenutzerDetails::name)
        .unwrap_or(STANDARD_NAME);

    let mut token = AccessToken::neu(&zugang.api_key, &zugang.api_secret)
        .mit_identitaet(&sitzung.identitaet)
        .mit_name(name)
        .mit_grants(VideoGrants::teilnehmer(&sitzung.raum))
        .mit_ttl(state.config.medien.token_ttl_sekunden);
    if let Some(details) = &details {
        token = token.mit_metadaten(details.als_metadaten()?);
    }
    let jwt = token.to_jwt()?;

    tracing::info!(
        identitaet = %sitzung.identitaet,
        raum = %sitzung.raum,
        mit_details = details.is_some(),
        "Token ausgegeben"
    );

    if let Err(e) = state.dispatcher.dispatch(&sitzung.raum).await {
        tracing::warn!(raum = %sitzung.raum, fehler = %e, "Agent-Dispatch fehlgeschlagen");
    }

    Ok(TokenAntwort {
        token: jwt,
        url: zugang.url,
        identity: sitzung.identitaet,
        room: sitzung.raum,
    })
}
