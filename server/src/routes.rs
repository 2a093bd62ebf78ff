//! Router: API, Health-Check und statische Dateien

use axum::{
    http::{HeaderValue, Method},
    middleware,
    routing::{get, post},
    Router,
};
use talkroom_observability::{health_router, request_timing_layer, timing_middleware, HealthState};
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;

use crate::handlers;
use crate::state::AppState;

/// Erstellt die `/api/...`-Routen
pub fn api_router() -> Router<AppState> {
    Router::new()
        .route(
            "/api/token",
            get(handlers::token::get_token).post(handlers::token::post_token),
        )
        .route("/api/auth/status", get(handlers::auth::get_auth_status))
        .route("/api/auth/google", post(handlers::auth::post_google_oauth))
}

/// Erstellt die vollstaendige Anwendung inklusive Layern
pub fn app(state: AppState) -> Router {
    let health = HealthState::neu(state.config.medien_zugang().is_some());
    let statisch = ServeDir::new(&state.config.server.statisch_verzeichnis);
    let cors = cors_layer(&state.config.server.cors_origins);

    api_router()
        .with_state(state)
        .merge(health_router(health))
        .fallback_service(statisch)
        .layer(middleware::from_fn(timing_middleware))
        .layer(request_timing_layer())
        .layer(cors)
}

/// CORS: entweder spezifische Origins oder Any
fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.is_empty() {
        return CorsLayer::permissive();
    }
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(wert) => Some(wert),
            Err(e) => {
                tracing::warn!(origin = %origin, fehler = %e, "CORS-Origin ungueltig, ignoriert");
                None
            }
        })
        .collect();
    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any)
}
