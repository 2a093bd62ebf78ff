//! Fehlertypen fuer Token-Erzeugung und -Pruefung

use thiserror::Error;

/// Alle moeglichen Fehler beim Umgang mit Zugangstoken
#[derive(Debug, Error)]
pub enum TokenError {
    // --- Erzeugung ---
    #[error("API-Schluessel oder -Secret fehlt")]
    ZugangsdatenFehlen,

    #[error("Identitaet fehlt, wird fuer Raumbeitritt benoetigt")]
    IdentitaetFehlt,

    #[error("Serialisierung fehlgeschlagen: {0}")]
    Serialisierung(#[from] serde_json::Error),

    // --- Pruefung ---
    #[error("Token hat kein gueltiges JWT-Format")]
    Format,

    #[error("Nicht unterstuetzter Algorithmus: {0}")]
    Algorithmus(String),

    #[error("Signatur ungueltig")]
    SignaturUngueltig,

    #[error("Token abgelaufen")]
    Abgelaufen,

    #[error("Token noch nicht gueltig")]
    NochNichtGueltig,
}

/// Result-Alias fuer Token-Operationen
pub type TokenResult<T> = Result<T, TokenError>;
