//! Fehlertypen der Push-to-Talk-Sitzung

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PttError {
    #[error("Verbindung zum Raum fehlgeschlagen: {0}")]
    Verbindung(String),

    #[error("Mikrofon konnte nicht veroeffentlicht werden: {0}")]
    Veroeffentlichen(String),

    #[error("Stummschaltung der Spur fehlgeschlagen: {0}")]
    Spur(String),

    #[error("Sitzung ist bereits verbunden")]
    BereitsVerbunden,
}

pub type PttResult<T> = Result<T, PttError>;
