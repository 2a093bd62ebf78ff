//! JSON-Antwort des Token-Endpunkts
//!
//! Wird vom Server erzeugt und vom Push-to-Talk-Client gelesen.

use serde::{Deserialize, Serialize};

/// Alles was der Browser zum Beitritt in den Raum braucht
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenAntwort {
    pub token: String,
    /// Adresse des Medien-Dienstes (wss://...)
    pub url: String,
    pub identity: String,
    pub room: String,
}
