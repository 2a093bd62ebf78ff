//! Benutzerdetails aus dem Browser
//!
//! Der Client schickt ein freies JSON-Objekt (`userDetails`). Der Name wird
//! Anzeigename des Teilnehmers, das ganze Objekt wandert als Metadaten ins Token.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::TokenResult;

/// Anzeigename wenn keiner mitgeschickt wurde
pub const STANDARD_NAME: &str = "User";

/// Freie Benutzerdetails (Name, Stadt, Beruf, ...)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BenutzerDetails(pub Map<String, Value>);

impl BenutzerDetails {
    /// Anzeigename; leere oder nicht-String-Werte fallen auf den Standard zurueck
    pub fn name(&self) -> &str {
        match self.0.get("name") {
            Some(Value::String(name)) if !name.trim().is_empty() => name,
            _ => STANDARD_NAME,
        }
    }

    /// Serialisiert die Details fuer den `metadata`-Claim
    pub fn als_metadaten(&self) -> TokenResult<String> {
        Ok(serde_json::to_string(&self.0)?)
    }
}
