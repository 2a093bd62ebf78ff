//! Claim-Schema der Zugangstoken
//!
//! Feldnamen folgen dem Format des Medien-Dienstes (camelCase im `video`-Grant).

use serde::{Deserialize, Serialize};

/// Berechtigungen fuer einen Medienraum
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VideoGrants {
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub room_join: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub room: Option<String>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub can_publish: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub can_subscribe: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub room_admin: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub room_create: bool,
}

impl VideoGrants {
    /// Grant fuer einen Browser-Teilnehmer: beitreten, senden, empfangen
    pub fn teilnehmer(raum: impl Into<String>) -> Self {
        Self {
            room_join: true,
            room: Some(raum.into()),
            can_publish: true,
            can_subscribe: true,
            ..Self::default()
        }
    }

    /// Grant fuer serverseitige Verwaltungsaufrufe auf einem Raum
    pub fn raum_admin(raum: impl Into<String>) -> Self {
        Self {
            room: Some(raum.into()),
            room_admin: true,
            ..Self::default()
        }
    }
}

/// Vollstaendiger Claim-Satz eines Zugangstokens
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Ablaufzeitpunkt (Unix-Sekunden)
    pub exp: i64,
    /// Aussteller = API-Schluessel
    pub iss: String,
    /// Nicht gueltig vor (Unix-Sekunden)
    pub nbf: i64,
    /// Identitaet des Teilnehmers
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub sub: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub jti: String,
    /// Anzeigename
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Freie Metadaten (JSON-String)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<String>,
    pub video: VideoGrants,
}
