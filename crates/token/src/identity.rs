//! Sitzungs-Identitaeten
//!
//! Jede Browser-Sitzung erhaelt eine zufaellige Kurz-ID, daraus abgeleitet
//! eine Teilnehmer-Identitaet und einen eigenen Raum.

use uuid::Uuid;

/// Laenge der Kurz-ID in Hex-Zeichen
const ID_LAENGE: usize = 8;

/// Identitaet und Raum einer einzelnen Sitzung
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SitzungsIdentitaet {
    pub sitzungs_id: String,
    pub identitaet: String,
    pub raum: String,
}

impl SitzungsIdentitaet {
    /// Erzeugt eine neue zufaellige Sitzung mit Raum `<praefix>-<id>`
    pub fn generieren(raum_praefix: &str) -> Self {
        let hex = Uuid::new_v4().simple().to_string();
        Self::aus_id(&hex[..ID_LAENGE], raum_praefix)
    }

    /// Baut die Sitzung aus einer vorgegebenen ID
    pub fn aus_id(sitzungs_id: &str, raum_praefix: &str) -> Self {
        Self {
            sitzungs_id: sitzungs_id.to_string(),
            identitaet: format!("user-{sitzungs_id}"),
            raum: format!("{raum_praefix}-{sitzungs_id}"),
        }
    }
}
