//! talkroom-token – Zugangstoken fuer Medienraeume
//!
//! Dieses Crate implementiert:
//! - Grant- und Claim-Modell des Medien-Dienstes
//! - AccessToken-Builder mit HS256-Signatur
//! - Verifikation (Signatur + Zeitfenster)
//! - Sitzungs-Identitaeten (zufaellige ID, eigener Raum pro Sitzung)
//! - Benutzerdetails aus dem Browser als Token-Metadaten

pub mod access_token;
pub mod antwort;
pub mod claims;
pub mod details;
pub mod error;
pub mod identity;

// Bequeme Re-Exporte
pub use access_token::{verifizieren, AccessToken, STANDARD_TTL_SEKUNDEN};
pub use antwort::TokenAntwort;
pub use claims::{Claims, VideoGrants};
pub use details::BenutzerDetails;
pub use error::{TokenError, TokenResult};
pub use identity::SitzungsIdentitaet;
