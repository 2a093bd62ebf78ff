//! Schnittstellen zum externen Medien-SDK
//!
//! Die Sitzung kennt nur diese Traits. Im Browser stehen dahinter die
//! SDK-Objekte, in Tests einfache Aufzeichner.

use async_trait::async_trait;

use crate::error::PttResult;

/// Lokale Mikrofonspur
#[async_trait]
pub trait LokaleAudiospur: Send + Sync {
    /// `true` = stumm
    async fn stumm_schalten(&self, stumm: bool) -> PttResult<()>;
}

/// Verbindung zu genau einem Medienraum
#[async_trait]
pub trait RaumVerbindung: Send {
    type Spur: LokaleAudiospur;

    async fn verbinden(&mut self, url: &str, token: &str) -> PttResult<()>;

    /// Veroeffentlicht das lokale Mikrofon als Audiospur
    async fn mikrofon_veroeffentlichen(&mut self) -> PttResult<Self::Spur>;

    async fn trennen(&mut self);
}

/// Wiedergabe entfernter Audiospuren (Audio-Elemente im Dokument)
pub trait AudioAusgabe: Send {
    fn anhaengen(&mut self, spur_sid: &str);
    fn abhaengen(&mut self, spur_sid: &str);
}
