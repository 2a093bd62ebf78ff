//! talkroom-ptt – Push-to-Talk Sitzungssteuerung
//!
//! Haelt genau eine Raumverbindung und eine lokale Mikrofonspur. Eingaben
//! (Maus, Touch, Tastatur) schalten das Mikrofon stumm bzw. frei, Ereignisse
//! des Raums aktualisieren den Status und haengen entfernte Audiospuren an.
//!
//! Transport, Codecs und Sprachaktivitaet liegen beim externen Medien-SDK;
//! dieses Crate spricht es nur ueber die Traits in [`raum`] an.

pub mod controller;
pub mod ereignis;
pub mod error;
pub mod raum;
pub mod sitzung;

pub use controller::{PttController, PttMode};
pub use ereignis::{Eingabe, RaumEreignis, SpurArt};
pub use error::{PttError, PttResult};
pub use raum::{AudioAusgabe, LokaleAudiospur, RaumVerbindung};
pub use sitzung::{PttSitzung, VerbindungsStatus, STANDARD_TASTE};
