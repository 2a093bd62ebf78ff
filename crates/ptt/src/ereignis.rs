//! Eingaben des Benutzers und Ereignisse des Medienraums

/// Benutzer-Eingabe am Sprechknopf bzw. an der Tastatur
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Eingabe {
    ZeigerRunter,
    ZeigerHoch,
    /// Zeiger verlaesst den Knopf bei gedrueckter Taste
    ZeigerVerlassen,
    TouchStart,
    TouchEnde,
    TouchAbbruch,
    /// `code` ist der physische Tastencode, z.B. `"Space"`
    TasteRunter { code: String, wiederholung: bool },
    TasteHoch { code: String },
    FensterVerliertFokus,
}

/// Art einer entfernten Spur
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpurArt {
    Audio,
    Video,
}

/// Ereignisse die das Medien-SDK aus dem Raum meldet
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RaumEreignis {
    Verbunden,
    Getrennt,
    SpurAbonniert { spur_sid: String, art: SpurArt },
    SpurAbbestellt { spur_sid: String },
}
