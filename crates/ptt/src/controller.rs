//! Push-to-Talk Steuerung
//!
//! Unterstuetzt zwei Modi: Hold (Taste halten) und Toggle (Taste umschalten).
//! Sprachaktivitaet erkennt der externe Sprachdienst selbst.

/// Betriebsmodus fuer Push-to-Talk
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PttMode {
    /// Taste halten um zu senden – loslassen stoppt Uebertragung
    #[default]
    Hold,
    /// Einmal druecken zum Aktivieren, nochmals zum Deaktivieren
    Toggle,
}

/// Push-to-Talk Controller
///
/// Reiner Zustand ohne Seiteneffekte; die Sitzung gleicht die Spur danach ab.
#[derive(Debug)]
pub struct PttController {
    mode: PttMode,
    /// Hold-Modus: Taste aktuell gedrueckt?
    gedrueckt: bool,
    /// Toggle-Modus: Aktuell aktiv?
    toggle_aktiv: bool,
}

impl PttController {
    pub fn new(mode: PttMode) -> Self {
        Self {
            mode,
            gedrueckt: false,
            toggle_aktiv: false,
        }
    }

    /// Taste/Knopf gedrueckt
    pub fn druecken(&mut self) {
        match self.mode {
            PttMode::Hold => self.gedrueckt = true,
            PttMode::Toggle => self.toggle_aktiv = !self.toggle_aktiv,
        }
    }

    /// Taste/Knopf losgelassen (im Toggle-Modus ohne Wirkung)
    pub fn loslassen(&mut self) {
        if self.mode == PttMode::Hold {
            self.gedrueckt = false;
        }
    }

    /// Beendet jede Uebertragung unabhaengig vom Modus
    pub fn freigeben(&mut self) {
        self.gedrueckt = false;
        self.toggle_aktiv = false;
    }

    /// Modus wechseln – setzt alle Zustaende zurueck
    pub fn set_mode(&mut self, mode: PttMode) {
        self.mode = mode;
        self.freigeben();
    }

    /// Gibt zurueck ob aktuell gesendet werden soll
    pub fn is_transmitting(&self) -> bool {
        match self.mode {
            PttMode::Hold => self.gedrueckt,
            PttMode::Toggle => self.toggle_aktiv,
        }
    }

    pub fn mode(&self) -> PttMode {
        self.mode
    }
}

impl Default for PttController {
    fn default() -> Self {
        Self::new(PttMode::default())
    }
}
