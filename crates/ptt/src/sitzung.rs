//! Push-to-Talk Sitzung
//!
//! Verbindet Controller, Raumverbindung und Audioausgabe. Das Mikrofon wird
//! stumm veroeffentlicht und nur bei verbundener Sitzung freigegeben.

use std::collections::BTreeSet;

use talkroom_token::TokenAntwort;

use crate::controller::{PttController, PttMode};
use crate::ereignis::{Eingabe, RaumEreignis, SpurArt};
use crate::error::{PttError, PttResult};
use crate::raum::{AudioAusgabe, LokaleAudiospur, RaumVerbindung};

/// Standard-Sprechtaste
pub const STANDARD_TASTE: &str = "Space";

/// Verbindungszustand wie er dem Benutzer angezeigt wird
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum VerbindungsStatus {
    #[default]
    Getrennt,
    Verbinde,
    Verbunden,
    Fehler(String),
}

pub struct PttSitzung<R: RaumVerbindung, A: AudioAusgabe> {
    raum: R,
    ausgabe: A,
    spur: Option<R::Spur>,
    controller: PttController,
    status: VerbindungsStatus,
    /// Mikrofon aktuell freigegeben?
    offen: bool,
    entfernte_spuren: BTreeSet<String>,
    taste: String,
}

impl<R: RaumVerbindung, A: AudioAusgabe> PttSitzung<R, A> {
    pub fn neu(raum: R, ausgabe: A) -> Self {
        Self {
            raum,
            ausgabe,
            spur: None,
            controller: PttController::default(),
            status: VerbindungsStatus::Getrennt,
            offen: false,
            entfernte_spuren: BTreeSet::new(),
            taste: STANDARD_TASTE.to_string(),
        }
    }

    pub fn mit_taste(mut self, code: impl Into<String>) -> Self {
        self.taste = code.into();
        self
    }

    pub fn mit_modus(mut self, mode: PttMode) -> Self {
        self.controller.set_mode(mode);
        self
    }

    /// Tritt dem Raum aus der Token-Antwort bei und veroeffentlicht das Mikrofon stumm
    pub async fn verbinden(&mut self, zugang: &TokenAntwort) -> PttResult<()> {
        if self.spur.is_some() {
            return Err(PttError::BereitsVerbunden);
        }

        tracing::info!(raum = %zugang.room, identitaet = %zugang.identity, "Verbinde mit Raum");
        self.status = VerbindungsStatus::Verbinde;

        if let Err(e) = self.raum.verbinden(&zugang.url, &zugang.token).await {
            tracing::warn!(fehler = %e, "Raumverbindung fehlgeschlagen");
            self.status = VerbindungsStatus::Fehler(e.to_string());
            return Err(e);
        }

        let spur = match self.raum.mikrofon_veroeffentlichen().await {
            Ok(spur) => spur,
            Err(e) => {
                tracing::warn!(fehler = %e, "Mikrofon nicht veroeffentlicht");
                self.raum.trennen().await;
                self.aufraeumen();
                self.status = VerbindungsStatus::Fehler(e.to_string());
                return Err(e);
            }
        };
        if let Err(e) = spur.stumm_schalten(true).await {
            self.raum.trennen().await;
            self.aufraeumen();
            self.status = VerbindungsStatus::Fehler(e.to_string());
            return Err(e);
        }

        self.spur = Some(spur);
        self.offen = false;
        self.controller.freigeben();
        self.status = VerbindungsStatus::Verbunden;
        Ok(())
    }

    /// Verlaesst den Raum und gibt alle Spuren frei
    pub async fn trennen(&mut self) {
        if self.status == VerbindungsStatus::Getrennt && self.spur.is_none() {
            return;
        }
        self.raum.trennen().await;
        self.aufraeumen();
        tracing::info!("Sitzung getrennt");
    }

    /// Verarbeitet eine Benutzer-Eingabe. Gibt zurueck ob danach gesendet wird.
    pub async fn eingabe(&mut self, eingabe: Eingabe) -> PttResult<bool> {
        match eingabe {
            Eingabe::ZeigerRunter | Eingabe::TouchStart => self.controller.druecken(),
            Eingabe::ZeigerHoch
            | Eingabe::TouchEnde
            | Eingabe::ZeigerVerlassen
            | Eingabe::TouchAbbruch => self.controller.loslassen(),
            Eingabe::TasteRunter { code, wiederholung } => {
                if code != self.taste || wiederholung {
                    return Ok(self.offen);
                }
                self.controller.druecken();
            }
            Eingabe::TasteHoch { code } => {
                if code != self.taste {
                    return Ok(self.offen);
                }
                self.controller.loslassen();
            }
            Eingabe::FensterVerliertFokus => self.controller.freigeben(),
        }

        if !self.ist_verbunden() {
            self.controller.freigeben();
            return Ok(false);
        }

        if self.controller.is_transmitting() {
            let ergebnis = self.stumm_aufheben().await;
            if ergebnis.is_err() {
                self.controller.freigeben();
            }
            ergebnis
        } else {
            self.stumm_schalten().await.map(|_| false)
        }
    }

    /// Gibt das Mikrofon frei. Ohne Verbindung oder Spur passiert nichts.
    pub async fn stumm_aufheben(&mut self) -> PttResult<bool> {
        if !self.ist_verbunden() {
            return Ok(false);
        }
        let Some(spur) = self.spur.as_ref() else {
            return Ok(false);
        };
        if !self.offen {
            spur.stumm_schalten(false).await?;
            self.offen = true;
            tracing::debug!("Mikrofon freigegeben");
        }
        Ok(true)
    }

    /// Schaltet das Mikrofon stumm
    pub async fn stumm_schalten(&mut self) -> PttResult<()> {
        let Some(spur) = self.spur.as_ref() else {
            self.offen = false;
            return Ok(());
        };
        if self.offen {
            spur.stumm_schalten(true).await?;
            self.offen = false;
            tracing::debug!("Mikrofon stumm");
        }
        Ok(())
    }

    /// Reagiert auf ein Ereignis des Medienraums
    pub fn raum_ereignis(&mut self, ereignis: RaumEreignis) {
        match ereignis {
            RaumEreignis::Verbunden => {
                // Ohne veroeffentlichte Spur gilt die Sitzung nicht als verbunden
                if self.spur.is_some() {
                    self.status = VerbindungsStatus::Verbunden;
                } else {
                    tracing::debug!(
                        status = ?self.status,
                        "Verbunden-Ereignis ohne Mikrofonspur ignoriert"
                    );
                }
            }
            RaumEreignis::Getrennt => {
                tracing::info!("Raum hat die Verbindung beendet");
                self.aufraeumen();
            }
            RaumEreignis::SpurAbonniert { spur_sid, art } => {
                if art != SpurArt::Audio {
                    tracing::debug!(spur = %spur_sid, "Nicht-Audio-Spur ignoriert");
                    return;
                }
                if self.entfernte_spuren.insert(spur_sid.clone()) {
                    self.ausgabe.anhaengen(&spur_sid);
                }
            }
            RaumEreignis::SpurAbbestellt { spur_sid } => {
                if self.entfernte_spuren.remove(&spur_sid) {
                    self.ausgabe.abhaengen(&spur_sid);
                }
            }
        }
    }

    pub fn status(&self) -> &VerbindungsStatus {
        &self.status
    }

    pub fn ist_verbunden(&self) -> bool {
        self.status == VerbindungsStatus::Verbunden
    }

    pub fn sendet(&self) -> bool {
        self.offen
    }

    /// Mindestens eine entfernte Audiospur (der Agent) ist angehaengt
    pub fn agent_hoerbar(&self) -> bool {
        !self.entfernte_spuren.is_empty()
    }

    /// Statustext fuer die Oberflaeche
    pub fn status_text(&self) -> String {
        match &self.status {
            VerbindungsStatus::Getrennt => "Getrennt".into(),
            VerbindungsStatus::Verbinde => "Verbinde…".into(),
            VerbindungsStatus::Fehler(grund) => format!("Fehler: {grund}"),
            VerbindungsStatus::Verbunden if self.offen => "Spricht…".into(),
            VerbindungsStatus::Verbunden => match self.controller.mode() {
                PttMode::Hold => format!("Verbunden: {} halten zum Sprechen", self.taste),
                PttMode::Toggle => format!("Verbunden: {} druecken zum Sprechen", self.taste),
            },
        }
    }

    fn aufraeumen(&mut self) {
        self.spur = None;
        self.offen = false;
        self.controller.freigeben();
        for sid in std::mem::take(&mut self.entfernte_spuren) {
            self.ausgabe.abhaengen(&sid);
        }
        self.status = VerbindungsStatus::Getrennt;
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use parking_lot::Mutex;

    use super::*;

    type Protokoll = Arc<Mutex<Vec<String>>>;

    struct TestSpur {
        protokoll: Protokoll,
        fehlschlagen: bool,
    }

    #[async_trait]
    impl LokaleAudiospur for TestSpur {
        async fn stumm_schalten(&self, stumm: bool) -> PttResult<()> {
            if self.fehlschlagen && !stumm {
                return Err(PttError::Spur("Geraet weg".into()));
            }
            self.protokoll
                .lock()
                .push(if stumm { "stumm" } else { "offen" }.into());
            Ok(())
        }
    }

    #[derive(Default)]
    struct TestRaum {
        protokoll: Protokoll,
        verbindung_scheitert: bool,
        veroeffentlichen_scheitert: bool,
        spur_scheitert: bool,
    }

    #[async_trait]
    impl RaumVerbindung for TestRaum {
        type Spur = TestSpur;

        async fn verbinden(&mut self, url: &str, token: &str) -> PttResult<()> {
            if self.verbindung_scheitert {
                return Err(PttError::Verbindung("abgelehnt".into()));
            }
            self.protokoll.lock().push(format!("verbinden {url} {token}"));
            Ok(())
        }

        async fn mikrofon_veroeffentlichen(&mut self) -> PttResult<TestSpur> {
            if self.veroeffentlichen_scheitert {
                return Err(PttError::Veroeffentlichen("kein Mikrofon".into()));
            }
            self.protokoll.lock().push("veroeffentlichen".into());
            Ok(TestSpur {
                protokoll: self.protokoll.clone(),
                fehlschlagen: self.spur_scheitert,
            })
        }

        async fn trennen(&mut self) {
            self.protokoll.lock().push("trennen".into());
        }
    }

    #[derive(Default)]
    struct TestAusgabe {
        protokoll: Protokoll,
    }

    impl AudioAusgabe for TestAusgabe {
        fn anhaengen(&mut self, spur_sid: &str) {
            self.protokoll.lock().push(format!("+{spur_sid}"));
        }
        fn abhaengen(&mut self, spur_sid: &str) {
            self.protokoll.lock().push(format!("-{spur_sid}"));
        }
    }

    fn zugang() -> TokenAntwort {
        TokenAntwort {
            token: "jwt".into(),
            url: "wss://medien".into(),
            identity: "user-1".into(),
            room: "raum-1".into(),
        }
    }

    fn sitzung() -> (PttSitzung<TestRaum, TestAusgabe>, Protokoll, Protokoll) {
        let raum = TestRaum::default();
        let ausgabe = TestAusgabe::default();
        let (rp, ap) = (raum.protokoll.clone(), ausgabe.protokoll.clone());
        (PttSitzung::neu(raum, ausgabe), rp, ap)
    }

    fn leertaste(wiederholung: bool) -> Eingabe {
        Eingabe::TasteRunter {
            code: "Space".into(),
            wiederholung,
        }
    }

    #[tokio::test]
    async fn verbinden_veroeffentlicht_stumm() {
        let (mut s, rp, _) = sitzung();
        s.verbinden(&zugang()).await.unwrap();
        assert!(s.ist_verbunden());
        assert!(!s.sendet());
        assert_eq!(
            *rp.lock(),
            vec!["verbinden wss://medien jwt", "veroeffentlichen", "stumm"]
        );
    }

    #[tokio::test]
    async fn halten_und_loslassen_schaltet_mikrofon() {
        let (mut s, rp, _) = sitzung();
        s.verbinden(&zugang()).await.unwrap();
        rp.lock().clear();

        assert!(s.eingabe(Eingabe::ZeigerRunter).await.unwrap());
        assert_eq!(s.status_text(), "Spricht…");
        assert!(!s.eingabe(Eingabe::ZeigerHoch).await.unwrap());
        assert_eq!(*rp.lock(), vec!["offen", "stumm"]);
    }

    #[tokio::test]
    async fn tastenwiederholung_ruft_spur_nicht_erneut() {
        let (mut s, rp, _) = sitzung();
        s.verbinden(&zugang()).await.unwrap();
        rp.lock().clear();

        s.eingabe(leertaste(false)).await.unwrap();
        s.eingabe(leertaste(true)).await.unwrap();
        s.eingabe(leertaste(true)).await.unwrap();
        s.eingabe(Eingabe::TasteHoch { code: "Space".into() })
            .await
            .unwrap();
        assert_eq!(*rp.lock(), vec!["offen", "stumm"]);
    }

    #[tokio::test]
    async fn andere_tasten_werden_ignoriert() {
        let (mut s, rp, _) = sitzung();
        s.verbinden(&zugang()).await.unwrap();
        rp.lock().clear();

        let sendet = s
            .eingabe(Eingabe::TasteRunter {
                code: "KeyA".into(),
                wiederholung: false,
            })
            .await
            .unwrap();
        assert!(!sendet);
        assert!(rp.lock().is_empty());
    }

    #[tokio::test]
    async fn eigene_taste_konfigurierbar() {
        let (s, _, _) = sitzung();
        let mut s = s.mit_taste("KeyT");
        s.verbinden(&zugang()).await.unwrap();
        assert!(!s.eingabe(leertaste(false)).await.unwrap());
        let sendet = s
            .eingabe(Eingabe::TasteRunter {
                code: "KeyT".into(),
                wiederholung: false,
            })
            .await
            .unwrap();
        assert!(sendet);
    }

    #[tokio::test]
    async fn ohne_verbindung_bleibt_mikrofon_stumm() {
        let (mut s, rp, _) = sitzung();
        assert!(!s.eingabe(Eingabe::TouchStart).await.unwrap());
        assert!(!s.stumm_aufheben().await.unwrap());
        assert!(rp.lock().is_empty());
        assert_eq!(s.status_text(), "Getrennt");
    }

    #[tokio::test]
    async fn fokusverlust_und_abbruch_beenden_senden() {
        let (mut s, _, _) = sitzung();
        s.verbinden(&zugang()).await.unwrap();

        s.eingabe(Eingabe::TouchStart).await.unwrap();
        assert!(!s.eingabe(Eingabe::TouchAbbruch).await.unwrap());

        s.eingabe(Eingabe::ZeigerRunter).await.unwrap();
        assert!(!s.eingabe(Eingabe::ZeigerVerlassen).await.unwrap());

        let mut toggle_sitzung = sitzung().0.mit_modus(PttMode::Toggle);
        toggle_sitzung.verbinden(&zugang()).await.unwrap();
        toggle_sitzung.eingabe(leertaste(false)).await.unwrap();
        assert!(toggle_sitzung.sendet());
        toggle_sitzung
            .eingabe(Eingabe::FensterVerliertFokus)
            .await
            .unwrap();
        assert!(!toggle_sitzung.sendet());
    }

    #[tokio::test]
    async fn toggle_modus_bleibt_nach_loslassen_offen() {
        let (s, _, _) = sitzung();
        let mut s = s.mit_modus(PttMode::Toggle);
        s.verbinden(&zugang()).await.unwrap();
        assert_eq!(s.status_text(), "Verbunden: Space druecken zum Sprechen");

        s.eingabe(Eingabe::ZeigerRunter).await.unwrap();
        assert!(s.eingabe(Eingabe::ZeigerHoch).await.unwrap());
        s.eingabe(Eingabe::ZeigerRunter).await.unwrap();
        assert!(!s.sendet());
    }

    #[tokio::test]
    async fn entfernte_audiospur_wird_einmal_angehaengt() {
        let (mut s, _, ap) = sitzung();
        s.verbinden(&zugang()).await.unwrap();

        let abonniert = RaumEreignis::SpurAbonniert {
            spur_sid: "TR_a".into(),
            art: SpurArt::Audio,
        };
        s.raum_ereignis(abonniert.clone());
        s.raum_ereignis(abonniert);
        s.raum_ereignis(RaumEreignis::SpurAbonniert {
            spur_sid: "TR_v".into(),
            art: SpurArt::Video,
        });
        assert!(s.agent_hoerbar());

        s.raum_ereignis(RaumEreignis::SpurAbbestellt {
            spur_sid: "TR_a".into(),
        });
        s.raum_ereignis(RaumEreignis::SpurAbbestellt {
            spur_sid: "TR_unbekannt".into(),
        });
        assert_eq!(*ap.lock(), vec!["+TR_a", "-TR_a"]);
        assert!(!s.agent_hoerbar());
    }

    #[tokio::test]
    async fn getrennt_ereignis_raeumt_auf() {
        let (mut s, rp, ap) = sitzung();
        s.verbinden(&zugang()).await.unwrap();
        s.raum_ereignis(RaumEreignis::SpurAbonniert {
            spur_sid: "TR_a".into(),
            art: SpurArt::Audio,
        });
        s.eingabe(Eingabe::ZeigerRunter).await.unwrap();
        rp.lock().clear();

        s.raum_ereignis(RaumEreignis::Getrennt);
        assert_eq!(*s.status(), VerbindungsStatus::Getrennt);
        assert!(!s.sendet());
        assert_eq!(*ap.lock(), vec!["+TR_a", "-TR_a"]);

        // Spur ist weg, weitere Eingaben erreichen sie nicht mehr
        s.eingabe(Eingabe::ZeigerRunter).await.unwrap();
        assert!(rp.lock().is_empty());
    }

    #[tokio::test]
    async fn fehlgeschlagene_verbindung_setzt_fehlerstatus() {
        let raum = TestRaum {
            verbindung_scheitert: true,
            ..TestRaum::default()
        };
        let mut s = PttSitzung::neu(raum, TestAusgabe::default());
        let err = s.verbinden(&zugang()).await.unwrap_err();
        assert!(matches!(err, PttError::Verbindung(_)));
        assert!(s.status_text().starts_with("Fehler: "));

        // Erneuter Versuch ist nach Fehler erlaubt
        assert!(matches!(
            s.verbinden(&zugang()).await,
            Err(PttError::Verbindung(_))
        ));
    }

    #[tokio::test]
    async fn fehlgeschlagenes_veroeffentlichen_trennt() {
        let raum = TestRaum {
            veroeffentlichen_scheitert: true,
            ..TestRaum::default()
        };
        let protokoll = raum.protokoll.clone();
        let mut s = PttSitzung::neu(raum, TestAusgabe::default());
        assert!(s.verbinden(&zugang()).await.is_err());
        assert_eq!(protokoll.lock().last().map(String::as_str), Some("trennen"));
        assert!(!s.ist_verbunden());
    }

    #[tokio::test]
    async fn spaetes_verbunden_nach_fehlschlag_wird_ignoriert() {
        let raum = TestRaum {
            veroeffentlichen_scheitert: true,
            ..TestRaum::default()
        };
        let mut s = PttSitzung::neu(raum, TestAusgabe::default());
        assert!(s.verbinden(&zugang()).await.is_err());

        s.raum_ereignis(RaumEreignis::Verbunden);
        assert!(!s.ist_verbunden());
        assert!(s.status_text().starts_with("Fehler: "));
        assert!(!s.eingabe(Eingabe::ZeigerRunter).await.unwrap());

        // Neuer Versuch scheitert am Mikrofon, nicht an einer Schein-Verbindung
        assert!(matches!(
            s.verbinden(&zugang()).await,
            Err(PttError::Veroeffentlichen(_))
        ));
    }

    #[tokio::test]
    async fn verbunden_ereignis_bestaetigt_bestehende_sitzung() {
        let (mut s, _, _) = sitzung();
        s.verbinden(&zugang()).await.unwrap();
        s.raum_ereignis(RaumEreignis::Verbunden);
        assert!(s.ist_verbunden());
        assert_eq!(s.status_text(), "Verbunden: Space halten zum Sprechen");
    }

    #[tokio::test]
    async fn toggle_nach_spurfehler_startet_neu() {
        let raum = TestRaum {
            spur_scheitert: true,
            ..TestRaum::default()
        };
        let mut s = PttSitzung::neu(raum, TestAusgabe::default()).mit_modus(PttMode::Toggle);
        s.verbinden(&zugang()).await.unwrap();

        assert!(s.eingabe(leertaste(false)).await.is_err());
        assert!(!s.sendet());
        // Der naechste Druck versucht erneut zu senden statt "auszuschalten"
        assert!(matches!(
            s.eingabe(leertaste(false)).await,
            Err(PttError::Spur(_))
        ));
    }

    #[tokio::test]
    async fn spurfehler_laesst_mikrofon_stumm() {
        let raum = TestRaum {
            spur_scheitert: true,
            ..TestRaum::default()
        };
        let mut s = PttSitzung::neu(raum, TestAusgabe::default());
        s.verbinden(&zugang()).await.unwrap();
        assert!(matches!(
            s.eingabe(Eingabe::ZeigerRunter).await,
            Err(PttError::Spur(_))
        ));
        assert!(!s.sendet());
    }

    #[tokio::test]
    async fn doppeltes_verbinden_abgelehnt() {
        let (mut s, _, _) = sitzung();
        s.verbinden(&zugang()).await.unwrap();
        assert!(matches!(
            s.verbinden(&zugang()).await,
            Err(PttError::BereitsVerbunden)
        ));
    }

    #[tokio::test]
    async fn trennen_gibt_alles_frei() {
        let (mut s, rp, ap) = sitzung();
        s.verbinden(&zugang()).await.unwrap();
        s.raum_ereignis(RaumEreignis::SpurAbonniert {
            spur_sid: "TR_a".into(),
            art: SpurArt::Audio,
        });
        s.trennen().await;
        assert_eq!(rp.lock().last().map(String::as_str), Some("trennen"));
        assert_eq!(*ap.lock(), vec!["+TR_a", "-TR_a"]);
        assert_eq!(s.status_text(), "Getrennt");

        // Zweites Trennen ist ein No-op
        rp.lock().clear();
        s.trennen().await;
        assert!(rp.lock().is_empty());
    }
}
