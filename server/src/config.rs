//! Server-Konfiguration
//!
//! Wird beim Start aus einer TOML-Datei geladen und danach von Umgebungs-
//! variablen ueberschrieben (`.env.local` und `.env` werden vorher eingelesen).
//! Alle Felder haben Standardwerte, sodass der Server ohne Konfigurationsdatei
//! lauffaehig ist.

use std::path::Path;

use serde::{Deserialize, Serialize};
use talkroom_observability::{log_format_gueltig, log_level_gueltig};

/// Vollstaendige Server-Konfiguration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// HTTP-Einstellungen
    pub server: ServerEinstellungen,
    /// Zugang zum Medien-Dienst
    pub medien: MedienEinstellungen,
    /// Agent-Dispatch
    pub agent: AgentEinstellungen,
    /// OAuth-Status der Zusatzdienste
    pub auth: AuthEinstellungen,
    /// Logging-Einstellungen
    pub logging: LoggingEinstellungen,
}

/// HTTP-Einstellungen
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerEinstellungen {
    pub bind_adresse: String,
    pub port: u16,
    /// Verzeichnis mit `index.html` und statischen Dateien
    pub statisch_verzeichnis: String,
    /// CORS-Origins (leer = alle erlaubt)
    pub cors_origins: Vec<String>,
}

impl Default for ServerEinstellungen {
    fn default() -> Self {
        Self {
            bind_adresse: "0.0.0.0".into(),
            port: 8000,
            statisch_verzeichnis: "frontend".into(),
            cors_origins: vec![],
        }
    }
}

/// Zugang zum Medien-Dienst
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MedienEinstellungen {
    /// Adresse des Dienstes (wss://...)
    pub url: Option<String>,
    pub api_key: Option<String>,
    pub api_secret: Option<String>,
    /// Raumname = `<praefix>-<sitzungs-id>`
    pub raum_praefix: String,
    pub token_ttl_sekunden: i64,
}

impl Default for MedienEinstellungen {
    fn default() -> Self {
        Self {
            url: None,
            api_key: None,
            api_secret: None,
            raum_praefix: "ptt-room".into(),
            token_ttl_sekunden: talkroom_token::STANDARD_TTL_SEKUNDEN,
        }
    }
}

/// Agent-Dispatch nach der Token-Ausgabe
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentEinstellungen {
    pub dispatch_aktiviert: bool,
    /// Name des Agenten (leer = Standard-Agent des Dienstes)
    pub agent_name: String,
    pub timeout_ms: u64,
}

impl Default for AgentEinstellungen {
    fn default() -> Self {
        Self {
            dispatch_aktiviert: true,
            agent_name: String::new(),
            timeout_ms: 5000,
        }
    }
}

/// Dateien und Tokens fuer den Auth-Status (Google, GitHub)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthEinstellungen {
    pub token_datei: String,
    pub credentials_datei: String,
    pub github_token: Option<String>,
    /// Inhalt eines Google-Tokens (Produktion, statt Datei)
    pub google_token_json: Option<String>,
}

impl Default for AuthEinstellungen {
    fn default() -> Self {
        Self {
            token_datei: "token.json".into(),
            credentials_datei: "credentials.json".into(),
            github_token: None,
            google_token_json: None,
        }
    }
}

/// Logging-Einstellungen
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingEinstellungen {
    /// Log-Level: "trace", "debug", "info", "warn", "error"
    pub level: String,
    /// Format: "json" oder "text"
    pub format: String,
}

impl Default for LoggingEinstellungen {
    fn default() -> Self {
        Self {
            level: "info".into(),
            format: "text".into(),
        }
    }
}

/// Vollstaendige Zugangsdaten fuer den Medien-Dienst
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MedienZugang {
    pub url: String,
    pub api_key: String,
    pub api_secret: String,
}

impl ServerConfig {
    /// Laedt die Konfiguration aus einer TOML-Datei.
    /// Gibt die Standardkonfiguration zurueck wenn die Datei nicht existiert.
    pub fn laden(pfad: &str) -> anyhow::Result<Self> {
        match std::fs::read_to_string(pfad) {
            Ok(inhalt) => {
                let config: Self = toml::from_str(&inhalt)
                    .map_err(|e| anyhow::anyhow!("Konfigurationsfehler in '{pfad}': {e}"))?;
                config
                    .pruefen()
                    .map_err(|e| anyhow::anyhow!("Konfigurationsfehler in '{pfad}': {e}"))?;
                Ok(config)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(anyhow::anyhow!(
                "Konfigurationsdatei '{pfad}' nicht lesbar: {e}"
            )),
        }
    }

    /// Liest `.env.local` und `.env`, laedt die Datei und wendet die Umgebung an.
    ///
    /// Gibt zusaetzlich Warnungen zurueck, die erst nach der
    /// Logging-Initialisierung ausgegeben werden koennen.
    pub fn aus_umgebung_laden(pfad: &str) -> anyhow::Result<(Self, Vec<String>)> {
        // Bereits gesetzte Variablen werden nicht ueberschrieben, .env.local gewinnt
        let mut warnungen: Vec<String> = [".env.local", ".env"]
            .into_iter()
            .filter_map(env_datei_laden)
            .collect();

        if !Path::new(pfad).exists() {
            warnungen.push(format!(
                "Konfigurationsdatei '{pfad}' nicht gefunden, verwende Standardwerte"
            ));
        }

        let mut config = Self::laden(pfad)?;
        config.umgebung_anwenden(|name| std::env::var(name).ok())?;
        Ok((config, warnungen))
    }

    /// Prueft Werte, die serde allein nicht abfangen kann
    pub fn pruefen(&self) -> anyhow::Result<()> {
        if !log_level_gueltig(&self.logging.level) {
            anyhow::bail!(
                "logging.level '{}' ungueltig (trace, debug, info, warn, error)",
                self.logging.level
            );
        }
        if !log_format_gueltig(&self.logging.format) {
            anyhow::bail!(
                "logging.format '{}' ungueltig (text, json)",
                self.logging.format
            );
        }
        Ok(())
    }

    /// Ueberschreibt Felder aus Umgebungsvariablen
    pub fn umgebung_anwenden<F>(&mut self, lesen: F) -> anyhow::Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let wert = |name: &str| lesen(name).filter(|w| !w.trim().is_empty());

        if let Some(url) = wert("LIVEKIT_URL") {
            self.medien.url = Some(url);
        }
        if let Some(key) = wert("LIVEKIT_API_KEY") {
            self.medien.api_key = Some(key);
        }
        if let Some(secret) = wert("LIVEKIT_API_SECRET") {
            self.medien.api_secret = Some(secret);
        }
        if let Some(port) = wert("PORT") {
            self.server.port = port
                .parse()
                .map_err(|e| anyhow::anyhow!("PORT '{port}' ungueltig: {e}"))?;
        }
        if let Some(token) = wert("GITHUB_TOKEN") {
            self.auth.github_token = Some(token);
        }
        if let Some(json) = wert("GOOGLE_TOKEN_JSON") {
            self.auth.google_token_json = Some(json);
        }
        Ok(())
    }

    /// Gibt die Zugangsdaten zurueck wenn URL, Schluessel und Secret gesetzt sind
    pub fn medien_zugang(&self) -> Option<MedienZugang> {
        let nicht_leer = |wert: &Option<String>| wert.clone().filter(|w| !w.is_empty());
        Some(MedienZugang {
            url: nicht_leer(&self.medien.url)?,
            api_key: nicht_leer(&self.medien.api_key)?,
            api_secret: nicht_leer(&self.medien.api_secret)?,
        })
    }

    /// Gibt die vollstaendige Bind-Adresse zurueck
    pub fn bind_adresse(&self) -> String {
        format!("{}:{}", self.server.bind_adresse, self.server.port)
    }
}

/// Laedt eine dotenv-Datei; eine fehlende Datei ist kein Fehler
fn env_datei_laden(datei: &str) -> Option<String> {
    match dotenvy::from_filename(datei) {
        Ok(_) => None,
        Err(e) if e.not_found() => None,
        Err(e) => Some(format!("{datei} nicht geladen: {e}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn umgebung(paare: &[(&str, &str)]) -> HashMap<String, String> {
        paare
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn standard_config_ist_valide() {
        let cfg = ServerConfig::default();
        assert_eq!(cfg.server.port, 8000);
        assert_eq!(cfg.bind_adresse(), "0.0.0.0:8000");
        assert_eq!(cfg.medien.token_ttl_sekunden, 3600);
        assert!(cfg.agent.dispatch_aktiviert);
        assert!(cfg.medien_zugang().is_none());
    }

    #[test]
    fn config_aus_toml_string() {
        let toml = r#"
            [server]
            port = 9000

            [medien]
            raum_praefix = "demo"

            [agent]
            agent_name = "stimme"
        "#;
        let cfg: ServerConfig = toml::from_str(toml).unwrap();
        assert_eq!(cfg.server.port, 9000);
        assert_eq!(cfg.medien.raum_praefix, "demo");
        assert_eq!(cfg.agent.agent_name, "stimme");
        // Nicht angegebene Felder behalten Standardwerte
        assert_eq!(cfg.server.statisch_verzeichnis, "frontend");
        assert_eq!(cfg.agent.timeout_ms, 5000);
    }

    #[test]
    fn umgebung_ueberschreibt_datei() {
        let env = umgebung(&[
            ("LIVEKIT_URL", "wss://medien.example"),
            ("LIVEKIT_API_KEY", "APIkey"),
            ("LIVEKIT_API_SECRET", "geheim"),
            ("PORT", "8123"),
            ("GITHUB_TOKEN", "ghp_x"),
        ]);
        let mut cfg = ServerConfig::default();
        cfg.umgebung_anwenden(|k| env.get(k).cloned()).unwrap();

        assert_eq!(cfg.server.port, 8123);
        assert_eq!(cfg.auth.github_token.as_deref(), Some("ghp_x"));
        assert_eq!(
            cfg.medien_zugang(),
            Some(MedienZugang {
                url: "wss://medien.example".into(),
                api_key: "APIkey".into(),
                api_secret: "geheim".into(),
            })
        );
    }

    #[test]
    fn leere_variablen_werden_ignoriert() {
        let env = umgebung(&[("LIVEKIT_URL", "  "), ("PORT", "")]);
        let mut cfg = ServerConfig::default();
        cfg.umgebung_anwenden(|k| env.get(k).cloned()).unwrap();
        assert!(cfg.medien.url.is_none());
        assert_eq!(cfg.server.port, 8000);
    }

    #[test]
    fn ungueltiger_port_ist_fehler() {
        let env = umgebung(&[("PORT", "achtzig")]);
        let mut cfg = ServerConfig::default();
        assert!(cfg.umgebung_anwenden(|k| env.get(k).cloned()).is_err());
    }

    #[test]
    fn unvollstaendiger_zugang() {
        let mut cfg = ServerConfig::default();
        cfg.medien.url = Some("wss://x".into());
        cfg.medien.api_key = Some("k".into());
        cfg.medien.api_secret = Some(String::new());
        assert!(cfg.medien_zugang().is_none());
    }

    #[test]
    fn fehlende_datei_liefert_standard() {
        let cfg = ServerConfig::laden("/gibt/es/nicht.toml").unwrap();
        assert_eq!(cfg.server.port, 8000);
    }

    #[test]
    fn ungueltiges_logging_wird_abgelehnt() {
        let verzeichnis = tempfile::tempdir().unwrap();
        let pfad = verzeichnis.path().join("config.toml");
        let pfad_str = pfad.to_string_lossy();

        std::fs::write(&pfad, "[logging]\nlevel = \"laut\"\n").unwrap();
        let fehler = ServerConfig::laden(&pfad_str).unwrap_err().to_string();
        assert!(fehler.contains("logging.level"), "{fehler}");

        std::fs::write(&pfad, "[logging]\nformat = \"xml\"\n").unwrap();
        let fehler = ServerConfig::laden(&pfad_str).unwrap_err().to_string();
        assert!(fehler.contains("logging.format"), "{fehler}");

        std::fs::write(&pfad, "[logging]\nlevel = \"debug\"\nformat = \"json\"\n").unwrap();
        let cfg = ServerConfig::laden(&pfad_str).unwrap();
        assert_eq!(cfg.logging.format, "json");
    }

    #[test]
    fn fehlende_env_datei_ist_still() {
        assert!(env_datei_laden("/gibt/es/nicht/.env.local").is_none());
    }

    #[test]
    fn kaputte_env_datei_wird_gemeldet() {
        let verzeichnis = tempfile::tempdir().unwrap();
        let pfad = verzeichnis.path().join(".env.local");
        std::fs::write(&pfad, "TALKROOM_TEST_KAPUTT=\"nicht beendet\n").unwrap();

        let warnung = env_datei_laden(&pfad.to_string_lossy()).unwrap();
        assert!(warnung.contains(".env.local nicht geladen"), "{warnung}");
    }
}
