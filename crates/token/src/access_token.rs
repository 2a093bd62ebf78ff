//! AccessToken-Builder und HS256-Signatur
//!
//! Ein Token besteht aus drei base64url-Segmenten (ohne Padding):
//! Header, Claims und HMAC-SHA256 ueber `header.claims`.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::Utc;
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;

use crate::claims::{Claims, VideoGrants};
use crate::error::{TokenError, TokenResult};

type HmacSha256 = Hmac<Sha256>;

/// Standard-Gueltigkeit eines Tokens (1 Stunde)
pub const STANDARD_TTL_SEKUNDEN: i64 = 3600;

/// Toleranz fuer Uhrenabweichung beim `nbf`-Claim
const NBF_PUFFER_SEKUNDEN: i64 = 10;

#[derive(Debug, Serialize, Deserialize)]
struct Header {
    alg: String,
    typ: String,
}

/// Builder fuer ein signiertes Zugangstoken
#[derive(Debug, Clone)]
pub struct AccessToken {
    api_key: String,
    api_secret: String,
    identitaet: String,
    name: Option<String>,
    metadaten: Option<String>,
    grants: VideoGrants,
    ttl_sekunden: i64,
}

impl AccessToken {
    pub fn neu(api_key: impl Into<String>, api_secret: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_secret: api_secret.into(),
            identitaet: String::new(),
            name: None,
            metadaten: None,
            grants: VideoGrants::default(),
            ttl_sekunden: STANDARD_TTL_SEKUNDEN,
        }
    }

    pub fn mit_identitaet(mut self, identitaet: impl Into<String>) -> Self {
        self.identitaet = identitaet.into();
        self
    }

    pub fn mit_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn mit_metadaten(mut self, metadaten: impl Into<String>) -> Self {
        self.metadaten = Some(metadaten.into());
        self
    }

    pub fn mit_grants(mut self, grants: VideoGrants) -> Self {
        self.grants = grants;
        self
    }

    pub fn mit_ttl(mut self, sekunden: i64) -> Self {
        self.ttl_sekunden = sekunden;
        self
    }

    /// Signiert das Token mit der aktuellen Uhrzeit
    pub fn to_jwt(&self) -> TokenResult<String> {
        self.to_jwt_zu(Utc::now().timestamp())
    }

    /// Signiert das Token relativ zum Zeitpunkt `jetzt` (Unix-Sekunden)
    pub fn to_jwt_zu(&self, jetzt: i64) -> TokenResult<String> {
        if self.api_key.is_empty() || self.api_secret.is_empty() {
            return Err(TokenError::ZugangsdatenFehlen);
        }
        if self.grants.room_join && self.identitaet.is_empty() {
            return Err(TokenError::IdentitaetFehlt);
        }

        let claims = Claims {
            exp: jetzt + self.ttl_sekunden,
            iss: self.api_key.clone(),
            nbf: jetzt - NBF_PUFFER_SEKUNDEN,
            sub: self.identitaet.clone(),
            jti: self.identitaet.clone(),
            name: self.name.clone(),
            metadata: self.metadaten.clone(),
            video: self.grants.clone(),
        };

        let header = Header {
            alg: "HS256".into(),
            typ: "JWT".into(),
        };

        let mut nachricht = URL_SAFE_NO_PAD.encode(serde_json::to_vec(&header)?);
        nachricht.push('.');
        nachricht.push_str(&URL_SAFE_NO_PAD.encode(serde_json::to_vec(&claims)?));

        let signatur = signieren(&self.api_secret, nachricht.as_bytes())?;
        nachricht.push('.');
        nachricht.push_str(&URL_SAFE_NO_PAD.encode(signatur));

        tracing::debug!(identitaet = %self.identitaet, exp = claims.exp, "Token signiert");
        Ok(nachricht)
    }
}

fn mac_fuer(secret: &str) -> TokenResult<HmacSha256> {
    HmacSha256::new_from_slice(secret.as_bytes()).map_err(|_| TokenError::ZugangsdatenFehlen)
}

fn signieren(secret: &str, daten: &[u8]) -> TokenResult<Vec<u8>> {
    let mut mac = mac_fuer(secret)?;
    mac.update(daten);
    Ok(mac.finalize().into_bytes().to_vec())
}

/// Prueft Signatur und Zeitfenster eines Tokens und gibt die Claims zurueck
pub fn verifizieren(jwt: &str, api_secret: &str, jetzt: i64) -> TokenResult<Claims> {
    let mut teile = jwt.split('.');
    let (Some(header_b64), Some(claims_b64), Some(signatur_b64), None) =
        (teile.next(), teile.next(), teile.next(), teile.next())
    else {
        return Err(TokenError::Format);
    };

    let header_roh = URL_SAFE_NO_PAD
        .decode(header_b64)
        .map_err(|_| TokenError::Format)?;
    let header: Header = serde_json::from_slice(&header_roh).map_err(|_| TokenError::Format)?;
    if header.alg != "HS256" {
        return Err(TokenError::Algorithmus(header.alg));
    }

    let signatur = URL_SAFE_NO_PAD
        .decode(signatur_b64)
        .map_err(|_| TokenError::Format)?;
    let mut mac = mac_fuer(api_secret)?;
    mac.update(header_b64.as_bytes());
    mac.update(b".");
    mac.update(claims_b64.as_bytes());
    mac.verify_slice(&signatur)
        .map_err(|_| TokenError::SignaturUngueltig)?;

    let claims_roh = URL_SAFE_NO_PAD
        .decode(claims_b64)
        .map_err(|_| TokenError::Format)?;
    let claims: Claims = serde_json::from_slice(&claims_roh).map_err(|_| TokenError::Format)?;

    if jetzt >= claims.exp {
        return Err(TokenError::Abgelaufen);
    }
    if jetzt < claims.nbf {
        return Err(TokenError::NochNichtGueltig);
    }
    Ok(claims)
}
