//! Gemeinsame Identifikationstypen fuer Tandem
//!
//! Alle IDs verwenden das Newtype-Pattern um Verwechslungen zwischen
//! verschiedenen ID-Arten zur Compilezeit auszuschliessen.

use rand::RngCore;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Anzahl der Zufallsbytes fuer ein Raum-Token
const RAUM_TOKEN_BYTES: usize = 8;

/// Eindeutige Verbindungs-ID eines Peers
///
/// Gueltig fuer die Lebensdauer genau einer Verbindung. Nach einem
/// Reconnect bekommt derselbe Benutzer eine neue PeerId.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PeerId(pub Uuid);

impl PeerId {
    /// Erstellt eine neue zufaellige PeerId
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Gibt die innere UUID zurueck
    pub fn inner(&self) -> Uuid {
        self.0
    }
}

impl Default for PeerId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for PeerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "peer:{}", self.0)
    }
}

/// Opakes Raum-Token
///
/// Kryptografisch zufaellig und URL-sicher (hex-kodiert). Das Token wird
/// vom Matcher erzeugt und von allen weiteren Schritten (Checkpoint, Join,
/// Broadcasts) unveraendert durchgereicht.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RoomId(pub String);

impl RoomId {
    /// Erzeugt ein frisches, nicht erratbares Raum-Token
    pub fn generieren() -> Self {
        use std::fmt::Write as _;

        let mut bytes = [0u8; RAUM_TOKEN_BYTES];
        rand::rng().fill_bytes(&mut bytes);
        let mut token = String::with_capacity(RAUM_TOKEN_BYTES * 2);
        for b in bytes {
            // write! in einen String ist unfehlbar
            let _ = write!(token, "{b:02x}");
        }
        Self(token)
    }

    /// Gibt das Token als String-Slice zurueck
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for RoomId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for RoomId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Die beiden Sprachen des Austauschsystems
///
/// Ein Lernender der einen Sprache wird mit einem Lernenden der jeweils
/// anderen Sprache zusammengebracht.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Kaz,
    Eng,
}

impl Language {
    /// Gibt die komplementaere Sprache zurueck
    pub fn gegenstueck(&self) -> Self {
        match self {
            Self::Kaz => Self::Eng,
            Self::Eng => Self::Kaz,
        }
    }

    pub fn als_str(&self) -> &'static str {
        match self {
            Self::Kaz => "kaz",
            Self::Eng => "eng",
        }
    }
}

impl std::str::FromStr for Language {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "kaz" => Ok(Self::Kaz),
            "eng" => Ok(Self::Eng),
            other => Err(format!("Unbekannte Sprache: {other}")),
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.als_str())
    }
}
