//! Datenbankmodelle fuer Tandem
//!
//! Diese Typen repraesentieren Datensaetze aus der Datenbank. Sie sind von
//! den Protokoll-Typen getrennt und dienen als reine Datenuebertragungsobjekte.

use chrono::{DateTime, Utc};
use tandem_core::{Language, RoomId};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Warteliste
// ---------------------------------------------------------------------------

/// Warteliste-Datensatz aus der Datenbank
///
/// Sichtbar fuer den Matcher nur bis zum Konsum; der Konsum loescht den
/// Eintrag in derselben Anweisung (at-most-once).
#[derive(Debug, Clone)]
pub struct WartenderEintrag {
    pub room_id: RoomId,
    pub display_name: String,
    /// Sprache die der Wartende lernt
    pub language: Language,
    pub level: u8,
    pub created_at: DateTime<Utc>,
}

/// Daten zum Anlegen eines neuen Warteliste-Eintrags
#[derive(Debug, Clone)]
pub struct NeuerWartender<'a> {
    pub room_id: &'a RoomId,
    pub display_name: &'a str,
    pub language: Language,
    pub level: u8,
}

// ---------------------------------------------------------------------------
// Checkpoints
// ---------------------------------------------------------------------------

/// Checkpoint-Datensatz aus der Datenbank
#[derive(Debug, Clone)]
pub struct CheckpointRecord {
    pub ticket: Uuid,
    pub room_id: RoomId,
    pub display_name: String,
    pub mute_audio: bool,
    pub mute_video: bool,
    pub created_at: DateTime<Utc>,
}

/// Daten zum Hinterlegen eines neuen Checkpoints
#[derive(Debug, Clone)]
pub struct NeuerCheckpoint<'a> {
    pub room_id: &'a RoomId,
    pub display_name: &'a str,
    pub mute_audio: bool,
    pub mute_video: bool,
}
