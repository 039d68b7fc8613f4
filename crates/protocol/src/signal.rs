//! Signaling-Protokoll
//!
//! Definiert alle Nachrichten die ueber die persistente TCP-Verbindung
//! zwischen Client und Server ausgetauscht werden.
//!
//! ## Design
//! - Request/Response Pattern: jede Nachricht hat eine `request_id: u32`
//! - JSON-Serialisierung via serde (TCP, nicht zeitkritisch)
//! - Tagged Enum mit kebab-case Wire-Tags (`join-room`, `user-list`, ...)
//! - Verhandlungs-Payloads (`data`) sind fuer den Server opak; er leitet
//!   sie unveraendert an den Ziel-Peer weiter

use serde::{Deserialize, Serialize};
use tandem_core::{Language, PeerId, RoomId};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Fehler-Codes
// ---------------------------------------------------------------------------

/// Standardisierte Fehler-Codes fuer Error-Responses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // Allgemein
    InternalError,
    InvalidRequest,
    // Vermittlung
    StoreUnavailable,
    // Raum
    NotCheckpointed,
    RoomFull,
    AlreadyInRoom,
}

// ---------------------------------------------------------------------------
// Vermittlungs-Nachrichten
// ---------------------------------------------------------------------------

/// Anfrage nach einem Gespraechspartner
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FindCompanionRequest {
    /// Anzeigename des Suchenden
    pub display_name: String,
    /// Sprache die der Suchende lernt
    pub language: Language,
    /// Sprachniveau (exakter Abgleich, keine Toleranz)
    pub level: u8,
}

/// Ergebnis der Vermittlung
///
/// `matched = true`: ein wartender Partner wurde konsumiert, beide Seiten
/// landen im selben Raum. `matched = false`: der Suchende wartet nun selbst
/// unter `room_id` auf einen Partner.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompanionResult {
    pub room_id: RoomId,
    pub matched: bool,
}

// ---------------------------------------------------------------------------
// Checkpoint-Nachrichten
// ---------------------------------------------------------------------------

/// Hinterlegt Anzeigename und Medien-Voreinstellungen fuer einen Raum
///
/// Muss vor `join-room` erfolgen; ohne Checkpoint schlaegt der Beitritt
/// mit `NOT_CHECKPOINTED` fehl.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckpointRequest {
    pub room_id: RoomId,
    pub display_name: String,
    pub mute_audio: bool,
    pub mute_video: bool,
}

/// Bestaetigung des Checkpoints
///
/// Das Ticket identifiziert den Checkpoint beim Beitritt. Zwei Teilnehmer
/// desselben Raums haben verschiedene Tickets.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckpointOk {
    pub room_id: RoomId,
    pub ticket: Uuid,
}

// ---------------------------------------------------------------------------
// Raum-Nachrichten
// ---------------------------------------------------------------------------

/// Beitritt zu einem Raum
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JoinRoomRequest {
    pub room_id: RoomId,
    /// Ticket aus der Checkpoint-Bestaetigung
    pub ticket: Uuid,
}

/// Ein Raum-Teilnehmer (Verbindungs-ID + Anzeigename)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomOccupant {
    pub sid: PeerId,
    pub name: String,
}

/// Antwort an den Beitretenden
///
/// Der erste Teilnehmer bekommt nur seine eigene ID. Spaetere Teilnehmer
/// bekommen zusaetzlich die Liste der bereits Anwesenden (in
/// Beitritts-Reihenfolge), um das Signaling zu initiieren. Bestehende
/// Teilnehmer erfahren vom Neuzugang nur via `user-connect` – so gibt es
/// keine doppelte Entdeckung.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserListResponse {
    pub my_id: PeerId,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub list: Option<Vec<RoomOccupant>>,
}

/// Benachrichtigung an bestehende Teilnehmer: neuer Peer im Raum
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserConnectEvent {
    pub sid: PeerId,
    pub name: String,
}

/// Benachrichtigung: Peer hat den Raum verlassen
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserDisconnectEvent {
    pub sid: PeerId,
}

// ---------------------------------------------------------------------------
// Relay-Nachrichten
// ---------------------------------------------------------------------------

/// Verhandlungs-Typ der vom ausfuehrlichen Logging ausgenommen ist
/// (ICE-Kandidaten kommen im Sekundentakt)
pub const ICE_CANDIDATE_KIND: &str = "new-ice-candidate";

/// Punkt-zu-Punkt Verhandlungsnachricht (Offer, Answer, ICE-Kandidat)
///
/// Der Server interpretiert nur `sender_id` und `target_id`; `kind` dient
/// ausschliesslich der Log-Drosselung, `payload` bleibt opak.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignalData {
    /// Verhandlungs-Typ (z.B. "offer", "answer", "new-ice-candidate")
    pub kind: String,
    pub sender_id: PeerId,
    pub target_id: PeerId,
    /// Opaker Verhandlungsinhalt (SDP, Kandidaten, ...)
    pub payload: serde_json::Value,
}

// ---------------------------------------------------------------------------
// Keepalive
// ---------------------------------------------------------------------------

/// Ping (Client -> Server oder Server -> Client)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PingMessage {
    /// Unix-Timestamp in Millisekunden fuer RTT-Messung
    pub timestamp_ms: u64,
}

/// Pong-Antwort (spiegelt Timestamp zurueck)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PongMessage {
    /// Originaler Timestamp aus dem Ping
    pub echo_timestamp_ms: u64,
    /// Server-eigener Timestamp
    pub server_timestamp_ms: u64,
}

// ---------------------------------------------------------------------------
// Haupt-Enum: SignalPayload
// ---------------------------------------------------------------------------

/// Alle moeglichen Signaling-Nachrichten (typsicher via Tagged Enum)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum SignalPayload {
    // Vermittlung
    FindCompanion(FindCompanionRequest),
    CompanionResult(CompanionResult),

    // Checkpoint
    Checkpoint(CheckpointRequest),
    CheckpointOk(CheckpointOk),

    // Raum
    JoinRoom(JoinRoomRequest),
    UserList(UserListResponse),
    UserConnect(UserConnectEvent),
    UserDisconnect(UserDisconnectEvent),

    // Relay (beide Richtungen, wird unveraendert durchgereicht)
    Data(SignalData),

    // Keepalive
    Ping(PingMessage),
    Pong(PongMessage),

    // Error
    Error(ErrorResponse),
}

/// Standardisierte Fehler-Antwort
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub code: ErrorCode,
    pub message: String,
}

// ---------------------------------------------------------------------------
// Signal-Frame (Umschlag fuer alle Nachrichten)
// ---------------------------------------------------------------------------

/// Signaling-Nachricht mit Request/Response-Zuordnung
///
/// Jede Nachricht traegt eine `request_id` die der Client vergibt.
/// Der Server kopiert die ID in die Antwort damit der Client Request und
/// Response zuordnen kann. Server-initiierte Ereignisse (user-connect,
/// user-disconnect, weitergeleitete data) tragen `request_id = 0`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignalMessage {
    /// Eindeutige Nachrichten-ID fuer Request/Response-Zuordnung
    pub request_id: u32,
    /// Inhalt der Nachricht
    pub payload: SignalPayload,
}

impl SignalMessage {
    /// Erstellt eine neue Signaling-Nachricht
    pub fn new(request_id: u32, payload: SignalPayload) -> Self {
        Self {
            request_id,
            payload,
        }
    }

    /// Erstellt ein Server-Ereignis (ohne Request-Zuordnung)
    pub fn ereignis(payload: SignalPayload) -> Self {
        Self::new(0, payload)
    }

    /// Erstellt eine Ping-Nachricht
    pub fn ping(request_id: u32, timestamp_ms: u64) -> Self {
        Self::new(request_id, SignalPayload::Ping(PingMessage { timestamp_ms }))
    }

    /// Erstellt eine Pong-Antwort
    pub fn pong(request_id: u32, echo_timestamp_ms: u64, server_timestamp_ms: u64) -> Self {
        Self::new(
            request_id,
            SignalPayload::Pong(PongMessage {
                echo_timestamp_ms,
                server_timestamp_ms,
            }),
        )
    }

    /// Erstellt eine Fehler-Antwort
    pub fn error(request_id: u32, code: ErrorCode, message: impl Into<String>) -> Self {
        Self::new(
            request_id,
            SignalPayload::Error(ErrorResponse {
                code,
                message: message.into(),
            }),
        )
    }

    /// Serialisiert die Nachricht als JSON
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Deserialisiert eine Nachricht aus JSON
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
