//! Repository-Trait-Definitionen
//!
//! Das Repository-Pattern entkoppelt Matcher und Signaling-Service von der
//! konkreten Datenbank-Implementierung. Die Traits verwenden
//! `async_fn_in_trait` ohne Send-Garantie; die Verbindungs-Tasks laufen
//! deshalb in einer `tokio::task::LocalSet`.

use chrono::{DateTime, Utc};
use tandem_core::Language;
use uuid::Uuid;

use crate::error::DbError;
use crate::models::{CheckpointRecord, NeuerCheckpoint, NeuerWartender, WartenderEintrag};

/// Result-Typ fuer alle Repository-Operationen
pub type DbResult<T> = Result<T, DbError>;

/// Konfiguration fuer die Datenbankverbindung
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// Verbindungs-URL (z.B. "sqlite://tandem.db")
    pub url: String,
    /// Maximale Anzahl gleichzeitiger Verbindungen im Pool
    pub max_verbindungen: u32,
    /// Ob WAL-Modus aktiviert werden soll
    pub sqlite_wal: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite://tandem.db".into(),
            max_verbindungen: 5,
            sqlite_wal: true,
        }
    }
}

/// Repository fuer die Warteliste (durabler Waiting-Pool)
#[allow(async_fn_in_trait)]
pub trait WaitingRepository: Send + Sync {
    /// Konsumiert atomar den aeltesten passenden Eintrag
    ///
    /// Suche und Loeschung erfolgen in einer einzigen Anweisung
    /// (DELETE ... RETURNING), sodass kein zweiter Matcher denselben
    /// Eintrag konsumieren kann. Eintraege vor `mindest_erstellt` gelten
    /// als abgelaufen und werden nicht beruecksichtigt.
    ///
    /// Tie-Break bei mehreren Kandidaten: aelteste `created_at`, dann
    /// `room_id` (deterministisch).
    async fn passenden_konsumieren(
        &self,
        language: Language,
        level: u8,
        mindest_erstellt: DateTime<Utc>,
    ) -> DbResult<Option<WartenderEintrag>>;

    /// Legt einen neuen Warteliste-Eintrag an
    async fn eintragen(&self, daten: NeuerWartender<'_>) -> DbResult<WartenderEintrag>;

    /// Loescht alle Eintraege die vor `stichtag` angelegt wurden
    ///
    /// Gibt die Anzahl der entfernten Eintraege zurueck.
    async fn abgelaufene_entfernen(&self, stichtag: DateTime<Utc>) -> DbResult<u64>;

    /// Gibt die Anzahl der aktuell Wartenden zurueck
    async fn anzahl(&self) -> DbResult<u64>;
}

/// Repository fuer Checkpoints (Join-Vorbedingung)
///
/// Der Signaling-Service behandelt dieses Repository als Orakel: liefert
/// es fuer ein Ticket keinen Datensatz, schlaegt der Beitritt mit
/// `NOT_CHECKPOINTED` fehl.
#[allow(async_fn_in_trait)]
pub trait CheckpointRepository: Send + Sync {
    /// Hinterlegt einen Checkpoint und vergibt ein frisches Ticket
    async fn hinterlegen(&self, daten: NeuerCheckpoint<'_>) -> DbResult<CheckpointRecord>;

    /// Laedt einen Checkpoint anhand seines Tickets
    async fn laden(&self, ticket: Uuid) -> DbResult<Option<CheckpointRecord>>;

    /// Entfernt einen Checkpoint (nach erfolgreichem Beitritt)
    async fn entfernen(&self, ticket: Uuid) -> DbResult<bool>;
}
