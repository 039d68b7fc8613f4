//! tandem-db – Datenbank-Schicht
//!
//! Stellt das Repository-Pattern fuer die beiden durablen Bestaende des
//! Systems bereit: die Warteliste (Waiting-Pool des Matchers) und die
//! Checkpoints (Join-Vorbedingung). Raeume und Session-Bindings sind
//! bewusst NICHT persistent; sie leben im Signaling-Crate.

pub mod error;
pub mod models;
pub mod repository;
pub mod sqlite;

pub use error::DbError;
pub use repository::{CheckpointRepository, DatabaseConfig, DbResult, WaitingRepository};
pub use sqlite::SqliteDb;
