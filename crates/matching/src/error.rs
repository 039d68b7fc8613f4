//! Fehlertypen der Vermittlung

use tandem_db::DbError;
use thiserror::Error;

/// Fehler beim Vermitteln eines Nutzers
#[derive(Debug, Error)]
pub enum MatchError {
    /// Der Waiting-Pool ist nicht erreichbar
    ///
    /// Wird dem Nutzer als wiederholbarer Fehler gemeldet; es wird kein
    /// automatischer Retry versucht (kein Risiko doppelter Warteeintraege).
    #[error("Waiting-Pool nicht erreichbar: {0}")]
    StoreNichtErreichbar(#[from] DbError),
}
