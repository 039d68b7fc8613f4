//! tandem-matching – Vermittlung wartender Nutzer
//!
//! Paarung von Gespraechspartnern mit komplementaeren Sprachen auf
//! demselben Niveau. Der Waiting-Pool liegt im tandem-db-Crate; dieses
//! Crate kapselt die Vermittlungslogik und ihre Atomaritaetsgarantien.

pub mod error;
pub mod matcher;
pub mod sweeper;

pub use error::MatchError;
pub use matcher::{MatchErgebnis, Matcher, MatchingConfig};
pub use sweeper::AblaufWaechter;
