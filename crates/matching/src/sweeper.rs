//! Ablauf-Waechter – Raeumt veraltete Warteeintraege periodisch ab
//!
//! Wartende, die nie einen Partner gefunden haben, wuerden sonst dauerhaft
//! im Pool liegen. Der Waechter loescht Eintraege nach Ablauf der TTL.

use std::time::Duration;
use tandem_db::WaitingRepository;
use tokio::sync::watch;
use tracing::{info, warn};

use crate::matcher::{Matcher, MatchingConfig};

/// Periodischer Aufraeum-Task fuer den Waiting-Pool
pub struct AblaufWaechter<W> {
    matcher: Matcher<W>,
    intervall: Duration,
}

impl<W: WaitingRepository> AblaufWaechter<W> {
    /// Erstellt einen neuen Waechter ueber dem Matcher
    pub fn neu(matcher: Matcher<W>, config: &MatchingConfig) -> Self {
        Self {
            matcher,
            intervall: Duration::from_secs(config.aufraeum_intervall_sek.max(1)),
        }
    }

    /// Laeuft bis das Shutdown-Signal eintrifft
    pub async fn laufen(self, mut shutdown: watch::Receiver<bool>) {
        let mut ticker = tokio::time::interval(self.intervall);
        // Der erste Tick feuert sofort; ueberspringen
        ticker.tick().await;

        info!(intervall_sek = self.intervall.as_secs(), "Ablauf-Waechter gestartet");

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    if let Err(e) = self.matcher.abgelaufene_aufraeumen().await {
                        warn!(fehler = %e, "Aufraeumen des Waiting-Pools fehlgeschlagen");
                    }
                }
                _ = shutdown.changed() => {
                    if *shutdown.borrow() {
                        info!("Ablauf-Waechter beendet");
                        return;
                    }
                }
            }
        }
    }
}
