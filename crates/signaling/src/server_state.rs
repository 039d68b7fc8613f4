//! Gemeinsamer Server-Zustand fuer den Signaling-Service
//!
//! Haelt alle geteilten Services und Zustands-Manager als Arc-Referenzen,
//! die sicher zwischen tokio-Tasks geteilt werden koennen.

use std::sync::Arc;
use std::time::Instant;
use tandem_db::{CheckpointRepository, WaitingRepository};
use tandem_matching::Matcher;

use crate::peers::PeerDirectory;
use crate::rooms::RoomRegistry;

/// Konfiguration fuer den Signaling-Service
#[derive(Debug, Clone, serde::Deserialize)]
#[serde(default)]
pub struct SignalingConfig {
    /// Maximale gleichzeitige Verbindungen
    pub max_clients: u32,
    /// Keepalive-Intervall in Sekunden
    pub keepalive_sek: u64,
    /// Timeout fuer inaktive Verbindungen in Sekunden
    pub verbindungs_timeout_sek: u64,
    /// Maximale Teilnehmer pro Raum (Zwei-Parteien-Gespraech)
    pub max_raum_groesse: usize,
}

impl Default for SignalingConfig {
    fn default() -> Self {
        Self {
            max_clients: 512,
            keepalive_sek: 30,
            verbindungs_timeout_sek: 90,
            max_raum_groesse: 2,
        }
    }
}

/// Gemeinsamer Server-Zustand (thread-safe, Arc-geteilt)
///
/// `D` ist der Store fuer Warteliste und Checkpoints; der Matcher teilt
/// sich denselben Store.
pub struct SignalingState<D>
where
    D: WaitingRepository + CheckpointRepository + Clone + 'static,
{
    /// Server-Konfiguration
    pub config: Arc<SignalingConfig>,
    /// Vermittlung wartender Nutzer
    pub matcher: Matcher<D>,
    /// Checkpoint-Store (Join-Vorbedingung)
    pub store: D,
    /// Raumbelegung und Session-Bindings
    pub rooms: RoomRegistry,
    /// Send-Queues aller verbundenen Peers
    pub peers: PeerDirectory,
    /// Startzeitpunkt des Servers (fuer Uptime-Berechnung)
    pub start_time: Instant,
}

impl<D> SignalingState<D>
where
    D: WaitingRepository + CheckpointRepository + Clone + 'static,
{
    /// Erstellt einen neuen SignalingState
    pub fn neu(config: SignalingConfig, matcher: Matcher<D>, store: D) -> Arc<Self> {
        Arc::new(Self {
            config: Arc::new(config),
            matcher,
            store,
            rooms: RoomRegistry::neu(),
            peers: PeerDirectory::neu(),
            start_time: Instant::now(),
        })
    }

    /// Gibt die Uptime in Sekunden zurueck
    pub fn uptime_sek(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_teilweise_angegeben_behaelt_standardwerte() {
        let cfg: SignalingConfig = serde_json::from_str(r#"{"max_clients": 64}"#).unwrap();
        assert_eq!(cfg.max_clients, 64);
        assert_eq!(cfg.keepalive_sek, 30);
        assert_eq!(cfg.max_raum_groesse, 2);
    }
}
