//! Peer-Directory – Send-Queues aller verbundenen Peers
//!
//! Das Directory verwaltet die ausgehenden Queues aller Verbindungen und
//! stellt Methoden bereit, um Nachrichten gezielt an einzelne Peers oder
//! eine Teilnehmerliste zu senden. Zustellung ist best-effort: volle oder
//! geschlossene Queues verwerfen die Nachricht.

use dashmap::DashMap;
use std::sync::Arc;
use tandem_core::PeerId;
use tandem_protocol::SignalMessage;
use tokio::sync::mpsc;

/// Groesse der Send-Queue pro Peer
const SEND_QUEUE_GROESSE: usize = 64;

// ---------------------------------------------------------------------------
// PeerSender
// ---------------------------------------------------------------------------

/// Handle auf die Send-Queue eines verbundenen Peers
#[derive(Clone, Debug)]
pub struct PeerSender {
    pub peer_id: PeerId,
    pub tx: mpsc::Sender<SignalMessage>,
}

impl PeerSender {
    /// Sendet eine Nachricht nicht-blockierend an den Peer
    ///
    /// Gibt `false` zurueck wenn die Queue voll oder geschlossen ist.
    pub fn senden(&self, nachricht: SignalMessage) -> bool {
        match self.tx.try_send(nachricht) {
            Ok(()) => true,
            Err(mpsc::error::TrySendError::Full(_)) => {
                tracing::warn!(peer_id = %self.peer_id, "Send-Queue voll – Nachricht verworfen");
                false
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                tracing::debug!(peer_id = %self.peer_id, "Send-Queue geschlossen (Peer getrennt)");
                false
            }
        }
    }
}

// ---------------------------------------------------------------------------
// PeerDirectory
// ---------------------------------------------------------------------------

/// Verzeichnis aller aktiven Verbindungen
///
/// Thread-safe via Arc + DashMap. Clone teilt den inneren Zustand.
#[derive(Clone)]
pub struct PeerDirectory {
    inner: Arc<PeerDirectoryInner>,
}

struct PeerDirectoryInner {
    peers: DashMap<PeerId, PeerSender>,
}

impl PeerDirectory {
    /// Erstellt ein neues PeerDirectory
    pub fn neu() -> Self {
        Self {
            inner: Arc::new(PeerDirectoryInner {
                peers: DashMap::new(),
            }),
        }
    }

    /// Registriert einen neuen Peer und gibt seine Empfangs-Queue zurueck
    ///
    /// Die `ClientConnection` liest aus dieser Queue und sendet via TCP.
    pub fn registrieren(&self, peer_id: PeerId) -> mpsc::Receiver<SignalMessage> {
        let (tx, rx) = mpsc::channel(SEND_QUEUE_GROESSE);
        self.inner.peers.insert(peer_id, PeerSender { peer_id, tx });
        tracing::debug!(peer_id = %peer_id, "Peer im Directory registriert");
        rx
    }

    /// Entfernt einen Peer aus dem Directory
    pub fn entfernen(&self, peer_id: &PeerId) {
        self.inner.peers.remove(peer_id);
        tracing::debug!(peer_id = %peer_id, "Peer aus Directory entfernt");
    }

    /// Sendet eine Nachricht an einen einzelnen Peer
    ///
    /// Gibt `true` zurueck wenn der Peer gefunden und die Nachricht
    /// eingereiht wurde. Unbekannte Peers sind kein Fehler – Signaling
    /// ist best-effort.
    pub fn an_peer_senden(&self, peer_id: &PeerId, nachricht: SignalMessage) -> bool {
        match self.inner.peers.get(peer_id) {
            Some(sender) => sender.senden(nachricht),
            None => {
                tracing::debug!(peer_id = %peer_id, "Senden an unbekannten Peer verworfen");
                false
            }
        }
    }

    /// Sendet eine Nachricht an mehrere Peers
    ///
    /// Gibt die Anzahl der erfolgreichen Sendungen zurueck.
    pub fn an_mehrere_senden(&self, peer_ids: &[PeerId], nachricht: SignalMessage) -> usize {
        let mut gesendet = 0;
        for peer_id in peer_ids {
            if let Some(sender) = self.inner.peers.get(peer_id) {
                if sender.senden(nachricht.clone()) {
                    gesendet += 1;
                }
            }
        }
        gesendet
    }

    /// Gibt die Anzahl der registrierten Peers zurueck
    pub fn anzahl(&self) -> usize {
        self.inner.peers.len()
    }

    /// Prueft ob ein Peer registriert ist
    pub fn ist_registriert(&self, peer_id: &PeerId) -> bool {
        self.inner.peers.contains_key(peer_id)
    }
}

impl Default for PeerDirectory {
    fn default() -> Self {
        Self::neu()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn test_nachricht(id: u32) -> SignalMessage {
        SignalMessage::ping(id, 12345)
    }

    #[tokio::test]
    async fn registrieren_und_senden() {
        let directory = PeerDirectory::neu();
        let peer = PeerId::new();

        let mut rx = directory.registrieren(peer);
        assert!(directory.ist_registriert(&peer));

        assert!(directory.an_peer_senden(&peer, test_nachricht(1)));
        let empfangen = rx.try_recv().expect("Nachricht muss vorhanden sein");
        assert_eq!(empfangen.request_id, 1);
    }

    #[tokio::test]
    async fn senden_an_unbekannten_peer_wird_verworfen() {
        let directory = PeerDirectory::neu();
        assert!(!directory.an_peer_senden(&PeerId::new(), test_nachricht(1)));
    }

    #[tokio::test]
    async fn an_mehrere_senden() {
        let directory = PeerDirectory::neu();
        let p1 = PeerId::new();
        let p2 = PeerId::new();

        let mut rx1 = directory.registrieren(p1);
        let mut rx2 = directory.registrieren(p2);

        let gesendet = directory.an_mehrere_senden(&[p1, p2, PeerId::new()], test_nachricht(7));
        assert_eq!(gesendet, 2);
        assert!(rx1.try_recv().is_ok());
        assert!(rx2.try_recv().is_ok());
    }

    #[tokio::test]
    async fn entfernter_peer_empfaengt_nichts() {
        let directory = PeerDirectory::neu();
        let peer = PeerId::new();

        let _rx = directory.registrieren(peer);
        directory.entfernen(&peer);

        assert!(!directory.ist_registriert(&peer));
        assert!(!directory.an_peer_senden(&peer, test_nachricht(2)));
    }

    #[tokio::test]
    async fn volle_queue_verwirft_nachricht() {
        let directory = PeerDirectory::neu();
        let peer = PeerId::new();
        let _rx = directory.registrieren(peer);

        for i in 0..SEND_QUEUE_GROESSE as u32 {
            assert!(directory.an_peer_senden(&peer, test_nachricht(i)));
        }
        // Queue ist voll, naechste Sendung scheitert ohne zu blockieren
        assert!(!directory.an_peer_senden(&peer, test_nachricht(999)));
    }
}
