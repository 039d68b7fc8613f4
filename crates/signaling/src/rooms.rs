//! Room-Registry – Verwaltet Raumbelegung und Session-Bindings
//!
//! Wer ist in welchem Raum, unter welchem Namen? Die Registry haelt den
//! ephemeren Zustand aller beigetretenen Verbindungen. Raeume entstehen
//! mit dem ersten Beitritt und verschwinden mit dem letzten Austritt;
//! nichts davon ist persistent.
//!
//! ## Linearisierung
//! Beitritt und Austritt mutieren die Belegung unter dem Eintrags-Lock
//! des jeweiligen Raums und geben die Momentaufnahme zurueck, die der
//! Aufrufer fuer seine Benachrichtigungen verwendet. Kein Peer sieht
//! dadurch eine Teilnehmerliste, die einem spaeter zugestellten
//! Join/Leave-Event widerspricht.

use dashmap::DashMap;
use std::sync::Arc;
use tandem_core::{PeerId, RoomId};

use crate::error::SignalingError;

// ---------------------------------------------------------------------------
// RoomMitglied / SessionBindung
// ---------------------------------------------------------------------------

/// Ein Teilnehmer eines Raums
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomMitglied {
    pub peer_id: PeerId,
    pub name: String,
}

/// Ephemere Zuordnung einer Verbindung zu ihrem Raum
#[derive(Debug, Clone)]
struct SessionBindung {
    room_id: RoomId,
}

/// Ergebnis eines Austritts
#[derive(Debug, Clone)]
pub struct VerlassenErgebnis {
    /// Der verlassene Raum
    pub room_id: RoomId,
    /// Die im Raum verbleibenden Teilnehmer
    pub verbleibende: Vec<RoomMitglied>,
}

// ---------------------------------------------------------------------------
// RoomRegistry
// ---------------------------------------------------------------------------

/// Verwaltet die Belegung aller aktiven Raeume
///
/// Thread-safe via Arc + DashMap. Clone teilt den inneren Zustand.
#[derive(Clone)]
pub struct RoomRegistry {
    inner: Arc<RoomRegistryInner>,
}

struct RoomRegistryInner {
    /// Raum -> geordnete Teilnehmerliste (Beitrittsreihenfolge)
    rooms: DashMap<RoomId, Vec<RoomMitglied>>,
    /// Verbindung -> Session-Binding (genau ein Raum pro Verbindung)
    bindings: DashMap<PeerId, SessionBindung>,
}

impl RoomRegistry {
    /// Erstellt eine neue RoomRegistry
    pub fn neu() -> Self {
        Self {
            inner: Arc::new(RoomRegistryInner {
                rooms: DashMap::new(),
                bindings: DashMap::new(),
            }),
        }
    }

    /// Fuegt eine Verbindung einem Raum hinzu
    ///
    /// Gibt die Teilnehmer zurueck, die VOR dem Beitritt im Raum waren –
    /// der Neuankoemmling entdeckt darueber seine bestehenden Peers.
    /// Schlaegt fehl, wenn die Verbindung bereits gebunden ist oder der
    /// Raum die maximale Groesse erreicht hat.
    pub fn beitreten(
        &self,
        peer_id: PeerId,
        room_id: &RoomId,
        name: &str,
        max_groesse: usize,
    ) -> Result<Vec<RoomMitglied>, SignalingError> {
        if self.inner.bindings.contains_key(&peer_id) {
            return Err(SignalingError::BereitsImRaum);
        }

        // Eintrags-Lock des Raums haelt Belegungspruefung, Mutation und
        // Momentaufnahme zusammen
        let mut mitglieder = self.inner.rooms.entry(room_id.clone()).or_default();
        if mitglieder.len() >= max_groesse {
            // Raum nicht liegen lassen falls er gerade erst entstand
            let ist_leer = mitglieder.is_empty();
            drop(mitglieder);
            if ist_leer {
                self.inner.rooms.remove(room_id);
            }
            return Err(SignalingError::RaumVoll);
        }

        let bestehende = mitglieder.clone();
        mitglieder.push(RoomMitglied {
            peer_id,
            name: name.to_string(),
        });
        self.inner.bindings.insert(
            peer_id,
            SessionBindung {
                room_id: room_id.clone(),
            },
        );
        drop(mitglieder);

        tracing::debug!(peer_id = %peer_id, room_id = %room_id, "Peer Raum beigetreten");
        Ok(bestehende)
    }

    /// Entfernt eine Verbindung aus ihrem Raum
    ///
    /// Gibt `None` zurueck wenn kein Session-Binding existiert (bereits
    /// bereinigt oder nie beigetreten) – das ist kein Fehler.
    pub fn verlassen(&self, peer_id: &PeerId) -> Option<VerlassenErgebnis> {
        let (_, bindung) = self.inner.bindings.remove(peer_id)?;
        let room_id = bindung.room_id;

        let verbleibende = {
            let mut mitglieder = match self.inner.rooms.get_mut(&room_id) {
                Some(m) => m,
                None => return None,
            };
            mitglieder.retain(|m| &m.peer_id != peer_id);
            let rest = mitglieder.clone();
            let ist_leer = mitglieder.is_empty();
            drop(mitglieder);
            if ist_leer {
                self.inner.rooms.remove(&room_id);
                tracing::debug!(room_id = %room_id, "Leerer Raum entfernt");
            }
            rest
        };

        tracing::debug!(peer_id = %peer_id, room_id = %room_id, "Peer Raum verlassen");
        Some(VerlassenErgebnis {
            room_id,
            verbleibende,
        })
    }

    /// Gibt alle Teilnehmer eines Raums zurueck
    pub fn mitglieder(&self, room_id: &RoomId) -> Vec<RoomMitglied> {
        self.inner
            .rooms
            .get(room_id)
            .map(|m| m.clone())
            .unwrap_or_default()
    }

    /// Gibt den Raum einer Verbindung zurueck
    pub fn raum_von_peer(&self, peer_id: &PeerId) -> Option<RoomId> {
        self.inner
            .bindings
            .get(peer_id)
            .map(|b| b.room_id.clone())
    }

    /// Prueft ob eine Verbindung einem Raum zugeordnet ist
    pub fn ist_gebunden(&self, peer_id: &PeerId) -> bool {
        self.inner.bindings.contains_key(peer_id)
    }

    /// Gibt die Anzahl der aktiven Raeume zurueck
    pub fn raum_anzahl(&self) -> usize {
        self.inner.rooms.len()
    }
}

impl Default for RoomRegistry {
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

    #[test]
    fn beitreten_und_verlassen() {
        let registry = RoomRegistry::neu();
        let raum = RoomId::generieren();
        let peer = PeerId::new();

        let bestehende = registry.beitreten(peer, &raum, "Aigerim", 2).unwrap();
        assert!(bestehende.is_empty(), "Erster Beitritt sieht leeren Raum");
        assert!(registry.ist_gebunden(&peer));
        assert_eq!(registry.raum_von_peer(&peer), Some(raum.clone()));
        assert_eq!(registry.mitglieder(&raum).len(), 1);

        let ergebnis = registry.verlassen(&peer).expect("Binding muss existieren");
        assert_eq!(ergebnis.room_id, raum);
        assert!(ergebnis.verbleibende.is_empty());
        assert!(!registry.ist_gebunden(&peer));
        // Leerer Raum wurde entfernt
        assert_eq!(registry.raum_anzahl(), 0);
    }

    #[test]
    fn zweiter_beitritt_sieht_ersten_teilnehmer() {
        let registry = RoomRegistry::neu();
        let raum = RoomId::generieren();
        let erste = PeerId::new();
        let zweite = PeerId::new();

        registry.beitreten(erste, &raum, "Aigerim", 2).unwrap();
        let bestehende = registry.beitreten(zweite, &raum, "Tom", 2).unwrap();

        assert_eq!(bestehende.len(), 1);
        assert_eq!(bestehende[0].peer_id, erste);
        assert_eq!(bestehende[0].name, "Aigerim");
        assert_eq!(registry.mitglieder(&raum).len(), 2);
    }

    #[test]
    fn voller_raum_lehnt_beitritt_ab() {
        let registry = RoomRegistry::neu();
        let raum = RoomId::generieren();

        registry.beitreten(PeerId::new(), &raum, "A", 2).unwrap();
        registry.beitreten(PeerId::new(), &raum, "B", 2).unwrap();

        let dritte = PeerId::new();
        let ergebnis = registry.beitreten(dritte, &raum, "C", 2);
        assert!(matches!(ergebnis, Err(SignalingError::RaumVoll)));
        assert!(!registry.ist_gebunden(&dritte));
        assert_eq!(registry.mitglieder(&raum).len(), 2);
    }

    #[test]
    fn doppelter_beitritt_wird_abgelehnt() {
        let registry = RoomRegistry::neu();
        let raum_a = RoomId::generieren();
        let raum_b = RoomId::generieren();
        let peer = PeerId::new();

        registry.beitreten(peer, &raum_a, "Aigerim", 2).unwrap();
        let ergebnis = registry.beitreten(peer, &raum_b, "Aigerim", 2);

        assert!(matches!(ergebnis, Err(SignalingError::BereitsImRaum)));
        assert_eq!(registry.raum_von_peer(&peer), Some(raum_a));
        // Der zweite Raum wurde nicht angelegt
        assert_eq!(registry.raum_anzahl(), 1);
    }

    #[test]
    fn verlassen_ohne_beitritt_ist_noop() {
        let registry = RoomRegistry::neu();
        assert!(registry.verlassen(&PeerId::new()).is_none());
    }

    #[test]
    fn verlassen_meldet_verbleibende() {
        let registry = RoomRegistry::neu();
        let raum = RoomId::generieren();
        let erste = PeerId::new();
        let zweite = PeerId::new();

        registry.beitreten(erste, &raum, "Aigerim", 2).unwrap();
        registry.beitreten(zweite, &raum, "Tom", 2).unwrap();

        let ergebnis = registry.verlassen(&erste).unwrap();
        assert_eq!(ergebnis.verbleibende.len(), 1);
        assert_eq!(ergebnis.verbleibende[0].peer_id, zweite);
        // Raum existiert weiter solange jemand drin ist
        assert_eq!(registry.raum_anzahl(), 1);
    }

    #[test]
    fn clone_teilt_inneren_state() {
        let r1 = RoomRegistry::neu();
        let r2 = r1.clone();
        let raum = RoomId::generieren();
        let peer = PeerId::new();

        r1.beitreten(peer, &raum, "shared", 2).unwrap();
        assert!(r2.ist_gebunden(&peer));
    }
}
