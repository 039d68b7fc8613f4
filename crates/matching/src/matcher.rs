//! Matcher – Vermittelt wartende Nutzer in gemeinsame Raeume
//!
//! Wer einen Gespraechspartner sucht, landet hier: entweder wartet bereits
//! jemand mit der Gegensprache auf demselben Niveau (dann werden beide in
//! dessen Raum vermittelt), oder der Anfragende wird selbst als Wartender
//! eingetragen und erhaelt einen frischen Raum.
//!
//! ## Atomaritaet
//! Finden und Loeschen eines Warteeintrags geschieht in einer einzigen
//! Store-Operation. Zusaetzlich serialisiert ein Lock pro Niveau alle
//! Vermittlungen desselben Sprachpaars: zwei gleichzeitige, zueinander
//! passende Anfragen koennen so nie beide als Wartende enden.

use chrono::{Duration, Utc};
use dashmap::DashMap;
use std::sync::Arc;
use tandem_core::{Language, RoomId};
use tandem_db::models::NeuerWartender;
use tandem_db::WaitingRepository;
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::error::MatchError;

// ---------------------------------------------------------------------------
// Konfiguration
// ---------------------------------------------------------------------------

/// Konfiguration der Vermittlung
#[derive(Debug, Clone, serde::Deserialize)]
#[serde(default)]
pub struct MatchingConfig {
    /// Lebensdauer eines Warteeintrags in Sekunden
    ///
    /// Aeltere Eintraege werden bei der Vermittlung uebersprungen und vom
    /// Ablauf-Waechter geloescht.
    pub wartezeit_ttl_sek: u64,
    /// Intervall des Ablauf-Waechters in Sekunden
    pub aufraeum_intervall_sek: u64,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            wartezeit_ttl_sek: 300,
            aufraeum_intervall_sek: 60,
        }
    }
}

// ---------------------------------------------------------------------------
// MatchErgebnis
// ---------------------------------------------------------------------------

/// Ausgang einer Vermittlungsanfrage
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchErgebnis {
    /// Ein wartender Partner wurde gefunden, beide teilen diesen Raum
    Vermittelt { room_id: RoomId },
    /// Kein Partner vorhanden, der Anfragende wartet nun in diesem Raum
    Wartend { room_id: RoomId },
}

impl MatchErgebnis {
    /// Der Raum, in den der Anfragende geleitet wird
    pub fn room_id(&self) -> &RoomId {
        match self {
            Self::Vermittelt { room_id } | Self::Wartend { room_id } => room_id,
        }
    }

    /// `true` wenn ein Partner gefunden wurde
    pub fn ist_vermittelt(&self) -> bool {
        matches!(self, Self::Vermittelt { .. })
    }
}

// ---------------------------------------------------------------------------
// Matcher
// ---------------------------------------------------------------------------

/// Vermittelt Nutzer anhand von Gegensprache und Niveau
///
/// Thread-safe via Arc + DashMap. Clone teilt den inneren Zustand.
#[derive(Clone)]
pub struct Matcher<W> {
    inner: Arc<MatcherInner<W>>,
}

struct MatcherInner<W> {
    store: W,
    ttl: Duration,
    /// Ein Lock pro Niveau. Beide Sprachrichtungen eines Niveaus teilen
    /// sich den Eintrag, damit gegenseitige Anfragen sich sehen.
    niveau_locks: DashMap<u8, Arc<Mutex<()>>>,
}

impl<W: WaitingRepository> Matcher<W> {
    /// Erstellt einen neuen Matcher ueber dem gegebenen Waiting-Pool
    pub fn neu(store: W, config: &MatchingConfig) -> Self {
        Self {
            inner: Arc::new(MatcherInner {
                store,
                ttl: Duration::seconds(config.wartezeit_ttl_sek as i64),
                niveau_locks: DashMap::new(),
            }),
        }
    }

    /// Vermittelt einen Nutzer oder traegt ihn als Wartenden ein
    ///
    /// Gesucht wird ein Eintrag mit der Gegensprache der Anfrage und exakt
    /// demselben Niveau. Faellt der Store aus, schlaegt die Anfrage fehl;
    /// es wird dann insbesondere KEIN Warteeintrag angelegt.
    pub async fn vermitteln(
        &self,
        language: Language,
        level: u8,
        display_name: &str,
    ) -> Result<MatchErgebnis, MatchError> {
        let lock = self
            .inner
            .niveau_locks
            .entry(level)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        let _guard = lock.lock().await;

        let stichtag = Utc::now() - self.inner.ttl;
        let partner = self
            .inner
            .store
            .passenden_konsumieren(language.gegenstueck(), level, stichtag)
            .await?;

        if let Some(eintrag) = partner {
            info!(
                room_id = %eintrag.room_id,
                partner = %eintrag.display_name,
                language = %language,
                level,
                "Partner gefunden, Nutzer vermittelt"
            );
            return Ok(MatchErgebnis::Vermittelt {
                room_id: eintrag.room_id,
            });
        }

        let room_id = RoomId::generieren();
        self.inner
            .store
            .eintragen(NeuerWartender {
                room_id: &room_id,
                display_name,
                language,
                level,
            })
            .await?;

        debug!(room_id = %room_id, language = %language, level, "Kein Partner, Nutzer wartet");
        Ok(MatchErgebnis::Wartend { room_id })
    }

    /// Entfernt abgelaufene Warteeintraege
    ///
    /// Gibt die Anzahl der geloeschten Eintraege zurueck.
    pub async fn abgelaufene_aufraeumen(&self) -> Result<u64, MatchError> {
        let stichtag = Utc::now() - self.inner.ttl;
        let entfernt = self.inner.store.abgelaufene_entfernen(stichtag).await?;
        if entfernt > 0 {
            info!(entfernt, "Abgelaufene Warteeintraege entfernt");
        }
        Ok(entfernt)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
