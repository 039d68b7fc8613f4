//! Relay-Handler – Punkt-zu-Punkt-Weiterleitung von Verhandlungsnachrichten
//!
//! Der Relay interpretiert den Inhalt nicht; er prueft nur die
//! Absender-Kennung und reicht die Nachricht an die Ziel-Verbindung
//! weiter. Zustellung ist best-effort: ist das Ziel nicht verbunden,
//! wird die Nachricht stillschweigend verworfen (die WebRTC-Verhandlung
//! toleriert verlorene Nachrichten).

use std::sync::Arc;
use tandem_core::PeerId;
use tandem_db::{CheckpointRepository, WaitingRepository};
use tandem_protocol::signal::{SignalData, ICE_CANDIDATE_KIND};
use tandem_protocol::{SignalMessage, SignalPayload};

use crate::server_state::SignalingState;

/// Leitet eine Verhandlungsnachricht an die Ziel-Verbindung weiter
///
/// Eine gefaelschte Absender-Kennung fuehrt zum Verwerfen der Nachricht;
/// weitergeleitet wird ausschliesslich unter der echten Verbindungs-ID.
pub fn handle_data<D>(data: SignalData, peer_id: PeerId, state: &Arc<SignalingState<D>>)
where
    D: WaitingRepository + CheckpointRepository + Clone + 'static,
{
    if data.sender_id != peer_id {
        tracing::warn!(
            peer_id = %peer_id,
            behauptet = %data.sender_id,
            kind = %data.kind,
            "Absender-Kennung stimmt nicht mit der Verbindung ueberein – verworfen"
        );
        return;
    }

    // ICE-Kandidaten fluten sonst das Log
    if data.kind != ICE_CANDIDATE_KIND {
        tracing::info!(
            kind = %data.kind,
            sender = %data.sender_id,
            target = %data.target_id,
            "Signaling-Nachricht"
        );
    }

    let target_id = data.target_id;
    let weitergeleitet = state
        .peers
        .an_peer_senden(&target_id, SignalMessage::ereignis(SignalPayload::Data(data)));

    if !weitergeleitet {
        tracing::debug!(target = %target_id, "Ziel nicht verbunden – Nachricht verworfen");
    }
}
