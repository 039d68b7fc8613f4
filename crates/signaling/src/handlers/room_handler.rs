//! Room-Handler – Raumbeitritt und Verbindungs-Cleanup
//!
//! Der Beitritt setzt einen gueltigen Checkpoint voraus (Ticket). Bei
//! Erfolg werden bestehende Teilnehmer via `user-connect` benachrichtigt
//! und der Beitretende erhaelt seine `user-list`-Antwort. Das Cleanup
//! beim Trennen benachrichtigt Verbleibende via `user-disconnect`.

use std::sync::Arc;
use tandem_core::PeerId;
use tandem_db::{CheckpointRepository, WaitingRepository};
use tandem_protocol::signal::{
    JoinRoomRequest, RoomOccupant, UserConnectEvent, UserDisconnectEvent, UserListResponse,
};
use tandem_protocol::{ErrorCode, SignalMessage, SignalPayload};

use crate::error::SignalingError;
use crate::server_state::SignalingState;

/// Verarbeitet einen Raumbeitritt
pub async fn handle_join_room<D>(
    request: JoinRoomRequest,
    request_id: u32,
    peer_id: PeerId,
    state: &Arc<SignalingState<D>>,
) -> SignalMessage
where
    D: WaitingRepository + CheckpointRepository + Clone + 'static,
{
    // Checkpoint ist die Vorbedingung des Beitritts
    let record = match state.store.laden(request.ticket).await {
        Ok(Some(record)) => record,
        Ok(None) => {
            tracing::warn!(peer_id = %peer_id, room_id = %request.room_id, "Beitritt ohne Checkpoint");
            return SignalMessage::error(
                request_id,
                ErrorCode::NotCheckpointed,
                "Kein Checkpoint fuer diesen Raum hinterlegt",
            );
        }
        Err(e) => {
            tracing::error!(fehler = %e, "Checkpoint konnte nicht geladen werden");
            return SignalMessage::error(
                request_id,
                ErrorCode::StoreUnavailable,
                "Beitritt derzeit nicht moeglich, bitte erneut versuchen",
            );
        }
    };

    if record.room_id != request.room_id {
        tracing::warn!(
            peer_id = %peer_id,
            erwartet = %record.room_id,
            angefragt = %request.room_id,
            "Ticket gehoert zu einem anderen Raum"
        );
        return SignalMessage::error(
            request_id,
            ErrorCode::NotCheckpointed,
            "Ticket gehoert nicht zu diesem Raum",
        );
    }

    let bestehende = match state.rooms.beitreten(
        peer_id,
        &request.room_id,
        &record.display_name,
        state.config.max_raum_groesse,
    ) {
        Ok(bestehende) => bestehende,
        Err(SignalingError::RaumVoll) => {
            return SignalMessage::error(request_id, ErrorCode::RoomFull, "Raum ist bereits voll");
        }
        Err(SignalingError::BereitsImRaum) => {
            return SignalMessage::error(
                request_id,
                ErrorCode::AlreadyInRoom,
                "Verbindung ist bereits einem Raum zugeordnet",
            );
        }
        Err(e) => {
            tracing::error!(fehler = %e, "Raumbeitritt fehlgeschlagen");
            return SignalMessage::error(request_id, ErrorCode::InternalError, "Beitritt fehlgeschlagen");
        }
    };

    // Ticket ist verbraucht; Fehler hier gefaehrdet den Beitritt nicht
    if let Err(e) = state.store.entfernen(request.ticket).await {
        tracing::warn!(fehler = %e, "Verbrauchtes Ticket konnte nicht geloescht werden");
    }

    tracing::info!(
        peer_id = %peer_id,
        room_id = %request.room_id,
        name = %record.display_name,
        teilnehmer = bestehende.len() + 1,
        "Peer Raum beigetreten"
    );

    // Bestehende Teilnehmer erfahren vom Neuzugang
    let benachrichtigung = SignalMessage::ereignis(SignalPayload::UserConnect(UserConnectEvent {
        sid: peer_id,
        name: record.display_name.clone(),
    }));
    let empfaenger: Vec<PeerId> = bestehende.iter().map(|m| m.peer_id).collect();
    state.peers.an_mehrere_senden(&empfaenger, benachrichtigung);

    // Der Beitretende entdeckt die bereits Anwesenden
    let list = if bestehende.is_empty() {
        None
    } else {
        Some(
            bestehende
                .into_iter()
                .map(|m| RoomOccupant {
                    sid: m.peer_id,
                    name: m.name,
                })
                .collect(),
        )
    };

    SignalMessage::new(
        request_id,
        SignalPayload::UserList(UserListResponse {
            my_id: peer_id,
            list,
        }),
    )
}

/// Bereinigt alle Ressourcen einer Verbindung beim Trennen
///
/// Trennen ohne vorherigen Beitritt ist ein stilles No-op.
pub fn peer_cleanup<D>(peer_id: &PeerId, state: &Arc<SignalingState<D>>)
where
    D: WaitingRepository + CheckpointRepository + Clone + 'static,
{
    if let Some(ergebnis) = state.rooms.verlassen(peer_id) {
        let benachrichtigung =
            SignalMessage::ereignis(SignalPayload::UserDisconnect(UserDisconnectEvent {
                sid: *peer_id,
            }));
        let empfaenger: Vec<PeerId> = ergebnis.verbleibende.iter().map(|m| m.peer_id).collect();
        state.peers.an_mehrere_senden(&empfaenger, benachrichtigung);

        tracing::info!(peer_id = %peer_id, room_id = %ergebnis.room_id, "Peer getrennt, Raum bereinigt");
    }

    state.peers.entfernen(peer_id);
}
