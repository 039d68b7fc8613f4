//! Companion-Handler – Vermittlung und Checkpoint
//!
//! `find-companion` sucht einen Gespraechspartner oder traegt den Nutzer
//! als Wartenden ein. `checkpoint` hinterlegt Anzeigename und Medien-
//! Voreinstellungen fuer den zugewiesenen Raum; das zurueckgegebene Ticket
//! ist die Vorbedingung fuer den spaeteren Raumbeitritt.

use std::sync::Arc;
use tandem_db::models::NeuerCheckpoint;
use tandem_db::{CheckpointRepository, WaitingRepository};
use tandem_protocol::signal::{
    CheckpointOk, CheckpointRequest, CompanionResult, FindCompanionRequest,
};
use tandem_protocol::{ErrorCode, SignalMessage, SignalPayload};

use crate::server_state::SignalingState;

/// Verarbeitet eine Partner-Suchanfrage
pub async fn handle_find_companion<D>(
    request: FindCompanionRequest,
    request_id: u32,
    state: &Arc<SignalingState<D>>,
) -> SignalMessage
where
    D: WaitingRepository + CheckpointRepository + Clone + 'static,
{
    if request.display_name.trim().is_empty() {
        return SignalMessage::error(
            request_id,
            ErrorCode::InvalidRequest,
            "Anzeigename darf nicht leer sein",
        );
    }

    match state
        .matcher
        .vermitteln(request.language, request.level, &request.display_name)
        .await
    {
        Ok(ergebnis) => SignalMessage::new(
            request_id,
            SignalPayload::CompanionResult(CompanionResult {
                room_id: ergebnis.room_id().clone(),
                matched: ergebnis.ist_vermittelt(),
            }),
        ),
        Err(e) => {
            tracing::error!(fehler = %e, "Vermittlung fehlgeschlagen");
            SignalMessage::error(
                request_id,
                ErrorCode::StoreUnavailable,
                "Vermittlung derzeit nicht moeglich, bitte erneut versuchen",
            )
        }
    }
}

/// Verarbeitet einen Checkpoint
pub async fn handle_checkpoint<D>(
    request: CheckpointRequest,
    request_id: u32,
    state: &Arc<SignalingState<D>>,
) -> SignalMessage
where
    D: WaitingRepository + CheckpointRepository + Clone + 'static,
{
    if request.display_name.trim().is_empty() {
        return SignalMessage::error(
            request_id,
            ErrorCode::InvalidRequest,
            "Anzeigename darf nicht leer sein",
        );
    }

    match state
        .store
        .hinterlegen(NeuerCheckpoint {
            room_id: &request.room_id,
            display_name: &request.display_name,
            mute_audio: request.mute_audio,
            mute_video: request.mute_video,
        })
        .await
    {
        Ok(record) => {
            tracing::debug!(room_id = %record.room_id, "Checkpoint hinterlegt");
            SignalMessage::new(
                request_id,
                SignalPayload::CheckpointOk(CheckpointOk {
                    room_id: record.room_id,
                    ticket: record.ticket,
                }),
            )
        }
        Err(e) => {
            tracing::error!(fehler = %e, "Checkpoint konnte nicht hinterlegt werden");
            SignalMessage::error(
                request_id,
                ErrorCode::StoreUnavailable,
                "Checkpoint derzeit nicht moeglich, bitte erneut versuchen",
            )
        }
    }
}
