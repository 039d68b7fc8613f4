//! Message-Dispatcher – Routet SignalMessages an die richtigen Handler
//!
//! Der Dispatcher empfaengt SignalMessages von einer ClientConnection,
//! bestimmt den richtigen Handler und gibt die Antwort zurueck.
//!
//! ## Ereignisse ohne Antwort
//! Relay-Nachrichten (`data`) und Pongs erzeugen keine Antwort an den
//! Absender; der Dispatcher gibt dann `None` zurueck.

use std::sync::Arc;
use tandem_core::PeerId;
use tandem_db::{CheckpointRepository, WaitingRepository};
use tandem_protocol::{ErrorCode, SignalMessage, SignalPayload};

use crate::handlers::{companion_handler, relay_handler, room_handler};
use crate::server_state::SignalingState;

/// Dispatcher-Kontext – Informationen ueber die aktuelle Verbindung
pub struct DispatcherContext {
    /// Verbindungs-Identitaet, beim Verbindungsaufbau vergeben
    pub peer_id: PeerId,
}

/// Zentraler Message-Dispatcher
///
/// Routet eingehende SignalMessages an die entsprechenden Handler und
/// gibt die Antwort-SignalMessage zurueck.
pub struct MessageDispatcher<D>
where
    D: WaitingRepository + CheckpointRepository + Clone + 'static,
{
    state: Arc<SignalingState<D>>,
}

impl<D> MessageDispatcher<D>
where
    D: WaitingRepository + CheckpointRepository + Clone + 'static,
{
    /// Erstellt einen neuen Dispatcher
    pub fn neu(state: Arc<SignalingState<D>>) -> Self {
        Self { state }
    }

    /// Verarbeitet eine eingehende SignalMessage und gibt die Antwort zurueck
    ///
    /// Gibt `None` zurueck wenn keine Antwort gesendet werden soll
    /// (Relay-Weiterleitungen, Pong-Antworten).
    pub async fn dispatch(
        &self,
        message: SignalMessage,
        ctx: &DispatcherContext,
    ) -> Option<SignalMessage> {
        let request_id = message.request_id;

        match message.payload {
            // -------------------------------------------------------------------
            // Vermittlung und Checkpoint
            // -------------------------------------------------------------------
            SignalPayload::FindCompanion(req) => Some(
                companion_handler::handle_find_companion(req, request_id, &self.state).await,
            ),

            SignalPayload::Checkpoint(req) => {
                Some(companion_handler::handle_checkpoint(req, request_id, &self.state).await)
            }

            // -------------------------------------------------------------------
            // Raum
            // -------------------------------------------------------------------
            SignalPayload::JoinRoom(req) => Some(
                room_handler::handle_join_room(req, request_id, ctx.peer_id, &self.state).await,
            ),

            // -------------------------------------------------------------------
            // Relay
            // -------------------------------------------------------------------
            SignalPayload::Data(data) => {
                relay_handler::handle_data(data, ctx.peer_id, &self.state);
                None
            }

            // -------------------------------------------------------------------
            // Keepalive
            // -------------------------------------------------------------------
            SignalPayload::Ping(ping) => {
                let server_ts = std::time::SystemTime::now()
                    .duration_since(std::time::UNIX_EPOCH)
                    .unwrap_or_default()
                    .as_millis() as u64;
                Some(SignalMessage::pong(request_id, ping.timestamp_ms, server_ts))
            }

            SignalPayload::Pong(_) => {
                // Pong-Antworten vom Client werden nur geloggt (RTT-Messung)
                tracing::trace!("Pong empfangen (RTT-Messung)");
                None
            }

            // -------------------------------------------------------------------
            // Unerwartete Server->Client Nachrichten
            // -------------------------------------------------------------------
            SignalPayload::CompanionResult(_)
            | SignalPayload::CheckpointOk(_)
            | SignalPayload::UserList(_)
            | SignalPayload::UserConnect(_)
            | SignalPayload::UserDisconnect(_)
            | SignalPayload::Error(_) => {
                tracing::warn!(
                    request_id,
                    "Unerwartete Server->Client Nachricht vom Client empfangen"
                );
                Some(SignalMessage::error(
                    request_id,
                    ErrorCode::InvalidRequest,
                    "Unerwartete Nachricht",
                ))
            }
        }
    }

    /// Bereinigt alle Ressourcen eines Peers beim Trennen
    pub fn peer_cleanup(&self, peer_id: &PeerId) {
        room_handler::peer_cleanup(peer_id, &self.state);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
