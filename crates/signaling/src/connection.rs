//! Client-Connection – Verwaltet eine einzelne TCP-Verbindung
//!
//! Jede TCP-Verbindung bekommt eine `ClientConnection` in einem eigenen
//! tokio-Task. Die Verbindungs-Identitaet (PeerId) wird beim Aufbau
//! vergeben und gilt bis zum Trennen.
//!
//! ## Lebenszyklus
//! ```text
//! Verbunden -> (checkpoint, join-room) -> ImRaum -> Getrennt
//!     |                                               ^
//!     +----------------- Trennen --------------------+
//! ```
//! Trennen ist in jedem Zustand erlaubt; das Cleanup ist ein No-op wenn
//! die Verbindung nie einem Raum beigetreten ist.
//!
//! ## Keepalive
//! - Server sendet alle `keepalive_sek` einen Ping
//! - Client muss innerhalb von `verbindungs_timeout_sek` irgendein Frame senden
//! - Bei Timeout wird die Verbindung getrennt

use futures_util::{SinkExt, StreamExt};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tandem_core::PeerId;
use tandem_db::{CheckpointRepository, WaitingRepository};
use tandem_protocol::{ErrorCode, FrameCodec, SignalMessage};
use tokio::net::TcpStream;
use tokio_util::codec::Framed;

use crate::dispatcher::{DispatcherContext, MessageDispatcher};
use crate::server_state::SignalingState;

/// Verarbeitet eine einzelne TCP-Verbindung
///
/// Liest Frames via `FrameCodec`, dispatcht an `MessageDispatcher` und
/// sendet Antworten zurueck. Laeuft in einem eigenen tokio-Task.
pub struct ClientConnection<D>
where
    D: WaitingRepository + CheckpointRepository + Clone + 'static,
{
    state: Arc<SignalingState<D>>,
    peer_addr: SocketAddr,
}

impl<D> ClientConnection<D>
where
    D: WaitingRepository + CheckpointRepository + Clone + 'static,
{
    /// Erstellt eine neue ClientConnection
    pub fn neu(state: Arc<SignalingState<D>>, peer_addr: SocketAddr) -> Self {
        Self { state, peer_addr }
    }

    /// Startet die Verbindungs-Verarbeitungsschleife
    ///
    /// Diese Methode laeuft bis die Verbindung getrennt wird oder ein
    /// Shutdown-Signal eingeht.
    pub async fn verarbeiten(
        self,
        stream: TcpStream,
        mut shutdown_rx: tokio::sync::watch::Receiver<bool>,
    ) {
        let peer_addr = self.peer_addr;
        let keepalive_intervall = Duration::from_secs(self.state.config.keepalive_sek);
        let timeout_dauer = Duration::from_secs(self.state.config.verbindungs_timeout_sek);

        // Verbindungs-Identitaet gilt fuer die gesamte Lebensdauer
        let peer_id = PeerId::new();
        tracing::info!(peer = %peer_addr, peer_id = %peer_id, "Neue Verbindung");

        let mut framed = Framed::new(stream, FrameCodec::new());

        // Ausgehende Nachrichten (Relay, user-connect/-disconnect)
        let mut sende_rx = self.state.peers.registrieren(peer_id);

        let ctx = DispatcherContext { peer_id };
        let dispatcher = MessageDispatcher::neu(Arc::clone(&self.state));

        let mut letzter_empfang = Instant::now();
        let mut naechster_ping = Instant::now() + keepalive_intervall;
        let mut ping_request_id: u32 = 0;

        loop {
            let jetzt = Instant::now();

            if jetzt.duration_since(letzter_empfang) > timeout_dauer {
                tracing::warn!(peer = %peer_addr, peer_id = %peer_id, "Verbindungs-Timeout");
                break;
            }

            let ping_verzoegerung = if jetzt < naechster_ping {
                naechster_ping.duration_since(jetzt)
            } else {
                Duration::from_millis(1)
            };

            tokio::select! {
                // Eingehende Nachricht vom Client
                frame = framed.next() => {
                    match frame {
                        Some(Ok(nachricht)) => {
                            letzter_empfang = Instant::now();
                            tracing::trace!(
                                peer_id = %peer_id,
                                request_id = nachricht.request_id,
                                "Nachricht empfangen"
                            );

                            if let Some(antwort) = dispatcher.dispatch(nachricht, &ctx).await {
                                if let Err(e) = framed.send(antwort).await {
                                    tracing::warn!(
                                        peer_id = %peer_id,
                                        fehler = %e,
                                        "Senden fehlgeschlagen"
                                    );
                                    break;
                                }
                            }
                        }
                        Some(Err(e)) => {
                            tracing::warn!(peer_id = %peer_id, fehler = %e, "Frame-Lesefehler");
                            break;
                        }
                        None => {
                            tracing::info!(peer_id = %peer_id, "Verbindung vom Client getrennt");
                            break;
                        }
                    }
                }

                // Ausgehende Nachricht aus dem Peer-Directory
                Some(ausgehend) = sende_rx.recv() => {
                    if let Err(e) = framed.send(ausgehend).await {
                        tracing::warn!(peer_id = %peer_id, fehler = %e, "Event-Senden fehlgeschlagen");
                        break;
                    }
                }

                // Keepalive-Ping
                _ = tokio::time::sleep(ping_verzoegerung) => {
                    if jetzt >= naechster_ping {
                        ping_request_id = ping_request_id.wrapping_add(1);
                        let ts = std::time::SystemTime::now()
                            .duration_since(std::time::UNIX_EPOCH)
                            .unwrap_or_default()
                            .as_millis() as u64;
                        let ping = SignalMessage::ping(ping_request_id, ts);

                        if let Err(e) = framed.send(ping).await {
                            tracing::warn!(peer_id = %peer_id, fehler = %e, "Ping-Senden fehlgeschlagen");
                            break;
                        }
                        naechster_ping = Instant::now() + keepalive_intervall;
                    }
                }

                // Shutdown-Signal
                Ok(()) = shutdown_rx.changed() => {
                    if *shutdown_rx.borrow() {
                        tracing::info!(peer_id = %peer_id, "Shutdown-Signal – Verbindung wird getrennt");
                        let abschied = SignalMessage::error(
                            0,
                            ErrorCode::InternalError,
                            "Server wird heruntergefahren",
                        );
                        let _ = framed.send(abschied).await;
                        break;
                    }
                }
            }
        }

        // Cleanup: Raum verlassen, Verbleibende benachrichtigen, Queue schliessen
        dispatcher.peer_cleanup(&peer_id);

        tracing::info!(peer = %peer_addr, peer_id = %peer_id, "Verbindungs-Task beendet");
    }
}
