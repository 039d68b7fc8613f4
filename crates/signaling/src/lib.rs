//! tandem-signaling – TCP Signaling Layer
//!
//! Dieser Crate implementiert Vermittlung, Raum-Lebenszyklus und das
//! WebRTC-Signaling-Relay. Er verwaltet TCP-Verbindungen und haelt die
//! ephemere Raumbelegung.
//!
//! ## Architektur
//!
//! ```text
//! TCP Listener (SignalingServer)
//!     |
//!     v
//! ClientConnection (pro Verbindung ein Task, eigene PeerId)
//!     |
//!     v
//! MessageDispatcher
//!     |
//!     +-- CompanionHandler (find-companion, checkpoint)
//!     +-- RoomHandler      (join-room, Cleanup beim Trennen)
//!     +-- RelayHandler     (data: Offer/Answer/ICE-Weiterleitung)
//!
//! RoomRegistry  – Wer ist in welchem Raum, Session-Bindings
//! PeerDirectory – Send-Queues aller verbundenen Peers
//! ```

pub mod connection;
pub mod dispatcher;
pub mod error;
pub mod handlers;
pub mod peers;
pub mod rooms;
pub mod server_state;
pub mod tcp;

// Bequeme Re-Exporte
pub use connection::ClientConnection;
pub use dispatcher::MessageDispatcher;
pub use error::{SignalingError, SignalingResult};
pub use peers::PeerDirectory;
pub use rooms::RoomRegistry;
pub use server_state::{SignalingConfig, SignalingState};
pub use tcp::SignalingServer;
