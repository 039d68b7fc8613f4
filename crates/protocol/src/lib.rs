//! tandem-protocol – Netzwerkprotokoll-Definitionen
//!
//! Dieses Crate definiert alle Nachrichtentypen die zwischen Client und
//! Server ausgetauscht werden, sowie das Frame-basierte Wire-Format.

pub mod signal;
pub mod wire;

pub use signal::{ErrorCode, SignalMessage, SignalPayload};
pub use wire::FrameCodec;
