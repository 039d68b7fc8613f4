//! Handler-Module fuer den MessageDispatcher

pub mod companion_handler;
pub mod relay_handler;
pub mod room_handler;
