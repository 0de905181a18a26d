//! WebSocket transport for the realtime hub.
//!
//! The registry and message envelopes live in `crate::realtime`; this module
//! only moves frames between sockets and registry channels.

pub mod handler;

pub use handler::ws_handler;
