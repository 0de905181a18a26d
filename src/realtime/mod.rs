//! Realtime broadcast hub.
//!
//! [`ConnectionRegistry`] is the in-memory map from users to open channels.
//! Services push through it; the WebSocket transport in
//! `server::websocket` drains each channel to its socket.

pub mod messages;
mod registry;

pub use messages::{content, msg_types, ClientMessage, ServerMessage};
pub use registry::{ChannelId, ConnectionRegistry, SendError, CHANNEL_CAPACITY};
