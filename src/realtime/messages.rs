//! Realtime message envelopes.
//!
//! Every frame on the socket is `{"type": ..., "payload": ...}`. Payloads are
//! carried as JSON values so features can add event types without touching
//! the transport.

use serde::{Deserialize, Serialize};

/// Server -> Client message envelope.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServerMessage {
    /// Message type identifier (e.g. "connected", "notification", "content_updated")
    #[serde(rename = "type")]
    pub msg_type: String,
    pub payload: serde_json::Value,
}

impl ServerMessage {
    pub fn new(msg_type: impl Into<String>, payload: impl Serialize) -> Self {
        Self {
            msg_type: msg_type.into(),
            payload: serde_json::to_value(payload).unwrap_or(serde_json::Value::Null),
        }
    }

    pub fn empty(msg_type: impl Into<String>) -> Self {
        Self {
            msg_type: msg_type.into(),
            payload: serde_json::Value::Null,
        }
    }
}

/// Client -> Server message envelope.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClientMessage {
    #[serde(rename = "type")]
    pub msg_type: String,
    #[serde(default)]
    pub payload: serde_json::Value,
}

/// Reserved message type constants.
pub mod msg_types {
    /// Sent by server right after the upgrade.
    pub const CONNECTED: &str = "connected";
    pub const PING: &str = "ping";
    pub const PONG: &str = "pong";
    pub const ERROR: &str = "error";

    /// Client announces its identity. Payload is the username.
    pub const INIT: &str = "init";
    /// Direct message, both directions.
    pub const CHAT: &str = "chat";

    pub const ONLINE_USERS: &str = "online_users";
    pub const USER_ONLINE: &str = "user_online";
    pub const USER_OFFLINE: &str = "user_offline";

    pub const NOTIFICATION: &str = "notification";
    pub const EVENT_LOG_CREATED: &str = "event_log_created";
    pub const CONTENT_CREATED: &str = "content_created";
    pub const CONTENT_UPDATED: &str = "content_updated";
    pub const CONTENT_DELETED: &str = "content_deleted";
    pub const FOLLOW_UPDATED: &str = "follow_updated";
    pub const SETTINGS_UPDATED: &str = "settings_updated";
    pub const ABOUT_CONTENT_UPDATED: &str = "about_content_updated";
}

/// System-level payloads used by the socket transport itself.
pub mod system {
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
    #[serde(rename_all = "camelCase")]
    pub struct Connected {
        pub channel_id: u64,
        pub server_version: String,
    }

    #[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
    pub struct Error {
        pub code: String,
        pub message: String,
    }

    impl Error {
        pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
            Self {
                code: code.into(),
                message: message.into(),
            }
        }
    }
}

/// Untargeted "content changed" broadcasts.
pub mod content {
    use super::{msg_types, ServerMessage};
    use serde::{Deserialize, Serialize};

    /// Entity kinds clients key their caches on.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub enum ContentKind {
        Jobs,
        JobCategories,
        AgencyRequests,
    }

    #[derive(Serialize)]
    struct ContentData<'a, T: Serialize> {
        #[serde(rename = "type")]
        kind: ContentKind,
        data: &'a T,
    }

    #[derive(Serialize)]
    struct ContentId<'a> {
        #[serde(rename = "type")]
        kind: ContentKind,
        id: &'a str,
    }

    pub fn created<T: Serialize>(kind: ContentKind, data: &T) -> ServerMessage {
        ServerMessage::new(msg_types::CONTENT_CREATED, ContentData { kind, data })
    }

    pub fn updated<T: Serialize>(kind: ContentKind, data: &T) -> ServerMessage {
        ServerMessage::new(msg_types::CONTENT_UPDATED, ContentData { kind, data })
    }

    pub fn deleted(kind: ContentKind, id: &str) -> ServerMessage {
        ServerMessage::new(msg_types::CONTENT_DELETED, ContentId { kind, id })
    }
}

/// Chat payloads.
pub mod chat {
    use serde::{Deserialize, Serialize};

    /// What a client sends. The sender is the announced identity, never the payload.
    #[derive(Debug, Clone, Deserialize, PartialEq)]
    pub struct OutgoingChat {
        pub recipient: String,
        pub content: String,
    }

    #[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
    pub struct DeliveredChat {
        pub sender: String,
        pub recipient: String,
        pub content: String,
        pub timestamp: i64,
    }
}
