//! WebSocket route handler.
//!
//! Handles the upgrade, the message loop and cleanup. Every socket gets a raw
//! channel in the registry right away; it becomes addressable by username once
//! the client sends `init`.

use std::sync::Arc;

use axum::{
    extract::{
        ws::{Message, WebSocket},
        State, WebSocketUpgrade,
    },
    response::Response,
};
use futures::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tracing::{debug, error};

use crate::realtime::messages::chat::OutgoingChat;
use crate::realtime::messages::system;
use crate::realtime::{msg_types, ChannelId, ClientMessage, ConnectionRegistry, ServerMessage};
use crate::server::state::{GuardedConnectionRegistry, GuardedSocialManager};
use crate::social::SocialManager;

struct WsState {
    registry: Arc<ConnectionRegistry>,
    social: Arc<SocialManager>,
}

/// Per-socket state for the incoming loop.
struct Connection {
    channel: ChannelId,
    username: Option<String>,
}

/// `GET /v1/ws`
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(registry): State<GuardedConnectionRegistry>,
    State(social): State<GuardedSocialManager>,
) -> Response {
    let state = Arc::new(WsState { registry, social });
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

async fn handle_socket(socket: WebSocket, state: Arc<WsState>) {
    let (channel, outgoing_rx) = state.registry.connect().await;
    debug!("WebSocket connected on channel {}", channel);

    let (ws_sink, ws_stream) = socket.split();

    let connected_msg = ServerMessage::new(
        msg_types::CONNECTED,
        system::Connected {
            channel_id: channel,
            server_version: format!("{}-{}", env!("CARGO_PKG_VERSION"), env!("GIT_HASH")),
        },
    );

    let outgoing_handle = tokio::spawn(forward_outgoing(ws_sink, outgoing_rx, connected_msg));

    let mut connection = Connection {
        channel,
        username: None,
    };
    process_incoming(ws_stream, &mut connection, &state).await;

    debug!(
        "WebSocket disconnected on channel {} ({:?})",
        channel, connection.username
    );
    state.registry.withdraw(channel).await;
    outgoing_handle.abort();
}

/// Forward messages from the outgoing channel to the WebSocket.
async fn forward_outgoing(
    mut ws_sink: futures::stream::SplitSink<WebSocket, Message>,
    mut outgoing_rx: mpsc::Receiver<ServerMessage>,
    initial_msg: ServerMessage,
) {
    if let Ok(json) = serde_json::to_string(&initial_msg) {
        if ws_sink.send(Message::Text(json.into())).await.is_err() {
            return;
        }
    }

    while let Some(msg) = outgoing_rx.recv().await {
        match serde_json::to_string(&msg) {
            Ok(json) => {
                if ws_sink.send(Message::Text(json.into())).await.is_err() {
                    break;
                }
            }
            Err(e) => {
                error!("Failed to serialize WebSocket message: {}", e);
            }
        }
    }
    let _ = ws_sink.close().await;
}

async fn process_incoming(
    mut ws_stream: futures::stream::SplitStream<WebSocket>,
    connection: &mut Connection,
    state: &WsState,
) {
    while let Some(result) = ws_stream.next().await {
        match result {
            Ok(Message::Text(text)) => match serde_json::from_str::<ClientMessage>(&text) {
                Ok(msg) => handle_client_message(msg, connection, state).await,
                Err(e) => {
                    debug!("Failed to parse client message: {}", e);
                    send_error(
                        state,
                        connection.channel,
                        "parse_error",
                        format!("Invalid message format: {}", e),
                    )
                    .await;
                }
            },
            Ok(Message::Binary(_)) => {
                debug!("Received binary message, ignoring");
            }
            Ok(Message::Ping(_)) | Ok(Message::Pong(_)) => {}
            Ok(Message::Close(_)) => {
                debug!("Received close frame");
                break;
            }
            Err(e) => {
                debug!("WebSocket error: {}", e);
                break;
            }
        }
    }
}

async fn send_error(state: &WsState, channel: ChannelId, code: &str, message: String) {
    let error_msg = ServerMessage::new(msg_types::ERROR, system::Error::new(code, message));
    let _ = state.registry.send_to_channel(channel, error_msg).await;
}

async fn handle_client_message(msg: ClientMessage, connection: &mut Connection, state: &WsState) {
    match msg.msg_type.as_str() {
        msg_types::PING => {
            let _ = state
                .registry
                .send_to_channel(connection.channel, ServerMessage::empty(msg_types::PONG))
                .await;
        }
        msg_types::INIT => {
            let username = msg
                .payload
                .as_str()
                .map(str::trim)
                .filter(|u| !u.is_empty());
            match username {
                Some(username) => {
                    if state.registry.announce(username, connection.channel).await {
                        connection.username = Some(username.to_string());
                    }
                }
                None => {
                    send_error(
                        state,
                        connection.channel,
                        "invalid_init",
                        "init expects a username".to_string(),
                    )
                    .await;
                }
            }
        }
        msg_types::CHAT => handle_chat(msg.payload, connection, state).await,
        other => {
            debug!("Unknown message type: {}", other);
            send_error(
                state,
                connection.channel,
                "unknown_type",
                format!("Unknown message type: {}", other),
            )
            .await;
        }
    }
}

async fn handle_chat(payload: serde_json::Value, connection: &Connection, state: &WsState) {
    let Some(sender) = connection.username.as_deref() else {
        send_error(
            state,
            connection.channel,
            "not_announced",
            "send init before chatting".to_string(),
        )
        .await;
        return;
    };
    let chat = match serde_json::from_value::<OutgoingChat>(payload) {
        Ok(chat) => chat,
        Err(e) => {
            send_error(
                state,
                connection.channel,
                "invalid_chat",
                format!("Invalid chat payload: {}", e),
            )
            .await;
            return;
        }
    };

    match state
        .social
        .send_chat(sender, &chat.recipient, &chat.content)
        .await
    {
        Ok(delivered) => {
            // Echo back with the stored timestamp.
            let _ = state
                .registry
                .send_to_channel(
                    connection.channel,
                    ServerMessage::new(msg_types::CHAT, &delivered),
                )
                .await;
        }
        Err(e) => {
            send_error(state, connection.channel, "chat_failed", e.to_string()).await;
        }
    }
}
