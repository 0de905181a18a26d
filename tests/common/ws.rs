//! WebSocket helpers for realtime tests

use futures::{SinkExt, StreamExt};
use serde_json::{json, Value};
use std::time::Duration;
use tokio::time::timeout;
use tokio_tungstenite::{connect_async, tungstenite::Message, MaybeTlsStream, WebSocketStream};

pub type WsStream = WebSocketStream<MaybeTlsStream<tokio::net::TcpStream>>;

/// Default wait for a pushed message.
pub const WS_WAIT: Duration = Duration::from_secs(3);

/// Opens `/v1/ws` and consumes the `connected` greeting.
pub async fn connect_ws(base_url: &str) -> WsStream {
    let ws_url = base_url.replace("http://", "ws://") + "/v1/ws";
    let (mut ws, _) = connect_async(ws_url.as_str())
        .await
        .expect("Failed to connect to WebSocket");
    wait_for_message(&mut ws, "connected", WS_WAIT)
        .await
        .expect("Should receive connected message");
    ws
}

/// Connects and announces `username`, consuming the roster reply.
pub async fn connect_as(base_url: &str, username: &str) -> WsStream {
    let mut ws = connect_ws(base_url).await;
    send_message(&mut ws, "init", json!(username)).await;
    wait_for_message(&mut ws, "online_users", WS_WAIT)
        .await
        .expect("Should receive online_users after init");
    ws
}

pub async fn send_message(ws: &mut WsStream, msg_type: &str, payload: Value) {
    let frame = json!({ "type": msg_type, "payload": payload }).to_string();
    ws.send(Message::Text(frame.into()))
        .await
        .expect("Failed to send WebSocket message");
}

/// Waits for a message of `expected_type`, skipping others.
pub async fn wait_for_message(
    ws: &mut WsStream,
    expected_type: &str,
    timeout_duration: Duration,
) -> Option<Value> {
    let result = timeout(timeout_duration, async {
        while let Some(Ok(msg)) = ws.next().await {
            if let Message::Text(text) = msg {
                if let Ok(json) = serde_json::from_str::<Value>(&text) {
                    if json.get("type").and_then(|t| t.as_str()) == Some(expected_type) {
                        return Some(json);
                    }
                }
            }
        }
        None
    })
    .await;

    result.ok().flatten()
}

/// Waits for a `content_*` message about `kind` (e.g. "jobs").
pub async fn wait_for_content(
    ws: &mut WsStream,
    msg_type: &str,
    kind: &str,
    timeout_duration: Duration,
) -> Option<Value> {
    let result = timeout(timeout_duration, async {
        loop {
            let msg = wait_for_message(ws, msg_type, timeout_duration).await?;
            if msg["payload"]["type"] == kind {
                return Some(msg);
            }
        }
    })
    .await;

    result.ok().flatten()
}
