//! Connection registry.
//!
//! Tracks every open realtime channel and which user, if any, has announced
//! itself on it. A user maps to at most one channel: the last announce wins.
//! Delivery never waits on a client: a message that does not fit in the
//! channel's queue is dropped and counted.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::{mpsc, RwLock};
use tracing::{debug, warn};

use super::messages::{msg_types, ServerMessage};
use crate::server::metrics;

pub type ChannelId = u64;

/// Per-channel outgoing queue depth.
pub const CHANNEL_CAPACITY: usize = 32;

/// Error type for targeted sends.
#[derive(Debug, Clone, PartialEq)]
pub enum SendError {
    /// Nobody is announced under that identity (or the channel is gone).
    NotConnected,
    /// The channel's receiver was dropped.
    Disconnected,
    /// The client is not draining its queue; the message was dropped.
    QueueFull,
}

fn deliver(
    channel: ChannelId,
    tx: &mpsc::Sender<ServerMessage>,
    message: ServerMessage,
) -> Result<(), SendError> {
    match tx.try_send(message) {
        Ok(()) => Ok(()),
        Err(TrySendError::Full(message)) => {
            warn!(
                channel,
                msg_type = %message.msg_type,
                "Realtime queue full, dropping message"
            );
            metrics::record_realtime_drop("full");
            Err(SendError::QueueFull)
        }
        Err(TrySendError::Closed(_)) => {
            metrics::record_realtime_drop("closed");
            Err(SendError::Disconnected)
        }
    }
}

#[derive(Default)]
struct RegistryState {
    channels: HashMap<ChannelId, mpsc::Sender<ServerMessage>>,
    users: HashMap<String, ChannelId>,
}

impl RegistryState {
    fn user_on(&self, channel: ChannelId) -> Option<String> {
        self.users
            .iter()
            .find(|(_, c)| **c == channel)
            .map(|(user, _)| user.clone())
    }

    fn online_users(&self) -> Vec<String> {
        let mut users: Vec<String> = self.users.keys().cloned().collect();
        users.sort();
        users
    }

    fn senders_except(&self, channel: ChannelId) -> Vec<(ChannelId, mpsc::Sender<ServerMessage>)> {
        self.channels
            .iter()
            .filter(|(id, _)| **id != channel)
            .map(|(id, tx)| (*id, tx.clone()))
            .collect()
    }

    fn report(&self) {
        metrics::set_realtime_connections(self.users.len(), self.channels.len());
    }
}

pub struct ConnectionRegistry {
    state: RwLock<RegistryState>,
    next_channel_id: AtomicU64,
}

impl Default for ConnectionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self {
            state: RwLock::new(RegistryState::default()),
            next_channel_id: AtomicU64::new(1),
        }
    }

    /// Opens a raw channel. The caller forwards everything from the returned
    /// receiver to the client.
    pub async fn connect(&self) -> (ChannelId, mpsc::Receiver<ServerMessage>) {
        let id = self.next_channel_id.fetch_add(1, Ordering::Relaxed);
        let (tx, rx) = mpsc::channel(CHANNEL_CAPACITY);

        let mut state = self.state.write().await;
        state.channels.insert(id, tx);
        state.report();
        (id, rx)
    }

    /// Binds `user` to `channel`, replacing any earlier binding of either.
    ///
    /// The announcing channel receives `online_users`; every other channel
    /// receives `user_online`. Returns false if the channel is not open.
    pub async fn announce(&self, user: &str, channel: ChannelId) -> bool {
        let (own, others, online) = {
            let mut state = self.state.write().await;
            let Some(own) = state.channels.get(&channel).cloned() else {
                return false;
            };
            if let Some(previous) = state.user_on(channel) {
                state.users.remove(&previous);
            }
            state.users.insert(user.to_string(), channel);
            state.report();
            (own, state.senders_except(channel), state.online_users())
        };

        debug!(user, channel, online = online.len(), "User announced");
        let _ = deliver(
            channel,
            &own,
            ServerMessage::new(msg_types::ONLINE_USERS, &online),
        );
        let presence = ServerMessage::new(msg_types::USER_ONLINE, user);
        for (id, tx) in others {
            let _ = deliver(id, &tx, presence.clone());
        }
        true
    }

    /// Closes `channel` and, if a user was announced on it, broadcasts
    /// `user_offline`. Withdrawing an unknown channel is a no-op.
    pub async fn withdraw(&self, channel: ChannelId) -> Option<String> {
        let (user, remaining) = {
            let mut state = self.state.write().await;
            state.channels.remove(&channel);
            let user = state.user_on(channel);
            if let Some(user) = &user {
                state.users.remove(user);
            }
            state.report();
            (user, state.senders_except(channel))
        };

        let user = user?;
        debug!(user = %user, channel, "User withdrawn");
        let presence = ServerMessage::new(msg_types::USER_OFFLINE, &user);
        for (id, tx) in remaining {
            let _ = deliver(id, &tx, presence.clone());
        }
        Some(user)
    }

    /// Delivers to `user` only if they are announced. Nothing is queued otherwise.
    pub async fn send(&self, user: &str, message: ServerMessage) -> Result<(), SendError> {
        let target = {
            let state = self.state.read().await;
            state.users.get(user).and_then(|channel| {
                state
                    .channels
                    .get(channel)
                    .map(|tx| (*channel, tx.clone()))
            })
        };
        match target {
            Some((channel, tx)) => deliver(channel, &tx, message),
            None => Err(SendError::NotConnected),
        }
    }

    /// Delivers to a raw channel whether or not anyone announced on it.
    pub async fn send_to_channel(
        &self,
        channel: ChannelId,
        message: ServerMessage,
    ) -> Result<(), SendError> {
        let tx = self.state.read().await.channels.get(&channel).cloned();
        match tx {
            Some(tx) => deliver(channel, &tx, message),
            None => Err(SendError::NotConnected),
        }
    }

    /// Delivers to every open channel. Returns how many sends failed or were
    /// dropped.
    pub async fn broadcast(&self, message: ServerMessage) -> usize {
        let senders: Vec<_> = self
            .state
            .read()
            .await
            .channels
            .iter()
            .map(|(id, tx)| (*id, tx.clone()))
            .collect();
        senders
            .iter()
            .filter(|(id, tx)| deliver(*id, tx, message.clone()).is_err())
            .count()
    }

    /// Announced identities, sorted.
    pub async fn online_users(&self) -> Vec<String> {
        self.state.read().await.online_users()
    }

    pub async fn is_online(&self, user: &str) -> bool {
        self.state.read().await.users.contains_key(user)
    }

    pub async fn channel_count(&self) -> usize {
        self.state.read().await.channels.len()
    }

    /// Drops every channel. Each forwarding task sees its queue close.
    pub async fn shutdown(&self) {
        let mut state = self.state.write().await;
        state.channels.clear();
        state.users.clear();
        state.report();
    }
}
