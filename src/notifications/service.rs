//! Notification service for creating and delivering notifications

use std::sync::Arc;
use tracing::{debug, warn};

use crate::realtime::{msg_types, ConnectionRegistry, ServerMessage};
use crate::server::metrics;
use crate::store::{FullStore, Notification, StoreResult, DEFAULT_NOTIFICATION_LINK};

/// How many notifications a user's feed returns.
pub const NOTIFICATION_FEED_LIMIT: usize = 30;

/// Service for creating notifications and delivering them to connected users
pub struct NotificationService {
    store: Arc<dyn FullStore>,
    registry: Arc<ConnectionRegistry>,
}

impl NotificationService {
    pub fn new(store: Arc<dyn FullStore>, registry: Arc<ConnectionRegistry>) -> Self {
        Self { store, registry }
    }

    /// Persist a notification and push it to the recipient's channel if they
    /// are online.
    ///
    /// Never fails: a storage error is logged and yields `None`. A recipient
    /// who is offline finds the notification unread on their next visit.
    pub async fn notify(
        &self,
        recipient: &str,
        message: &str,
        link: Option<&str>,
    ) -> Option<Notification> {
        let link = link.unwrap_or(DEFAULT_NOTIFICATION_LINK);
        let notification = match self.store.create_notification(recipient, message, link) {
            Ok(n) => n,
            Err(err) => {
                warn!("Failed to store notification for {}: {}", recipient, err);
                metrics::record_notification("failed");
                return None;
            }
        };

        let msg = ServerMessage::new(msg_types::NOTIFICATION, &notification);
        match self.registry.send(recipient, msg).await {
            Ok(()) => metrics::record_notification("delivered"),
            Err(reason) => {
                debug!(
                    "Notification {} for {} kept for later: {:?}",
                    notification.id, recipient, reason
                );
                metrics::record_notification("stored");
            }
        }

        Some(notification)
    }

    /// Newest first, capped at [`NOTIFICATION_FEED_LIMIT`].
    pub fn list_for(&self, recipient: &str) -> StoreResult<Vec<Notification>> {
        self.store
            .list_notifications(recipient, NOTIFICATION_FEED_LIMIT)
    }

    /// Only ids owned by `recipient` are touched.
    pub fn mark_read(&self, recipient: &str, ids: &[i64]) -> StoreResult<usize> {
        self.store.mark_notifications_read(recipient, ids)
    }

    pub fn unread_count(&self, recipient: &str) -> StoreResult<usize> {
        self.store.count_unread_notifications(recipient)
    }
}
