use std::sync::Arc;
use tracing::{debug, warn};

use crate::realtime::{msg_types, ConnectionRegistry, ServerMessage};
use crate::server::metrics;
use crate::store::{EventLog, FullStore, NewEventLog, StoreResult};

/// Actor recorded for entries the server produces on its own.
pub const SYSTEM_ACTOR: &str = "system";

/// Records audit entries and announces each one to every connected client.
pub struct EventLogService {
    store: Arc<dyn FullStore>,
    registry: Arc<ConnectionRegistry>,
}

impl EventLogService {
    pub fn new(store: Arc<dyn FullStore>, registry: Arc<ConnectionRegistry>) -> Self {
        Self { store, registry }
    }

    /// Appends `entry` and broadcasts `event_log_created`.
    ///
    /// At most once: a failed append is logged and dropped, and the caller
    /// carries on as if nothing happened.
    pub async fn record(&self, entry: NewEventLog) -> Option<EventLog> {
        let saved = match self.store.append_event_log(&entry) {
            Ok(saved) => saved,
            Err(err) => {
                warn!(
                    "Failed to log {} event by {}: {}",
                    entry.event_type.as_str(),
                    entry.actor,
                    err
                );
                metrics::record_event_log_append("failed");
                return None;
            }
        };
        metrics::record_event_log_append("ok");

        let failed = self
            .registry
            .broadcast(ServerMessage::new(msg_types::EVENT_LOG_CREATED, &saved))
            .await;
        if failed > 0 {
            debug!("event_log_created missed {} closed channels", failed);
        }
        Some(saved)
    }

    /// Newest first.
    pub fn list(&self, limit: usize, offset: usize) -> StoreResult<Vec<EventLog>> {
        self.store.list_event_logs(limit, offset)
    }

    /// Deletes entries older than `before` (unix seconds), or everything.
    pub fn cleanup(&self, before: Option<i64>) -> StoreResult<usize> {
        self.store.delete_event_logs(before)
    }
}
