//! Per-user notifications: persisted first, then pushed live if the
//! recipient is connected.

mod service;

pub use service::{NotificationService, NOTIFICATION_FEED_LIMIT};
