//! Append-only audit trail of significant state changes.

mod service;

pub use service::{EventLogService, SYSTEM_ACTOR};
