//! Jobboard server library
//!
//! Exposes the internal modules for the binary and the end-to-end tests.

pub mod actor;
pub mod categorization;
pub mod classifier;
pub mod config;
pub mod event_log;
pub mod jobs;
pub mod notifications;
pub mod realtime;
pub mod server;
pub mod side_documents;
pub mod social;
pub mod sqlite_persistence;
pub mod store;

pub use server::{make_app, run_server, RequestsLoggingLevel, ServerConfig, ServerState};
pub use store::{FullStore, SqliteStore};
