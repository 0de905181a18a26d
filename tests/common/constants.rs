//! Shared constants for end-to-end tests

// ============================================================================
// Test Users
// ============================================================================

/// Posts jobs in most scenarios
pub const POSTER: &str = "poster";

/// Applies to and works on jobs
pub const WORKER: &str = "worker";

/// A second applicant competing with `WORKER`
pub const OTHER_WORKER: &str = "other-worker";

/// Sent with `X-Role: admin`
pub const ADMIN_USER: &str = "admin";

// ============================================================================
// Classifier answers
// ============================================================================

pub const EXISTING_DOMESTIC: &str = r#"{"name": "Domestic work", "isNew": false}"#;

pub const NEW_DATA_SCIENCE: &str = r#"{"name": "Data Science", "isNew": true}"#;

/// Placeholder category a job has until classification resolves
pub const UNCATEGORIZED: &str = "Uncategorized";

// ============================================================================
// Timeouts
// ============================================================================

/// Maximum time to wait for the server to become ready (milliseconds)
pub const SERVER_READY_TIMEOUT_MS: u64 = 5000;

/// HTTP request timeout (seconds)
pub const REQUEST_TIMEOUT_SECS: u64 = 10;

/// Polling interval when waiting for the server (milliseconds)
pub const SERVER_READY_POLL_INTERVAL_MS: u64 = 50;

/// How long to wait for a background categorization run to land
pub const CATEGORIZATION_TIMEOUT_MS: u64 = 3000;
