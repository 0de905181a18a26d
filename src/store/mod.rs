//! Durable state for the marketplace.
//!
//! Each concern gets its own trait; [`FullStore`] bundles them for services that
//! need more than one. [`SqliteStore`] implements all of them on one connection.

mod models;
mod schema;
mod sqlite_store;

pub use models::*;
pub use schema::MARKETPLACE_VERSIONED_SCHEMAS;
pub use sqlite_store::SqliteStore;

use thiserror::Error;

use crate::jobs::JobStatus;

#[derive(Debug, Error)]
pub enum StoreError {
    /// A uniqueness constraint rejected the write.
    #[error("{entity} already exists: {key}")]
    Duplicate { entity: &'static str, key: String },

    #[error("{entity} not found: {key}")]
    NotFound { entity: &'static str, key: String },

    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl StoreError {
    pub fn is_duplicate(&self) -> bool {
        matches!(self, StoreError::Duplicate { .. })
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

pub trait JobStore: Send + Sync {
    /// Fails with [`StoreError::Duplicate`] if the job id is taken.
    fn insert_job(&self, job: &Job) -> StoreResult<Job>;
    fn get_job(&self, job_id: &str) -> StoreResult<Option<Job>>;
    fn list_jobs(&self) -> StoreResult<Vec<Job>>;
    /// Writes status, worker and applicants, but only while the stored status
    /// is still `expected`. Returns `None` if the job is gone or has moved on.
    /// Category is left alone so a concurrent categorization is never
    /// overwritten.
    fn update_job_assignment(&self, job: &Job, expected: JobStatus) -> StoreResult<Option<Job>>;
    /// Returns `None` if the job no longer exists.
    fn update_job_category(&self, job_id: &str, category: &str) -> StoreResult<Option<Job>>;
    /// Adds an applicant if the job is still open. Returns `None` if it is not.
    fn add_applicant(&self, job_id: &str, username: &str) -> StoreResult<Option<Job>>;
    fn remove_applicant(&self, job_id: &str, username: &str) -> StoreResult<Option<Job>>;
    fn delete_job(&self, job_id: &str) -> StoreResult<bool>;
}

pub trait CategoryStore: Send + Sync {
    fn list_categories(&self) -> StoreResult<Vec<JobCategory>>;
    fn list_category_names(&self) -> StoreResult<Vec<String>>;
    fn get_category(&self, name: &str) -> StoreResult<Option<JobCategory>>;
    fn find_category_ignore_case(&self, name: &str) -> StoreResult<Option<JobCategory>>;
    /// Fails with [`StoreError::Duplicate`] if the name is taken.
    fn insert_category(&self, category: &JobCategory) -> StoreResult<JobCategory>;
    /// Inserts `category` unless one with the same name exists, and returns the
    /// stored document along with whether this call created it.
    fn create_or_get_category(&self, category: &JobCategory) -> StoreResult<(JobCategory, bool)>;
    /// Appends a job type unless one with the same name (any case) is present.
    /// Returns the updated category only if it changed.
    fn add_job_type_if_missing(
        &self,
        category_name: &str,
        job_type: &JobType,
    ) -> StoreResult<Option<JobCategory>>;
    fn update_category_config(
        &self,
        category_name: &str,
        update: &CategoryConfigUpdate,
    ) -> StoreResult<JobCategory>;
}

pub trait NotificationStore: Send + Sync {
    fn create_notification(
        &self,
        recipient: &str,
        message: &str,
        link: &str,
    ) -> StoreResult<Notification>;
    /// Newest first.
    fn list_notifications(&self, recipient: &str, limit: usize) -> StoreResult<Vec<Notification>>;
    /// Flips the read flag on the given ids that belong to `recipient`.
    fn mark_notifications_read(&self, recipient: &str, ids: &[i64]) -> StoreResult<usize>;
    fn count_unread_notifications(&self, recipient: &str) -> StoreResult<usize>;
}

pub trait EventLogStore: Send + Sync {
    fn append_event_log(&self, entry: &NewEventLog) -> StoreResult<EventLog>;
    /// Newest first.
    fn list_event_logs(&self, limit: usize, offset: usize) -> StoreResult<Vec<EventLog>>;
    /// Deletes entries created before `before_timestamp`, or all of them.
    fn delete_event_logs(&self, before_timestamp: Option<i64>) -> StoreResult<usize>;
}

pub trait SocialStore: Send + Sync {
    /// Fails with [`StoreError::Duplicate`] if `rater` already rated this job.
    fn insert_rating(
        &self,
        job_id: &str,
        rated: &str,
        rater: &str,
        rating: u8,
        comment: Option<&str>,
    ) -> StoreResult<Rating>;
    fn rating_summary(&self, rated: &str) -> StoreResult<RatingSummary>;
    /// Fails with [`StoreError::Duplicate`] if the edge exists.
    fn insert_follow(&self, username: &str, follower: &str) -> StoreResult<Follow>;
    fn delete_follow(&self, username: &str, follower: &str) -> StoreResult<bool>;
    fn list_followers(&self, username: &str) -> StoreResult<Vec<String>>;
    /// Fails with [`StoreError::Duplicate`] if the user already asked to join.
    fn insert_agency_request(&self, agency_id: &str, username: &str)
        -> StoreResult<AgencyRequest>;
}

pub trait ChatStore: Send + Sync {
    fn insert_chat_message(
        &self,
        sender: &str,
        recipient: &str,
        content: &str,
    ) -> StoreResult<ChatMessage>;
    /// Both directions between `a` and `b`, oldest first.
    fn conversation(&self, a: &str, b: &str) -> StoreResult<Vec<ChatMessage>>;
}

pub trait FullStore:
    JobStore + CategoryStore + NotificationStore + EventLogStore + SocialStore + ChatStore
{
}

impl<T> FullStore for T where
    T: JobStore + CategoryStore + NotificationStore + EventLogStore + SocialStore + ChatStore
{
}
