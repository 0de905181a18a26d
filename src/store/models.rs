use serde::{Deserialize, Serialize};

use crate::jobs::{JobStatus, JobTransition, TransitionError};

/// Placeholder category a job carries until classification resolves.
pub const UNCATEGORIZED: &str = "Uncategorized";

/// Employment types every new category starts with.
pub const DEFAULT_CATEGORY_TYPES: [&str; 3] = ["Informal", "Formal", "Temporary"];

pub const DEFAULT_NOTIFICATION_LINK: &str = "#";

// =============================================================================
// Jobs
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub job_id: String,
    pub title: String,
    pub description: String,
    pub category: String,
    pub posted_by: String,
    pub location: Option<String>,
    pub price: Option<f64>,
    pub status: JobStatus,
    pub assigned_to: Option<String>,
    pub applicants: Vec<String>,
    pub created_at: i64,
}

impl Job {
    pub fn is_uncategorized(&self) -> bool {
        self.category == UNCATEGORIZED
    }

    /// Moves the job through `transition`, keeping the worker and applicant fields
    /// consistent with the resulting status.
    pub fn apply_transition(&mut self, transition: JobTransition) -> Result<(), TransitionError> {
        let next = self.status.next(&transition)?;
        if let JobTransition::Assign { worker } = transition {
            let worker = worker.trim();
            if worker.is_empty() {
                return Err(TransitionError::MissingWorker);
            }
            self.assigned_to = Some(worker.to_string());
            self.applicants.clear();
        }
        self.status = next;
        Ok(())
    }
}

// =============================================================================
// Categories
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobType {
    pub name: String,
    #[serde(default)]
    pub image_path: String,
}

impl JobType {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            image_path: String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobCategory {
    pub name: String,
    pub types: Vec<String>,
    pub jobs: Vec<JobType>,
    pub image_path: String,
    pub use_category_default_image: bool,
    #[serde(default)]
    pub created_at: i64,
}

impl JobCategory {
    /// An empty category with the default employment types.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            types: DEFAULT_CATEGORY_TYPES.iter().map(|t| t.to_string()).collect(),
            jobs: Vec::new(),
            image_path: String::new(),
            use_category_default_image: true,
            created_at: 0,
        }
    }

    /// A new category holding a single job type, as created by categorization.
    pub fn seeded(name: impl Into<String>, first_job_type: &str) -> Self {
        let mut category = Self::new(name);
        category.jobs.push(JobType::named(first_job_type));
        category
    }

    pub fn has_job_type(&self, name: &str) -> bool {
        let needle = name.to_lowercase();
        self.jobs.iter().any(|j| j.name.to_lowercase() == needle)
    }
}

/// Partial update for a category's presentation settings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryConfigUpdate {
    pub image_path: Option<String>,
    pub use_category_default_image: Option<bool>,
    /// Image paths for existing job types, matched by exact name. Unknown names are ignored.
    #[serde(default)]
    pub jobs: Vec<JobType>,
}

// =============================================================================
// Notifications
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: i64,
    pub recipient: String,
    pub message: String,
    pub link: String,
    pub is_read: bool,
    pub created_at: i64,
}

// =============================================================================
// Event log
// =============================================================================

/// Kinds of auditable actions. Closed set, SCREAMING_SNAKE_CASE on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventType {
    UserSignup,
    UserLogin,
    UserLogout,
    JobCreated,
    JobStatusUpdated,
    JobCategorized,
    JobRecategorized,
    JobDeleted,
    JobApplicationReceived,
    ProfileUpdated,
    AgencyCreated,
    AgencyUpdated,
    AgencyJoinRequestSent,
    UserRated,
    UserFollowed,
    UserUnfollowed,
    CategoryCreated,
    AdminEventLogCleanup,
    SettingsUpdated,
}

impl EventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::UserSignup => "USER_SIGNUP",
            EventType::UserLogin => "USER_LOGIN",
            EventType::UserLogout => "USER_LOGOUT",
            EventType::JobCreated => "JOB_CREATED",
            EventType::JobStatusUpdated => "JOB_STATUS_UPDATED",
            EventType::JobCategorized => "JOB_CATEGORIZED",
            EventType::JobRecategorized => "JOB_RECATEGORIZED",
            EventType::JobDeleted => "JOB_DELETED",
            EventType::JobApplicationReceived => "JOB_APPLICATION_RECEIVED",
            EventType::ProfileUpdated => "PROFILE_UPDATED",
            EventType::AgencyCreated => "AGENCY_CREATED",
            EventType::AgencyUpdated => "AGENCY_UPDATED",
            EventType::AgencyJoinRequestSent => "AGENCY_JOIN_REQUEST_SENT",
            EventType::UserRated => "USER_RATED",
            EventType::UserFollowed => "USER_FOLLOWED",
            EventType::UserUnfollowed => "USER_UNFOLLOWED",
            EventType::CategoryCreated => "CATEGORY_CREATED",
            EventType::AdminEventLogCleanup => "ADMIN_EVENT_LOG_CLEANUP",
            EventType::SettingsUpdated => "SETTINGS_UPDATED",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        serde_json::from_value(serde_json::Value::String(s.to_string())).ok()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventTarget {
    pub id: String,
    pub model: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestContext {
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
}

/// An event log entry about to be appended.
#[derive(Debug, Clone, PartialEq)]
pub struct NewEventLog {
    pub event_type: EventType,
    pub actor: String,
    pub details: serde_json::Value,
    pub target: Option<EventTarget>,
    pub context: Option<RequestContext>,
}

impl NewEventLog {
    pub fn new(event_type: EventType, actor: impl Into<String>) -> Self {
        Self {
            event_type,
            actor: actor.into(),
            details: serde_json::Value::Null,
            target: None,
            context: None,
        }
    }

    pub fn details(mut self, details: serde_json::Value) -> Self {
        self.details = details;
        self
    }

    pub fn target(mut self, id: impl Into<String>, model: impl Into<String>) -> Self {
        self.target = Some(EventTarget {
            id: id.into(),
            model: model.into(),
        });
        self
    }

    pub fn context(mut self, context: RequestContext) -> Self {
        self.context = Some(context);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventLog {
    pub id: i64,
    pub event_type: EventType,
    pub actor: String,
    pub details: serde_json::Value,
    pub target: Option<EventTarget>,
    pub context: Option<RequestContext>,
    pub created_at: i64,
}

// =============================================================================
// Social
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rating {
    pub id: i64,
    pub job_id: String,
    pub rated: String,
    pub rater: String,
    pub rating: u8,
    pub comment: Option<String>,
    pub created_at: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RatingSummary {
    pub average_rating: f64,
    pub rating_count: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Follow {
    pub username: String,
    pub follower: String,
    pub created_at: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgencyRequestStatus {
    Pending,
    Accepted,
    Rejected,
}

impl AgencyRequestStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AgencyRequestStatus::Pending => "pending",
            AgencyRequestStatus::Accepted => "accepted",
            AgencyRequestStatus::Rejected => "rejected",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(AgencyRequestStatus::Pending),
            "accepted" => Some(AgencyRequestStatus::Accepted),
            "rejected" => Some(AgencyRequestStatus::Rejected),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgencyRequest {
    pub request_id: String,
    pub agency_id: String,
    pub username: String,
    pub status: AgencyRequestStatus,
    pub requested_at: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub id: i64,
    pub sender: String,
    pub recipient: String,
    pub content: String,
    pub timestamp: i64,
}
