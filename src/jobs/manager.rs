use std::sync::Arc;

use serde::Deserialize;
use serde_json::json;
use thiserror::Error;
use tracing::info;

use super::status::{JobStatus, JobTransition, TransitionError};
use crate::actor::Actor;
use crate::categorization::{
    CategorizationOutcome, CategorizationQueue, CategorizationRequest, CategorizationWorkflow,
    WorkflowError,
};
use crate::event_log::EventLogService;
use crate::notifications::NotificationService;
use crate::realtime::content::{self, ContentKind};
use crate::realtime::ConnectionRegistry;
use crate::store::{EventType, FullStore, Job, NewEventLog, StoreError, UNCATEGORIZED};

const DASHBOARD_LINK: &str = "#dashboard";

/// Body of a job creation request.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewJob {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub location: Option<String>,
    pub price: Option<f64>,
    /// Hire this worker directly instead of collecting applications.
    pub assigned_to: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplicantAction {
    Accept,
    Reject,
}

impl ApplicantAction {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "accept" => Some(ApplicantAction::Accept),
            "reject" => Some(ApplicantAction::Reject),
            _ => None,
        }
    }
}

#[derive(Debug, Error)]
pub enum JobError {
    #[error("Job not found.")]
    NotFound,

    #[error("{0}")]
    Forbidden(&'static str),

    #[error("This job is not open for applications.")]
    NotOpen,

    #[error("You cannot apply to your own job.")]
    OwnJob,

    #[error("This user is not an applicant for this job.")]
    NotApplicant,

    #[error("Invalid action specified.")]
    InvalidAction,

    #[error("{0}")]
    Validation(String),

    #[error("This job was changed by someone else. Reload it and try again.")]
    Conflict,

    #[error(transparent)]
    Transition(#[from] TransitionError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Job operations and their side effects.
///
/// Each operation commits its write first. The event log entry, notifications
/// and broadcasts that follow are best effort and never undo the write.
pub struct JobManager {
    store: Arc<dyn FullStore>,
    event_log: Arc<EventLogService>,
    notifications: Arc<NotificationService>,
    registry: Arc<ConnectionRegistry>,
    workflow: Arc<CategorizationWorkflow>,
    queue: CategorizationQueue,
}

impl JobManager {
    pub fn new(
        store: Arc<dyn FullStore>,
        event_log: Arc<EventLogService>,
        notifications: Arc<NotificationService>,
        registry: Arc<ConnectionRegistry>,
        workflow: Arc<CategorizationWorkflow>,
        queue: CategorizationQueue,
    ) -> Self {
        Self {
            store,
            event_log,
            notifications,
            registry,
            workflow,
            queue,
        }
    }

    fn load(&self, job_id: &str) -> Result<Job, JobError> {
        self.store.get_job(job_id)?.ok_or(JobError::NotFound)
    }

    async fn log(&self, actor: &Actor, event_type: EventType, job: &Job, details: serde_json::Value) {
        self.event_log
            .record(
                NewEventLog::new(event_type, actor.username.as_str())
                    .details(details)
                    .target(job.job_id.as_str(), "Job")
                    .context(actor.context.clone()),
            )
            .await;
    }

    async fn broadcast_updated(&self, job: &Job) {
        self.registry
            .broadcast(content::updated(ContentKind::Jobs, job))
            .await;
    }

    pub fn get(&self, job_id: &str) -> Result<Job, JobError> {
        self.load(job_id)
    }

    /// Stores the job under the placeholder category and queues its
    /// categorization. Returns before categorization starts.
    pub async fn create(&self, poster: &Actor, new_job: NewJob) -> Result<Job, JobError> {
        let title = new_job.title.trim();
        if title.is_empty() {
            return Err(JobError::Validation("Job title is required.".to_string()));
        }
        if new_job.price.is_some_and(|p| !p.is_finite() || p < 0.0) {
            return Err(JobError::Validation(
                "Price must be a non-negative number.".to_string(),
            ));
        }

        let mut job = Job {
            job_id: uuid::Uuid::new_v4().to_string(),
            title: title.to_string(),
            description: new_job.description.trim().to_string(),
            category: UNCATEGORIZED.to_string(),
            posted_by: poster.username.clone(),
            location: new_job.location.filter(|l| !l.trim().is_empty()),
            price: new_job.price,
            status: JobStatus::Open,
            assigned_to: None,
            applicants: Vec::new(),
            created_at: chrono::Utc::now().timestamp(),
        };

        if let Some(worker) = new_job.assigned_to.filter(|w| !w.trim().is_empty()) {
            if poster.is(worker.trim()) {
                return Err(JobError::Validation("You cannot hire yourself.".to_string()));
            }
            job.apply_transition(JobTransition::Assign { worker })?;
        }

        let job = self.store.insert_job(&job)?;
        info!("Job {} \"{}\" created by {}", job.job_id, job.title, job.posted_by);

        self.log(
            poster,
            EventType::JobCreated,
            &job,
            json!({ "title": job.title, "category": "Pending AI Categorization" }),
        )
        .await;
        self.registry
            .broadcast(content::created(ContentKind::Jobs, &job))
            .await;

        self.queue
            .submit(CategorizationRequest::automatic(job.job_id.as_str()));
        Ok(job)
    }

    pub async fn apply(&self, job_id: &str, applicant: &Actor) -> Result<Job, JobError> {
        let job = self.load(job_id)?;
        if job.status != JobStatus::Open {
            return Err(JobError::NotOpen);
        }
        if applicant.is(&job.posted_by) {
            return Err(JobError::OwnJob);
        }

        let job = self
            .store
            .add_applicant(job_id, &applicant.username)?
            .ok_or(JobError::NotOpen)?;

        self.log(
            applicant,
            EventType::JobApplicationReceived,
            &job,
            json!({
                "message": format!("User '{}' applied for job '{}'.", applicant.username, job.title)
            }),
        )
        .await;
        self.notifications
            .notify(
                &job.posted_by,
                &format!(
                    "{} has applied for your job: \"{}\"!",
                    applicant.username, job.title
                ),
                Some(DASHBOARD_LINK),
            )
            .await;
        self.broadcast_updated(&job).await;
        Ok(job)
    }

    /// The poster accepts (hires) or rejects one applicant.
    pub async fn handle_applicant(
        &self,
        job_id: &str,
        poster: &Actor,
        applicant: &str,
        action: &str,
    ) -> Result<Job, JobError> {
        let action = ApplicantAction::parse(action).ok_or(JobError::InvalidAction)?;
        let mut job = self.load(job_id)?;
        if !poster.is(&job.posted_by) {
            return Err(JobError::Forbidden(
                "You are not authorized to manage applicants for this job.",
            ));
        }
        if !job.applicants.iter().any(|a| a == applicant) {
            return Err(JobError::NotApplicant);
        }

        match action {
            ApplicantAction::Accept => {
                if job.status != JobStatus::Open {
                    return Err(JobError::NotOpen);
                }
                let others: Vec<String> = job
                    .applicants
                    .iter()
                    .filter(|a| *a != applicant)
                    .cloned()
                    .collect();
                let from = job.status;
                job.apply_transition(JobTransition::Assign {
                    worker: applicant.to_string(),
                })?;
                let job = self.commit_transition(&job, from)?;

                self.log(
                    poster,
                    EventType::JobStatusUpdated,
                    &job,
                    json!({ "title": job.title, "from": from, "to": job.status, "assignedTo": applicant }),
                )
                .await;
                self.notifications
                    .notify(
                        applicant,
                        &format!(
                            "Congratulations! You have been hired for the job: \"{}\"! Please accept or decline the offer in your dashboard.",
                            job.title
                        ),
                        Some(DASHBOARD_LINK),
                    )
                    .await;
                for other in &others {
                    self.notifications
                        .notify(
                            other,
                            &format!(
                                "Your application for \"{}\" was not successful as the position has been filled.",
                                job.title
                            ),
                            Some(DASHBOARD_LINK),
                        )
                        .await;
                }
                self.broadcast_updated(&job).await;
                Ok(job)
            }
            ApplicantAction::Reject => {
                let job = self
                    .store
                    .remove_applicant(job_id, applicant)?
                    .ok_or(JobError::NotFound)?;
                self.notifications
                    .notify(
                        applicant,
                        &format!(
                            "Unfortunately, your application for \"{}\" was not successful at this time.",
                            job.title
                        ),
                        Some(DASHBOARD_LINK),
                    )
                    .await;
                self.broadcast_updated(&job).await;
                Ok(job)
            }
        }
    }

    /// Moves the job along its lifecycle. The poster, the assigned worker and
    /// admins may do so; only the poster (or an admin) may assign.
    pub async fn change_status(
        &self,
        job_id: &str,
        actor: &Actor,
        transition: JobTransition,
    ) -> Result<Job, JobError> {
        let mut job = self.load(job_id)?;
        let is_poster = actor.is(&job.posted_by);
        let is_worker = job.assigned_to.as_deref() == Some(actor.username.as_str());
        let allowed = match &transition {
            JobTransition::Assign { .. } => is_poster || actor.is_admin,
            JobTransition::Start | JobTransition::Close => {
                is_poster || is_worker || actor.is_admin
            }
        };
        if !allowed {
            return Err(JobError::Forbidden(
                "You are not authorized to change the status of this job.",
            ));
        }

        let from = job.status;
        job.apply_transition(transition.clone())?;
        let job = self.commit_transition(&job, from)?;

        self.log(
            actor,
            EventType::JobStatusUpdated,
            &job,
            json!({ "title": job.title, "from": from, "to": job.status }),
        )
        .await;

        match (&transition, job.assigned_to.as_deref()) {
            (JobTransition::Assign { .. }, Some(worker)) => {
                self.notifications
                    .notify(
                        worker,
                        &format!(
                            "You have been hired for the job: \"{}\"! Please accept or decline the offer in your dashboard.",
                            job.title
                        ),
                        Some(DASHBOARD_LINK),
                    )
                    .await;
            }
            (JobTransition::Start, Some(worker)) if !actor.is(&job.posted_by) => {
                self.notifications
                    .notify(
                        &job.posted_by,
                        &format!("{} has ACCEPTED the job: \"{}\"!", worker, job.title),
                        Some(DASHBOARD_LINK),
                    )
                    .await;
            }
            _ => {}
        }

        self.broadcast_updated(&job).await;
        Ok(job)
    }

    /// Writes a transitioned job unless another request moved it first.
    fn commit_transition(&self, job: &Job, from: JobStatus) -> Result<Job, JobError> {
        match self.store.update_job_assignment(job, from)? {
            Some(job) => Ok(job),
            None if self.store.get_job(&job.job_id)?.is_some() => Err(JobError::Conflict),
            None => Err(JobError::NotFound),
        }
    }

    pub async fn delete(&self, job_id: &str, actor: &Actor) -> Result<(), JobError> {
        let job = self.load(job_id)?;
        if !actor.is(&job.posted_by) && !actor.is_admin {
            return Err(JobError::Forbidden("You can only delete your own jobs."));
        }
        if !self.store.delete_job(job_id)? {
            return Err(JobError::NotFound);
        }

        self.log(actor, EventType::JobDeleted, &job, json!({ "title": job.title }))
            .await;
        self.registry
            .broadcast(content::deleted(ContentKind::Jobs, job_id))
            .await;
        Ok(())
    }

    /// Runs categorization again right away, on behalf of an admin.
    pub async fn recategorize(
        &self,
        job_id: &str,
        admin: &Actor,
    ) -> Result<CategorizationOutcome, WorkflowError> {
        self.workflow
            .run(&CategorizationRequest::manual(job_id, admin.username.as_str()))
            .await
    }
}
