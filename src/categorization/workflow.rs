use std::sync::Arc;

use serde_json::json;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::classifier::{CategorySuggestion, ClassificationRequest, Classifier, ClassifierError};
use crate::event_log::{EventLogService, SYSTEM_ACTOR};
use crate::jobs::JobStatus;
use crate::notifications::NotificationService;
use crate::realtime::content::{self, ContentKind};
use crate::realtime::ConnectionRegistry;
use crate::server::metrics;
use crate::store::{
    EventType, FullStore, Job, JobCategory, JobType, NewEventLog, StoreError,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategorizationTrigger {
    /// Right after the job was created.
    Automatic,
    /// An admin asked for the job to be classified again.
    Manual { admin: String },
}

impl CategorizationTrigger {
    fn label(&self) -> &'static str {
        match self {
            CategorizationTrigger::Automatic => "automatic",
            CategorizationTrigger::Manual { .. } => "manual",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategorizationRequest {
    pub job_id: String,
    pub trigger: CategorizationTrigger,
}

impl CategorizationRequest {
    pub fn automatic(job_id: impl Into<String>) -> Self {
        Self {
            job_id: job_id.into(),
            trigger: CategorizationTrigger::Automatic,
        }
    }

    pub fn manual(job_id: impl Into<String>, admin: impl Into<String>) -> Self {
        Self {
            job_id: job_id.into(),
            trigger: CategorizationTrigger::Manual {
                admin: admin.into(),
            },
        }
    }
}

#[derive(Debug, Clone)]
pub struct CategorizationOutcome {
    pub job: Job,
    pub category: JobCategory,
    pub category_created: bool,
    pub job_type_added: bool,
}

#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error("job {0} not found")]
    JobNotFound(String),

    #[error("job {0} has no title to classify")]
    MissingTitle(String),

    #[error(transparent)]
    Classifier(#[from] ClassifierError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl WorkflowError {
    fn label(&self) -> &'static str {
        match self {
            WorkflowError::JobNotFound(_) => "job_not_found",
            WorkflowError::MissingTitle(_) => "missing_title",
            WorkflowError::Classifier(_) => "classifier_failed",
            WorkflowError::Store(_) => "store_failed",
        }
    }
}

/// Moves one job out of the placeholder category.
///
/// Steps after the classifier call are separate writes, not one transaction.
/// Concurrent runs that settle on the same new name meet in
/// `create_or_get_category`, and job types are appended under the store's
/// lock, so neither duplicates a category nor loses a job type.
pub struct CategorizationWorkflow {
    store: Arc<dyn FullStore>,
    classifier: Arc<dyn Classifier>,
    event_log: Arc<EventLogService>,
    notifications: Arc<NotificationService>,
    registry: Arc<ConnectionRegistry>,
}

impl CategorizationWorkflow {
    pub fn new(
        store: Arc<dyn FullStore>,
        classifier: Arc<dyn Classifier>,
        event_log: Arc<EventLogService>,
        notifications: Arc<NotificationService>,
        registry: Arc<ConnectionRegistry>,
    ) -> Self {
        Self {
            store,
            classifier,
            event_log,
            notifications,
            registry,
        }
    }

    pub async fn run(
        &self,
        request: &CategorizationRequest,
    ) -> Result<CategorizationOutcome, WorkflowError> {
        let result = self.execute(request).await;
        let outcome = match &result {
            Ok(_) => "categorized",
            Err(e) => e.label(),
        };
        metrics::record_categorization_run(request.trigger.label(), outcome);
        result
    }

    async fn execute(
        &self,
        request: &CategorizationRequest,
    ) -> Result<CategorizationOutcome, WorkflowError> {
        let job_id = request.job_id.as_str();
        let job = self
            .store
            .get_job(job_id)?
            .ok_or_else(|| WorkflowError::JobNotFound(job_id.to_string()))?;

        let title = job.title.trim().to_string();
        if title.is_empty() {
            return Err(WorkflowError::MissingTitle(job_id.to_string()));
        }

        let known_categories = self.store.list_category_names()?;
        let suggestion = self
            .classifier
            .classify(&ClassificationRequest {
                title: title.clone(),
                description: job.description.clone(),
                known_categories,
            })
            .await?;
        debug!(
            job_id,
            category = %suggestion.name,
            is_new = suggestion.is_new,
            "Classifier suggested a category"
        );

        let (category, category_created) = self.resolve_category(&suggestion, &title)?;

        let (category, job_type_added) = if category_created {
            (category, false)
        } else {
            match self
                .store
                .add_job_type_if_missing(&category.name, &JobType::named(title.as_str()))?
            {
                Some(updated) => (updated, true),
                None => (category, false),
            }
        };

        let job = self
            .store
            .update_job_category(job_id, &category.name)?
            .ok_or_else(|| WorkflowError::JobNotFound(job_id.to_string()))?;

        if category_created {
            self.registry
                .broadcast(content::created(ContentKind::JobCategories, &category))
                .await;
        } else if job_type_added {
            self.registry
                .broadcast(content::updated(ContentKind::JobCategories, &category))
                .await;
        }
        self.registry
            .broadcast(content::updated(ContentKind::Jobs, &job))
            .await;

        let (event_type, actor) = match &request.trigger {
            CategorizationTrigger::Automatic => (EventType::JobCategorized, SYSTEM_ACTOR),
            CategorizationTrigger::Manual { admin } => {
                (EventType::JobRecategorized, admin.as_str())
            }
        };
        self.event_log
            .record(
                NewEventLog::new(event_type, actor)
                    .details(json!({
                        "title": job.title,
                        "category": category.name,
                        "categoryCreated": category_created,
                    }))
                    .target(job_id, "Job"),
            )
            .await;

        // A direct hire hears about it only once the job has its real category.
        if request.trigger == CategorizationTrigger::Automatic && job.status == JobStatus::Assigned
        {
            if let Some(worker) = &job.assigned_to {
                self.notifications
                    .notify(
                        worker,
                        &format!(
                            "You have been hired for the job: \"{}\"! Please accept or decline the offer in your dashboard.",
                            job.title
                        ),
                        Some("#dashboard"),
                    )
                    .await;
            }
        }

        info!(
            job_id,
            category = %category.name,
            category_created,
            job_type_added,
            "Job categorized"
        );

        Ok(CategorizationOutcome {
            job,
            category,
            category_created,
            job_type_added,
        })
    }

    /// Finds the suggested category (exact name, then ignoring case) or
    /// creates it seeded with `title`.
    fn resolve_category(
        &self,
        suggestion: &CategorySuggestion,
        title: &str,
    ) -> Result<(JobCategory, bool), StoreError> {
        let existing = match self.store.get_category(&suggestion.name)? {
            Some(category) => Some(category),
            None => self.store.find_category_ignore_case(&suggestion.name)?,
        };
        if let Some(category) = existing {
            return Ok((category, false));
        }

        if !suggestion.is_new {
            warn!(
                "Classifier picked unknown category \"{}\", creating it",
                suggestion.name
            );
        }
        let (category, created) = self
            .store
            .create_or_get_category(&JobCategory::seeded(suggestion.name.as_str(), title))?;
        if !created {
            debug!(
                "Category \"{}\" was created concurrently, reusing it",
                category.name
            );
        }
        Ok((category, created))
    }
}
