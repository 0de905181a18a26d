//! Job lifecycle state machine.
//!
//! A job moves strictly forward: `open -> assigned -> in-progress -> closed`, with a
//! shortcut from `open` and `assigned` straight to `closed`. Anything else is rejected.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum JobStatus {
    Open,
    Assigned,
    InProgress,
    Closed,
}

impl JobStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Open => "open",
            JobStatus::Assigned => "assigned",
            JobStatus::InProgress => "in-progress",
            JobStatus::Closed => "closed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "open" => Some(JobStatus::Open),
            "assigned" => Some(JobStatus::Assigned),
            "in-progress" => Some(JobStatus::InProgress),
            "closed" => Some(JobStatus::Closed),
            _ => None,
        }
    }

    /// Whether a worker is expected to be attached to a job in this status.
    pub fn requires_worker(&self) -> bool {
        matches!(self, JobStatus::Assigned | JobStatus::InProgress)
    }

    /// Resolves the status reached by applying `transition`, or rejects it.
    pub fn next(self, transition: &JobTransition) -> Result<JobStatus, TransitionError> {
        use JobStatus::*;
        let next = match (self, transition) {
            (Open, JobTransition::Assign { .. }) => Assigned,
            (Open, JobTransition::Close) => Closed,
            (Assigned, JobTransition::Start) => InProgress,
            (Assigned, JobTransition::Close) => Closed,
            (InProgress, JobTransition::Close) => Closed,
            (Open, JobTransition::Start)
            | (Assigned, JobTransition::Assign { .. })
            | (InProgress, JobTransition::Assign { .. })
            | (InProgress, JobTransition::Start)
            | (Closed, _) => {
                return Err(TransitionError::NotAllowed {
                    from: self,
                    transition: transition.name(),
                })
            }
        };
        Ok(next)
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "transition", rename_all = "lowercase")]
pub enum JobTransition {
    Assign { worker: String },
    Start,
    Close,
}

impl JobTransition {
    pub fn name(&self) -> &'static str {
        match self {
            JobTransition::Assign { .. } => "assign",
            JobTransition::Start => "start",
            JobTransition::Close => "close",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransitionError {
    #[error("cannot {transition} a job that is {from}")]
    NotAllowed {
        from: JobStatus,
        transition: &'static str,
    },
    #[error("a worker name is required to assign a job")]
    MissingWorker,
}
