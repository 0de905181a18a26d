//! Mapping from domain errors to HTTP responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

use super::metrics;
use crate::categorization::WorkflowError;
use crate::jobs::{JobError, TransitionError};
use crate::side_documents::SideDocumentError;
use crate::social::SocialError;
use crate::store::StoreError;

/// Every handler error ends up here. The body is always `{"message": ...}`.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    /// The classifier failed while the caller waited for it.
    #[error("{0}")]
    BadGateway(String),

    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest(message.into())
    }

    fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::BadGateway(_) => StatusCode::BAD_GATEWAY,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            ApiError::Internal(detail) => {
                error!("Internal error: {}", detail);
                metrics::record_error("internal", "api");
                "Internal server error.".to_string()
            }
            ApiError::BadGateway(detail) => {
                metrics::record_error("classifier", "api");
                detail.clone()
            }
            other => other.to_string(),
        };
        (status, Json(json!({ "message": message }))).into_response()
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Duplicate { .. } => ApiError::Conflict(err.to_string()),
            StoreError::NotFound { .. } => ApiError::NotFound(err.to_string()),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl From<JobError> for ApiError {
    fn from(err: JobError) -> Self {
        match err {
            JobError::NotFound => ApiError::NotFound(err.to_string()),
            JobError::Forbidden(_) => ApiError::Forbidden(err.to_string()),
            JobError::Conflict | JobError::Transition(TransitionError::NotAllowed { .. }) => {
                ApiError::Conflict(err.to_string())
            }
            JobError::NotOpen
            | JobError::OwnJob
            | JobError::NotApplicant
            | JobError::InvalidAction
            | JobError::Validation(_)
            | JobError::Transition(_) => ApiError::BadRequest(err.to_string()),
            JobError::Store(store) => store.into(),
        }
    }
}

impl From<SocialError> for ApiError {
    fn from(err: SocialError) -> Self {
        match err {
            SocialError::Validation(_) | SocialError::SelfFollow => {
                ApiError::BadRequest(err.to_string())
            }
            SocialError::AlreadyFollowing
            | SocialError::AlreadyRated
            | SocialError::AlreadyRequested => ApiError::Conflict(err.to_string()),
            SocialError::NotFollowing | SocialError::JobNotFound => {
                ApiError::NotFound(err.to_string())
            }
            SocialError::Forbidden(_) => ApiError::Forbidden(err.to_string()),
            SocialError::Store(store) => store.into(),
        }
    }
}

impl From<WorkflowError> for ApiError {
    fn from(err: WorkflowError) -> Self {
        match err {
            WorkflowError::JobNotFound(_) => ApiError::NotFound(err.to_string()),
            WorkflowError::MissingTitle(_) => ApiError::BadRequest(err.to_string()),
            WorkflowError::Classifier(e) => {
                ApiError::BadGateway(format!("Categorization failed: {}", e))
            }
            WorkflowError::Store(store) => store.into(),
        }
    }
}

impl From<SideDocumentError> for ApiError {
    fn from(err: SideDocumentError) -> Self {
        match err {
            SideDocumentError::NotAnObject => ApiError::BadRequest(err.to_string()),
            other => ApiError::Internal(other.to_string()),
        }
    }
}
