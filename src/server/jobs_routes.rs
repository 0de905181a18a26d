//! Job and category HTTP routes.
//!
//! - POST   /jobs
//! - GET    /jobs
//! - GET    /jobs/{id}
//! - DELETE /jobs/{id}
//! - POST   /jobs/{id}/apply
//! - POST   /jobs/{id}/applicants/{username}/handle
//! - POST   /jobs/{id}/status
//! - GET    /categories

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;

use super::error::ApiError;
use super::state::{GuardedJobManager, GuardedStore, ServerState};
use crate::actor::Actor;
use crate::jobs::{JobTransition, NewJob};

#[derive(Debug, Deserialize)]
struct HandleApplicantBody {
    #[serde(default)]
    action: String,
}

async fn create_job(
    actor: Actor,
    State(jobs): State<GuardedJobManager>,
    Json(body): Json<NewJob>,
) -> Result<impl IntoResponse, ApiError> {
    let job = jobs.create(&actor, body).await?;
    Ok((StatusCode::CREATED, Json(job)))
}

async fn list_jobs(
    _actor: Actor,
    State(store): State<GuardedStore>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(store.list_jobs()?))
}

async fn get_job(
    _actor: Actor,
    State(jobs): State<GuardedJobManager>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(jobs.get(&id)?))
}

async fn delete_job(
    actor: Actor,
    State(jobs): State<GuardedJobManager>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    jobs.delete(&id, &actor).await?;
    Ok(Json(json!({ "message": "Job deleted." })))
}

async fn apply_to_job(
    actor: Actor,
    State(jobs): State<GuardedJobManager>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(jobs.apply(&id, &actor).await?))
}

async fn handle_applicant(
    actor: Actor,
    State(jobs): State<GuardedJobManager>,
    Path((id, username)): Path<(String, String)>,
    Json(body): Json<HandleApplicantBody>,
) -> Result<impl IntoResponse, ApiError> {
    let job = jobs
        .handle_applicant(&id, &actor, &username, &body.action)
        .await?;
    Ok(Json(job))
}

async fn change_status(
    actor: Actor,
    State(jobs): State<GuardedJobManager>,
    Path(id): Path<String>,
    Json(transition): Json<JobTransition>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(jobs.change_status(&id, &actor, transition).await?))
}

async fn list_categories(
    _actor: Actor,
    State(store): State<GuardedStore>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(store.list_categories()?))
}

pub fn jobs_routes() -> Router<ServerState> {
    Router::new()
        .route("/jobs", post(create_job).get(list_jobs))
        .route("/jobs/{id}", get(get_job).delete(delete_job))
        .route("/jobs/{id}/apply", post(apply_to_job))
        .route(
            "/jobs/{id}/applicants/{username}/handle",
            post(handle_applicant),
        )
        .route("/jobs/{id}/status", post(change_status))
        .route("/categories", get(list_categories))
}
