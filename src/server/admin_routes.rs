//! Admin-only routes: recategorization, category management, the event log
//! feed and the side documents.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::info;

use super::error::ApiError;
use super::session::AdminActor;
use super::state::{
    GuardedConnectionRegistry, GuardedEventLogService, GuardedJobManager, GuardedSideDocuments,
    GuardedStore, ServerState,
};
use crate::realtime::content::{self, ContentKind};
use crate::realtime::{msg_types, ServerMessage};
use crate::side_documents::SideDocument;
use crate::store::{CategoryConfigUpdate, EventType, JobCategory, JobType, NewEventLog};

const DEFAULT_EVENT_LOG_PAGE: usize = 50;
const MAX_EVENT_LOG_PAGE: usize = 500;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RecategorizeResponse {
    job: crate::store::Job,
    category: JobCategory,
    category_created: bool,
    job_type_added: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NewCategoryBody {
    #[serde(default)]
    name: String,
    types: Option<Vec<String>>,
    #[serde(default)]
    jobs: Vec<JobType>,
    #[serde(default)]
    image_path: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NewJobTypeBody {
    #[serde(default)]
    name: String,
    #[serde(default)]
    image_path: String,
}

#[derive(Debug, Deserialize)]
struct EventLogPage {
    limit: Option<usize>,
    #[serde(default)]
    offset: usize,
}

#[derive(Debug, Deserialize)]
struct EventLogCleanupQuery {
    /// Unix seconds. Entries created before this are removed; absent means all.
    before: Option<i64>,
}

async fn recategorize_job(
    AdminActor(admin): AdminActor,
    State(jobs): State<GuardedJobManager>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let outcome = jobs.recategorize(&id, &admin).await?;
    Ok(Json(RecategorizeResponse {
        job: outcome.job,
        category: outcome.category,
        category_created: outcome.category_created,
        job_type_added: outcome.job_type_added,
    }))
}

async fn create_category(
    AdminActor(admin): AdminActor,
    State(store): State<GuardedStore>,
    State(event_log): State<GuardedEventLogService>,
    State(registry): State<GuardedConnectionRegistry>,
    Json(body): Json<NewCategoryBody>,
) -> Result<impl IntoResponse, ApiError> {
    let name = body.name.trim();
    if name.is_empty() {
        return Err(ApiError::bad_request("Category name is required."));
    }
    if let Some(existing) = store.find_category_ignore_case(name)? {
        return Err(ApiError::Conflict(format!(
            "Category \"{}\" already exists.",
            existing.name
        )));
    }

    let mut category = JobCategory::new(name);
    if let Some(types) = body.types.filter(|t| !t.is_empty()) {
        category.types = types;
    }
    category.jobs = body.jobs;
    category.image_path = body.image_path;
    let category = store.insert_category(&category)?;
    info!("Category \"{}\" created by {}", category.name, admin.username);

    event_log
        .record(
            NewEventLog::new(EventType::CategoryCreated, admin.username.as_str())
                .details(json!({ "name": category.name }))
                .target(category.name.as_str(), "JobCategory")
                .context(admin.context.clone()),
        )
        .await;
    registry
        .broadcast(content::created(ContentKind::JobCategories, &category))
        .await;
    Ok((StatusCode::CREATED, Json(category)))
}

/// Adding a job type that is already present (any case) changes nothing.
async fn add_job_type(
    AdminActor(_admin): AdminActor,
    State(store): State<GuardedStore>,
    State(registry): State<GuardedConnectionRegistry>,
    Path(name): Path<String>,
    Json(body): Json<NewJobTypeBody>,
) -> Result<impl IntoResponse, ApiError> {
    let job_name = body.name.trim();
    if job_name.is_empty() {
        return Err(ApiError::bad_request("Job type name is required."));
    }
    let job_type = JobType {
        name: job_name.to_string(),
        image_path: body.image_path,
    };

    match store.add_job_type_if_missing(&name, &job_type)? {
        Some(updated) => {
            registry
                .broadcast(content::updated(ContentKind::JobCategories, &updated))
                .await;
            Ok((StatusCode::CREATED, Json(updated)))
        }
        None => {
            let current = store
                .get_category(&name)?
                .ok_or_else(|| ApiError::NotFound(format!("Category \"{}\" not found.", name)))?;
            Ok((StatusCode::OK, Json(current)))
        }
    }
}

async fn update_category_config(
    AdminActor(_admin): AdminActor,
    State(store): State<GuardedStore>,
    State(registry): State<GuardedConnectionRegistry>,
    Path(name): Path<String>,
    Json(update): Json<CategoryConfigUpdate>,
) -> Result<impl IntoResponse, ApiError> {
    let category = store.update_category_config(&name, &update)?;
    registry
        .broadcast(content::updated(ContentKind::JobCategories, &category))
        .await;
    Ok(Json(category))
}

async fn list_event_logs(
    AdminActor(_admin): AdminActor,
    State(event_log): State<GuardedEventLogService>,
    Query(page): Query<EventLogPage>,
) -> Result<impl IntoResponse, ApiError> {
    let limit = page
        .limit
        .unwrap_or(DEFAULT_EVENT_LOG_PAGE)
        .clamp(1, MAX_EVENT_LOG_PAGE);
    Ok(Json(event_log.list(limit, page.offset)?))
}

async fn cleanup_event_logs(
    AdminActor(admin): AdminActor,
    State(event_log): State<GuardedEventLogService>,
    Query(query): Query<EventLogCleanupQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let deleted = event_log.cleanup(query.before)?;
    info!("{} removed {} event log entries", admin.username, deleted);

    event_log
        .record(
            NewEventLog::new(EventType::AdminEventLogCleanup, admin.username.as_str())
                .details(json!({ "deleted": deleted, "before": query.before }))
                .context(admin.context.clone()),
        )
        .await;
    Ok(Json(json!({ "deleted": deleted })))
}

async fn get_settings(
    AdminActor(_admin): AdminActor,
    State(docs): State<GuardedSideDocuments>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(docs.read(SideDocument::Settings).await?))
}

async fn put_settings(
    AdminActor(admin): AdminActor,
    State(docs): State<GuardedSideDocuments>,
    State(event_log): State<GuardedEventLogService>,
    State(registry): State<GuardedConnectionRegistry>,
    Json(patch): Json<Value>,
) -> Result<impl IntoResponse, ApiError> {
    let changed_keys: Vec<String> = patch
        .as_object()
        .map(|m| m.keys().cloned().collect())
        .unwrap_or_default();
    let merged = docs.merge_settings(patch).await?;

    event_log
        .record(
            NewEventLog::new(EventType::SettingsUpdated, admin.username.as_str())
                .details(json!({ "keys": changed_keys }))
                .context(admin.context.clone()),
        )
        .await;
    registry
        .broadcast(ServerMessage::new(msg_types::SETTINGS_UPDATED, &merged))
        .await;
    Ok(Json(merged))
}

async fn get_about_content(
    AdminActor(_admin): AdminActor,
    State(docs): State<GuardedSideDocuments>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(docs.read(SideDocument::About).await?))
}

async fn put_about_content(
    AdminActor(_admin): AdminActor,
    State(docs): State<GuardedSideDocuments>,
    State(registry): State<GuardedConnectionRegistry>,
    Json(content): Json<Value>,
) -> Result<impl IntoResponse, ApiError> {
    let content = docs.replace_about(content).await?;
    registry
        .broadcast(ServerMessage::new(msg_types::ABOUT_CONTENT_UPDATED, &content))
        .await;
    Ok(Json(content))
}

pub fn admin_routes() -> Router<ServerState> {
    Router::new()
        .route("/jobs/{id}/recategorize", post(recategorize_job))
        .route("/categories", post(create_category))
        .route("/categories/{name}/jobs", post(add_job_type))
        .route("/categories/{name}/config", put(update_category_config))
        .route(
            "/event-logs",
            get(list_event_logs).delete(cleanup_event_logs),
        )
        .route("/settings", get(get_settings).put(put_settings))
        .route(
            "/about-content",
            get(get_about_content).put(put_about_content),
        )
}
