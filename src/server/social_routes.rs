//! Routes for follows, ratings, agency requests, notifications and chat history.

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
use super::state::{GuardedNotificationService, GuardedSocialManager, ServerState};
use crate::actor::Actor;
use crate::social::NewRating;

#[derive(Debug, Deserialize)]
struct MarkReadBody {
    #[serde(default)]
    ids: Vec<i64>,
}

async fn rate_user(
    actor: Actor,
    State(social): State<GuardedSocialManager>,
    Json(body): Json<NewRating>,
) -> Result<impl IntoResponse, ApiError> {
    let rating = social.rate(&actor, body).await?;
    Ok((StatusCode::CREATED, Json(rating)))
}

async fn get_rating_summary(
    _actor: Actor,
    State(social): State<GuardedSocialManager>,
    Path(username): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(social.rating_summary(&username)?))
}

async fn follow_user(
    actor: Actor,
    State(social): State<GuardedSocialManager>,
    Path(username): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let follow = social.follow(&actor, &username).await?;
    Ok((StatusCode::CREATED, Json(follow)))
}

async fn unfollow_user(
    actor: Actor,
    State(social): State<GuardedSocialManager>,
    Path(username): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    social.unfollow(&actor, &username).await?;
    Ok(Json(json!({ "message": format!("You unfollowed {}.", username) })))
}

async fn get_followers(
    _actor: Actor,
    State(social): State<GuardedSocialManager>,
    Path(username): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(social.followers(&username)?))
}

async fn request_agency_join(
    actor: Actor,
    State(social): State<GuardedSocialManager>,
    Path(agency_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let request = social.request_agency_join(&actor, &agency_id).await?;
    Ok((StatusCode::CREATED, Json(request)))
}

async fn get_notifications(
    actor: Actor,
    State(notifications): State<GuardedNotificationService>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(notifications.list_for(&actor.username)?))
}

async fn get_unread_count(
    actor: Actor,
    State(notifications): State<GuardedNotificationService>,
) -> Result<impl IntoResponse, ApiError> {
    let count = notifications.unread_count(&actor.username)?;
    Ok(Json(json!({ "unreadCount": count })))
}

async fn mark_notifications_read(
    actor: Actor,
    State(notifications): State<GuardedNotificationService>,
    Json(body): Json<MarkReadBody>,
) -> Result<impl IntoResponse, ApiError> {
    if body.ids.is_empty() {
        return Err(ApiError::bad_request("Notification IDs are required."));
    }
    let updated = notifications.mark_read(&actor.username, &body.ids)?;
    Ok(Json(json!({ "updated": updated })))
}

async fn get_chat_history(
    actor: Actor,
    State(social): State<GuardedSocialManager>,
    Path(username): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(social.conversation(&actor.username, &username)?))
}

pub fn social_routes() -> Router<ServerState> {
    Router::new()
        .route("/ratings", post(rate_user))
        .route("/users/{username}/ratings", get(get_rating_summary))
        .route("/users/{username}/follow", post(follow_user))
        .route("/users/{username}/unfollow", post(unfollow_user))
        .route("/users/{username}/followers", get(get_followers))
        .route("/agencies/{agency_id}/requests", post(request_agency_join))
        .route("/notifications", get(get_notifications))
        .route("/notifications/unread-count", get(get_unread_count))
        .route("/notifications/mark-read", post(mark_notifications_read))
        .route("/chat/history/{username}", get(get_chat_history))
}
