use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::json;
use thiserror::Error;
use tracing::debug;

use crate::actor::Actor;
use crate::event_log::EventLogService;
use crate::jobs::JobStatus;
use crate::notifications::NotificationService;
use crate::realtime::content::{self, ContentKind};
use crate::realtime::messages::chat::DeliveredChat;
use crate::realtime::{msg_types, ConnectionRegistry, ServerMessage};
use crate::store::{
    AgencyRequest, ChatMessage, EventType, Follow, FullStore, NewEventLog, Rating, RatingSummary,
    StoreError,
};

pub const MAX_COMMENT_LEN: usize = 500;

const PEOPLE_LINK: &str = "#people-page";
const RATING_LINK: &str = "#dashboard-page";

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewRating {
    pub job_id: String,
    pub rated: String,
    pub rating: u8,
    pub comment: Option<String>,
}

/// Payload of `follow_updated`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FollowUpdate {
    pub user: String,
    pub follower: String,
    pub is_following: bool,
}

#[derive(Debug, Error)]
pub enum SocialError {
    #[error("{0}")]
    Validation(String),

    #[error("You cannot follow yourself.")]
    SelfFollow,

    #[error("You are already following this user.")]
    AlreadyFollowing,

    #[error("You are not following this user.")]
    NotFollowing,

    #[error("Job not found.")]
    JobNotFound,

    #[error("{0}")]
    Forbidden(&'static str),

    #[error("You have already rated this user for this job.")]
    AlreadyRated,

    #[error("You have already sent a request to this agency.")]
    AlreadyRequested,

    #[error(transparent)]
    Store(StoreError),
}

impl From<StoreError> for SocialError {
    fn from(err: StoreError) -> Self {
        SocialError::Store(err)
    }
}

/// Maps a uniqueness violation to `duplicate`, anything else to a store error.
fn on_duplicate(err: StoreError, duplicate: SocialError) -> SocialError {
    if err.is_duplicate() {
        duplicate
    } else {
        SocialError::Store(err)
    }
}

pub struct SocialManager {
    store: Arc<dyn FullStore>,
    event_log: Arc<EventLogService>,
    notifications: Arc<NotificationService>,
    registry: Arc<ConnectionRegistry>,
}

impl SocialManager {
    pub fn new(
        store: Arc<dyn FullStore>,
        event_log: Arc<EventLogService>,
        notifications: Arc<NotificationService>,
        registry: Arc<ConnectionRegistry>,
    ) -> Self {
        Self {
            store,
            event_log,
            notifications,
            registry,
        }
    }

    async fn log_user_event(&self, actor: &Actor, event_type: EventType, target_user: &str) {
        self.event_log
            .record(
                NewEventLog::new(event_type, actor.username.as_str())
                    .details(json!({ "username": target_user }))
                    .target(target_user, "User")
                    .context(actor.context.clone()),
            )
            .await;
    }

    async fn broadcast_follow(&self, user: &str, follower: &str, is_following: bool) {
        let update = FollowUpdate {
            user: user.to_string(),
            follower: follower.to_string(),
            is_following,
        };
        self.registry
            .broadcast(ServerMessage::new(msg_types::FOLLOW_UPDATED, &update))
            .await;
    }

    pub async fn follow(&self, follower: &Actor, username: &str) -> Result<Follow, SocialError> {
        if follower.is(username) {
            return Err(SocialError::SelfFollow);
        }
        let follow = self
            .store
            .insert_follow(username, &follower.username)
            .map_err(|e| on_duplicate(e, SocialError::AlreadyFollowing))?;

        self.log_user_event(follower, EventType::UserFollowed, username)
            .await;
        self.notifications
            .notify(
                username,
                &format!("{} started following you.", follower.username),
                Some(PEOPLE_LINK),
            )
            .await;
        self.broadcast_follow(username, &follower.username, true)
            .await;
        Ok(follow)
    }

    pub async fn unfollow(&self, follower: &Actor, username: &str) -> Result<(), SocialError> {
        if !self.store.delete_follow(username, &follower.username)? {
            return Err(SocialError::NotFollowing);
        }
        self.log_user_event(follower, EventType::UserUnfollowed, username)
            .await;
        self.broadcast_follow(username, &follower.username, false)
            .await;
        Ok(())
    }

    pub fn followers(&self, username: &str) -> Result<Vec<String>, SocialError> {
        Ok(self.store.list_followers(username)?)
    }

    /// The poster of a closed job rates the worker who did it, once.
    pub async fn rate(&self, rater: &Actor, rating: NewRating) -> Result<Rating, SocialError> {
        if !(1..=5).contains(&rating.rating) {
            return Err(SocialError::Validation(
                "Rating must be between 1 and 5.".to_string(),
            ));
        }
        let comment = rating
            .comment
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty());
        if comment.is_some_and(|c| c.chars().count() > MAX_COMMENT_LEN) {
            return Err(SocialError::Validation(format!(
                "Comment cannot be longer than {} characters.",
                MAX_COMMENT_LEN
            )));
        }

        let job = self
            .store
            .get_job(&rating.job_id)?
            .ok_or(SocialError::JobNotFound)?;
        if !rater.is(&job.posted_by) {
            return Err(SocialError::Forbidden(
                "Only the job poster can rate the assigned worker.",
            ));
        }
        if job.assigned_to.as_deref() != Some(rating.rated.as_str()) {
            return Err(SocialError::Validation(
                "This user was not assigned to the job.".to_string(),
            ));
        }
        if job.status != JobStatus::Closed {
            return Err(SocialError::Validation(
                "You can only rate users for completed jobs.".to_string(),
            ));
        }

        let saved = self
            .store
            .insert_rating(
                &job.job_id,
                &rating.rated,
                &rater.username,
                rating.rating,
                comment,
            )
            .map_err(|e| on_duplicate(e, SocialError::AlreadyRated))?;

        self.event_log
            .record(
                NewEventLog::new(EventType::UserRated, rater.username.as_str())
                    .details(json!({
                        "rated": saved.rated,
                        "rating": saved.rating,
                        "jobTitle": job.title,
                    }))
                    .target(saved.rated.as_str(), "User")
                    .context(rater.context.clone()),
            )
            .await;
        self.notifications
            .notify(
                &saved.rated,
                &format!(
                    "{} gave you a {}-star rating for the job: \"{}\"!",
                    rater.username, saved.rating, job.title
                ),
                Some(RATING_LINK),
            )
            .await;
        Ok(saved)
    }

    pub fn rating_summary(&self, username: &str) -> Result<RatingSummary, SocialError> {
        Ok(self.store.rating_summary(username)?)
    }

    pub async fn request_agency_join(
        &self,
        actor: &Actor,
        agency_id: &str,
    ) -> Result<AgencyRequest, SocialError> {
        let agency_id = agency_id.trim();
        if agency_id.is_empty() {
            return Err(SocialError::Validation("Agency id is required.".to_string()));
        }
        let request = self
            .store
            .insert_agency_request(agency_id, &actor.username)
            .map_err(|e| on_duplicate(e, SocialError::AlreadyRequested))?;

        self.event_log
            .record(
                NewEventLog::new(EventType::AgencyJoinRequestSent, actor.username.as_str())
                    .details(json!({ "agencyId": agency_id }))
                    .target(agency_id, "Agency")
                    .context(actor.context.clone()),
            )
            .await;
        self.registry
            .broadcast(content::created(ContentKind::AgencyRequests, &request))
            .await;
        Ok(request)
    }

    /// Persists a direct message and pushes it to the recipient if connected.
    pub async fn send_chat(
        &self,
        sender: &str,
        recipient: &str,
        text: &str,
    ) -> Result<DeliveredChat, SocialError> {
        let recipient = recipient.trim();
        if recipient.is_empty() || text.trim().is_empty() {
            return Err(SocialError::Validation(
                "A chat message needs a recipient and some content.".to_string(),
            ));
        }
        let saved = self.store.insert_chat_message(sender, recipient, text)?;
        let delivered = DeliveredChat {
            sender: saved.sender,
            recipient: saved.recipient,
            content: saved.content,
            timestamp: saved.timestamp,
        };

        if let Err(reason) = self
            .registry
            .send(recipient, ServerMessage::new(msg_types::CHAT, &delivered))
            .await
        {
            debug!("Chat from {} to {} not delivered live: {:?}", sender, recipient, reason);
        }
        Ok(delivered)
    }

    pub fn conversation(&self, a: &str, b: &str) -> Result<Vec<ChatMessage>, SocialError> {
        Ok(self.store.conversation(a, b)?)
    }
}
