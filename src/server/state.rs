use axum::extract::FromRef;
use std::sync::Arc;
use std::time::Instant;

use crate::event_log::EventLogService;
use crate::jobs::JobManager;
use crate::notifications::NotificationService;
use crate::realtime::ConnectionRegistry;
use crate::side_documents::SideDocuments;
use crate::social::SocialManager;
use crate::store::FullStore;

use super::ServerConfig;

pub type GuardedStore = Arc<dyn FullStore>;
pub type GuardedConnectionRegistry = Arc<ConnectionRegistry>;
pub type GuardedJobManager = Arc<JobManager>;
pub type GuardedSocialManager = Arc<SocialManager>;
pub type GuardedNotificationService = Arc<NotificationService>;
pub type GuardedEventLogService = Arc<EventLogService>;
pub type GuardedSideDocuments = Arc<SideDocuments>;

#[derive(Clone)]
pub struct ServerState {
    pub config: ServerConfig,
    pub start_time: Instant,
    pub hash: String,
    pub store: GuardedStore,
    pub registry: GuardedConnectionRegistry,
    pub jobs: GuardedJobManager,
    pub social: GuardedSocialManager,
    pub notifications: GuardedNotificationService,
    pub event_log: GuardedEventLogService,
    pub side_documents: GuardedSideDocuments,
}

impl FromRef<ServerState> for ServerConfig {
    fn from_ref(input: &ServerState) -> Self {
        input.config.clone()
    }
}

impl FromRef<ServerState> for GuardedStore {
    fn from_ref(input: &ServerState) -> Self {
        input.store.clone()
    }
}

impl FromRef<ServerState> for GuardedConnectionRegistry {
    fn from_ref(input: &ServerState) -> Self {
        input.registry.clone()
    }
}

impl FromRef<ServerState> for GuardedJobManager {
    fn from_ref(input: &ServerState) -> Self {
        input.jobs.clone()
    }
}

impl FromRef<ServerState> for GuardedSocialManager {
    fn from_ref(input: &ServerState) -> Self {
        input.social.clone()
    }
}

impl FromRef<ServerState> for GuardedNotificationService {
    fn from_ref(input: &ServerState) -> Self {
        input.notifications.clone()
    }
}

impl FromRef<ServerState> for GuardedEventLogService {
    fn from_ref(input: &ServerState) -> Self {
        input.event_log.clone()
    }
}

impl FromRef<ServerState> for GuardedSideDocuments {
    fn from_ref(input: &ServerState) -> Self {
        input.side_documents.clone()
    }
}
