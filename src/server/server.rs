use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    extract::State,
    middleware,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tower_http::services::ServeDir;
use tracing::{error, info};

use super::admin_routes::admin_routes;
use super::jobs_routes::jobs_routes;
use super::metrics::metrics_handler;
use super::social_routes::social_routes;
use super::websocket::ws_handler;
use super::{log_requests, state::ServerState, ServerConfig};
use crate::categorization::{CategorizationQueue, CategorizationWorkflow};
use crate::classifier::Classifier;
use crate::event_log::EventLogService;
use crate::jobs::JobManager;
use crate::notifications::NotificationService;
use crate::realtime::ConnectionRegistry;
use crate::side_documents::SideDocuments;
use crate::social::SocialManager;
use crate::store::FullStore;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ServerStats {
    pub uptime: String,
    pub version: String,
    pub hash: String,
    pub online_users: usize,
    pub open_channels: usize,
}

fn format_uptime(duration: Duration) -> String {
    let total_seconds = duration.as_secs();

    let days = total_seconds / 86_400;
    let hours = (total_seconds % 86_400) / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    format!("{}d {:02}:{:02}:{:02}", days, hours, minutes, seconds)
}

async fn home(State(state): State<ServerState>) -> impl IntoResponse {
    let stats = ServerStats {
        uptime: format_uptime(state.start_time.elapsed()),
        version: env!("CARGO_PKG_VERSION").to_string(),
        hash: state.hash.clone(),
        online_users: state.registry.online_users().await.len(),
        open_channels: state.registry.channel_count().await,
    };
    Json(stats)
}

impl ServerState {
    /// Wires every service around `store` and starts the categorization
    /// queue. The queue stops taking work when `shutdown` is cancelled.
    pub fn new(
        config: ServerConfig,
        store: Arc<dyn FullStore>,
        classifier: Arc<dyn Classifier>,
        shutdown: CancellationToken,
    ) -> ServerState {
        let registry = Arc::new(ConnectionRegistry::new());
        let event_log = Arc::new(EventLogService::new(store.clone(), registry.clone()));
        let notifications = Arc::new(NotificationService::new(store.clone(), registry.clone()));
        let workflow = Arc::new(CategorizationWorkflow::new(
            store.clone(),
            classifier,
            event_log.clone(),
            notifications.clone(),
            registry.clone(),
        ));
        let (queue, _dispatcher) = CategorizationQueue::start(workflow.clone(), shutdown);

        let jobs = Arc::new(JobManager::new(
            store.clone(),
            event_log.clone(),
            notifications.clone(),
            registry.clone(),
            workflow,
            queue,
        ));
        let social = Arc::new(SocialManager::new(
            store.clone(),
            event_log.clone(),
            notifications.clone(),
            registry.clone(),
        ));
        let side_documents = Arc::new(SideDocuments::new(config.data_dir.clone()));

        ServerState {
            config,
            start_time: Instant::now(),
            hash: env!("GIT_HASH").to_string(),
            store,
            registry,
            jobs,
            social,
            notifications,
            event_log,
            side_documents,
        }
    }
}

pub fn make_app(state: ServerState) -> Router {
    let api_routes: Router = Router::new()
        .route("/ws", get(ws_handler))
        .merge(jobs_routes())
        .merge(social_routes())
        .nest("/admin", admin_routes())
        .with_state(state.clone());

    let home_router: Router = match &state.config.frontend_dir_path {
        Some(frontend_path) => {
            let static_files_service =
                ServeDir::new(frontend_path).append_index_html_on_directories(true);
            Router::new().fallback_service(static_files_service)
        }
        None => Router::new()
            .route("/", get(home))
            .with_state(state.clone()),
    };

    home_router
        .nest("/v1", api_routes)
        .layer(middleware::from_fn_with_state(state, log_requests))
}

fn make_metrics_app() -> Router {
    Router::new().route("/metrics", get(metrics_handler))
}

/// Serves the API and the metrics endpoint until `shutdown` is cancelled, then
/// closes every realtime channel.
pub async fn run_server(
    config: ServerConfig,
    store: Arc<dyn FullStore>,
    classifier: Arc<dyn Classifier>,
    shutdown: CancellationToken,
) -> Result<()> {
    let port = config.port;
    let metrics_port = config.metrics_port;
    let state = ServerState::new(config, store, classifier, shutdown.child_token());
    let registry = state.registry.clone();
    let app = make_app(state);

    let metrics_listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", metrics_port))
        .await
        .with_context(|| format!("Failed to bind metrics port {}", metrics_port))?;
    let metrics_shutdown = shutdown.clone();
    tokio::spawn(async move {
        let served = axum::serve(metrics_listener, make_metrics_app())
            .with_graceful_shutdown(metrics_shutdown.cancelled_owned())
            .await;
        if let Err(e) = served {
            error!("Metrics server failed: {}", e);
        }
    });

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port))
        .await
        .with_context(|| format!("Failed to bind port {}", port))?;

    info!("Ready to serve at port {}!", port);
    info!("Metrics available at port {}!", metrics_port);

    let served = axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown.clone().cancelled_owned())
    .await;

    shutdown.cancel();
    registry.shutdown().await;
    info!("Realtime channels closed");

    Ok(served?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::UnconfiguredClassifier;
    use crate::store::SqliteStore;
    use axum::{body::Body, http::Request, http::StatusCode};
    use tower::ServiceExt;

    fn test_app() -> (Router, tempfile::TempDir) {
        let dir = tempfile::TempDir::new().unwrap();
        let config = ServerConfig {
            requests_logging_level: crate::server::RequestsLoggingLevel::None,
            data_dir: dir.path().to_path_buf(),
            ..Default::default()
        };
        let state = ServerState::new(
            config,
            Arc::new(SqliteStore::in_memory().unwrap()),
            Arc::new(UnconfiguredClassifier),
            CancellationToken::new(),
        );
        (make_app(state), dir)
    }

    #[test]
    fn uptime_format() {
        assert_eq!(format_uptime(Duration::from_secs(0)), "0d 00:00:00");
        assert_eq!(
            format_uptime(Duration::from_secs(86_400 + 3600 + 61)),
            "1d 01:01:01"
        );
    }

    #[tokio::test]
    async fn api_requires_identity() {
        let (app, _dir) = test_app();

        let protected = ["/v1/jobs", "/v1/categories", "/v1/notifications"];
        for route in protected {
            let request = Request::builder().uri(route).body(Body::empty()).unwrap();
            let response = app.clone().oneshot(request).await.unwrap();
            assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{}", route);
        }
    }

    #[tokio::test]
    async fn admin_routes_require_admin_role() {
        let (app, _dir) = test_app();

        let request = Request::builder()
            .uri("/v1/admin/event-logs")
            .header("X-User", "ann")
            .body(Body::empty())
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let request = Request::builder()
            .uri("/v1/admin/event-logs")
            .header("X-User", "root")
            .header("X-Role", "admin")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn home_reports_stats() {
        let (app, _dir) = test_app();
        let request = Request::builder().uri("/").body(Body::empty()).unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
