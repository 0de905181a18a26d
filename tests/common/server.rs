//! Test server lifecycle management
//!
//! Each test gets an isolated server with its own database, data directory and
//! a scripted classifier backend.

use super::constants::*;
use async_trait::async_trait;
use jobboard_server::classifier::{
    CompletionOptions, CompletionProvider, CompletionResponse, LlmCategoryClassifier, LlmError,
    Message, MessageRole,
};
use jobboard_server::server::{make_app, RequestsLoggingLevel, ServerConfig, ServerState};
use jobboard_server::store::{FullStore, Job, SqliteStore};
use std::collections::VecDeque;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::TempDir;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

/// Completion backend that replays queued answers in order.
///
/// An empty queue behaves like an unreachable backend.
#[derive(Default)]
pub struct ScriptedProvider {
    answers: Mutex<VecDeque<Result<String, LlmError>>>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedProvider {
    pub fn push_answer(&self, answer: &str) {
        self.answers
            .lock()
            .unwrap()
            .push_back(Ok(answer.to_string()));
    }

    pub fn push_failure(&self) {
        self.answers
            .lock()
            .unwrap()
            .push_back(Err(LlmError::Connection("scripted failure".to_string())));
    }

    /// User prompts received so far.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl CompletionProvider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted"
    }

    fn model(&self) -> &str {
        "scripted"
    }

    async fn complete(
        &self,
        messages: &[Message],
        _options: &CompletionOptions,
    ) -> Result<CompletionResponse, LlmError> {
        if let Some(prompt) = messages.iter().find(|m| m.role == MessageRole::User) {
            self.prompts.lock().unwrap().push(prompt.content.clone());
        }
        let next = self.answers.lock().unwrap().pop_front();
        match next {
            Some(Ok(content)) => Ok(CompletionResponse {
                message: Message::assistant(content),
                finish_reason: Some("stop".to_string()),
                usage: None,
            }),
            Some(Err(e)) => Err(e),
            None => Err(LlmError::Connection("no scripted answer left".to_string())),
        }
    }

    async fn health_check(&self) -> Result<(), LlmError> {
        Ok(())
    }
}

/// Test server instance with an isolated database
///
/// When dropped, the server shuts down and temp resources are cleaned up.
pub struct TestServer {
    /// Base URL for making requests (e.g., "http://127.0.0.1:12345")
    pub base_url: String,

    /// The port the server is listening on
    pub port: u16,

    /// Store for direct database access in tests
    pub store: Arc<dyn FullStore>,

    /// Classifier backend; queue answers before creating jobs
    pub classifier: Arc<ScriptedProvider>,

    /// Where settings.json and about.json are written
    pub data_dir: std::path::PathBuf,

    // Private fields - keep resources alive until drop
    _temp_dir: TempDir,
    shutdown: CancellationToken,
}

impl TestServer {
    /// Spawns a new test server on a random port and waits for it to be ready.
    pub async fn spawn() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let store: Arc<dyn FullStore> = Arc::new(
            SqliteStore::new(temp_dir.path().join("jobboard.db"))
                .expect("Failed to open store"),
        );
        let data_dir = temp_dir.path().join("data");

        let provider = Arc::new(ScriptedProvider::default());
        let classifier = Arc::new(LlmCategoryClassifier::new(
            provider.clone(),
            CompletionOptions::default(),
        ));

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind to random port");
        let port = listener
            .local_addr()
            .expect("Failed to get local address")
            .port();
        let base_url = format!("http://127.0.0.1:{}", port);

        let config = ServerConfig {
            port,
            requests_logging_level: RequestsLoggingLevel::None,
            data_dir: data_dir.clone(),
            ..Default::default()
        };

        let shutdown = CancellationToken::new();
        let state = ServerState::new(config, store.clone(), classifier, shutdown.clone());
        let app = make_app(state);

        let server_shutdown = shutdown.clone();
        tokio::spawn(async move {
            axum::serve(
                listener,
                app.into_make_service_with_connect_info::<SocketAddr>(),
            )
            .with_graceful_shutdown(server_shutdown.cancelled_owned())
            .await
            .expect("Server failed");
        });

        let server = Self {
            base_url,
            port,
            store,
            classifier: provider,
            data_dir,
            _temp_dir: temp_dir,
            shutdown,
        };

        server.wait_for_ready().await;

        server
    }

    /// Polls the store until the job leaves the placeholder category.
    pub async fn wait_for_category(&self, job_id: &str) -> Job {
        let start = std::time::Instant::now();
        loop {
            let job = self
                .store
                .get_job(job_id)
                .expect("Failed to read job")
                .expect("Job not found");
            if job.category != UNCATEGORIZED {
                return job;
            }
            if start.elapsed() > Duration::from_millis(CATEGORIZATION_TIMEOUT_MS) {
                panic!("Job {} was not categorized in time", job_id);
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
    }

    async fn wait_for_ready(&self) {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(100))
            .build()
            .expect("Failed to build reqwest client");

        let start = std::time::Instant::now();
        let timeout = Duration::from_millis(SERVER_READY_TIMEOUT_MS);

        loop {
            if start.elapsed() > timeout {
                panic!(
                    "Server did not become ready within {}ms",
                    SERVER_READY_TIMEOUT_MS
                );
            }

            match client.get(format!("{}/", self.base_url)).send().await {
                Ok(response) if response.status().is_success() => return,
                _ => {
                    tokio::time::sleep(Duration::from_millis(SERVER_READY_POLL_INTERVAL_MS)).await;
                }
            }
        }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}
