use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{info, level_filters::LevelFilter, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use jobboard_server::classifier::{
    Classifier, LlmCategoryClassifier, OpenAIProvider, UnconfiguredClassifier,
};
use jobboard_server::config::{AppConfig, ClassifierSettings, CliConfig, FileConfig};
use jobboard_server::server::metrics;
use jobboard_server::{run_server, RequestsLoggingLevel, ServerConfig, SqliteStore};

fn parse_path(s: &str) -> Result<PathBuf> {
    let path_buf = PathBuf::from(s);
    let original_path = match path_buf.canonicalize() {
        Ok(path) => path,
        Err(msg) => {
            if msg.kind() == std::io::ErrorKind::NotFound {
                path_buf
            } else {
                return Err(msg).with_context(|| format!("Error resolving path: {}", s));
            }
        }
    };
    if original_path.is_absolute() {
        return Ok(original_path);
    }
    let cwd = std::env::current_dir()?;
    Ok(cwd.join(original_path))
}

#[derive(Parser, Debug)]
struct CliArgs {
    /// Path to a TOML config file. Its values override the flags below.
    #[clap(long, value_parser = parse_path)]
    pub config: Option<PathBuf>,

    /// Directory holding jobboard.db.
    #[clap(long, value_parser = parse_path)]
    pub db_dir: Option<PathBuf>,

    /// Directory for the settings and about documents. Defaults to --db-dir.
    #[clap(long, value_parser = parse_path)]
    pub data_dir: Option<PathBuf>,

    /// The port to listen on.
    #[clap(short, long, default_value_t = 3001)]
    pub port: u16,

    /// The port for the metrics server (Prometheus scraping).
    #[clap(long, default_value_t = 9091)]
    pub metrics_port: u16,

    /// The level of logging to perform on each request.
    #[clap(long, default_value = "path")]
    pub logging_level: RequestsLoggingLevel,

    /// Path to the frontend directory to be statically served.
    #[clap(long)]
    pub frontend_dir_path: Option<String>,

    /// Base URL of the OpenAI-compatible classifier endpoint.
    #[clap(long)]
    pub classifier_url: Option<String>,

    /// Model name passed to the classifier endpoint.
    #[clap(long)]
    pub classifier_model: Option<String>,

    #[clap(long, env = "JOBBOARD_CLASSIFIER_API_KEY", hide_env_values = true)]
    pub classifier_api_key: Option<String>,

    /// Give up on a classifier call after this many seconds. Unset waits forever.
    #[clap(long)]
    pub classifier_timeout_secs: Option<u64>,
}

impl CliArgs {
    fn to_cli_config(&self) -> CliConfig {
        CliConfig {
            db_dir: self.db_dir.clone(),
            data_dir: self.data_dir.clone(),
            port: self.port,
            metrics_port: self.metrics_port,
            logging_level: self.logging_level.clone(),
            frontend_dir_path: self.frontend_dir_path.clone(),
            classifier_url: self.classifier_url.clone(),
            classifier_model: self.classifier_model.clone(),
            classifier_api_key: self.classifier_api_key.clone(),
            classifier_timeout_secs: self.classifier_timeout_secs,
        }
    }
}

async fn make_classifier(settings: Option<&ClassifierSettings>) -> Arc<dyn Classifier> {
    match settings {
        Some(settings) => {
            info!(
                "Classifier configured at {} (model {})",
                settings.base_url, settings.model
            );
            let provider = OpenAIProvider::new(
                settings.base_url.clone(),
                settings.model.clone(),
                settings.api_key.clone(),
            );
            let classifier = LlmCategoryClassifier::new(Arc::new(provider), settings.options.clone());
            if let Err(e) = classifier.check_health().await {
                warn!(
                    "Classifier at {} failed its health check, categorization may fail: {}",
                    settings.base_url, e
                );
            }
            Arc::new(classifier)
        }
        None => {
            warn!("No classifier configured, new jobs will stay uncategorized");
            Arc::new(UnconfiguredClassifier)
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli_args = CliArgs::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .with_env_var("LOG_LEVEL")
                .from_env_lossy(),
        )
        .try_init()
        .context("Failed to initialize logging")?;

    let file_config = match &cli_args.config {
        Some(path) => {
            info!("Loading config from {:?}", path);
            Some(FileConfig::load(path)?)
        }
        None => None,
    };
    let app_config = AppConfig::resolve(&cli_args.to_cli_config(), file_config)?;

    info!("Opening database at {:?}", app_config.db_path());
    let store = Arc::new(SqliteStore::new(app_config.db_path())?);
    let classifier = make_classifier(app_config.classifier.as_ref()).await;

    metrics::init_metrics();

    let server_config = ServerConfig {
        requests_logging_level: app_config.logging_level.clone(),
        port: app_config.port,
        metrics_port: app_config.metrics_port,
        frontend_dir_path: app_config.frontend_dir_path.clone(),
        data_dir: app_config.data_dir.clone(),
    };

    let shutdown = CancellationToken::new();
    let server = run_server(server_config, store, classifier, shutdown.clone());
    tokio::pin!(server);

    tokio::select! {
        result = &mut server => result,
        _ = tokio::signal::ctrl_c() => {
            info!("Shutdown requested, draining connections...");
            shutdown.cancel();
            server.await
        }
    }
}
