mod file_config;

pub use file_config::{ClassifierConfig, FileConfig};

use crate::classifier::{ApiKeySource, CompletionOptions};
use crate::server::RequestsLoggingLevel;
use anyhow::{bail, Result};
use clap::ValueEnum;
use std::path::PathBuf;
use std::time::Duration;

/// CLI arguments that can be used for config resolution.
/// This struct mirrors the CLI arguments that can be overridden by TOML config.
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    pub db_dir: Option<PathBuf>,
    pub data_dir: Option<PathBuf>,
    pub port: u16,
    pub metrics_port: u16,
    pub logging_level: RequestsLoggingLevel,
    pub frontend_dir_path: Option<String>,
    pub classifier_url: Option<String>,
    pub classifier_model: Option<String>,
    pub classifier_api_key: Option<String>,
    pub classifier_timeout_secs: Option<u64>,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub db_dir: PathBuf,
    pub data_dir: PathBuf,
    pub port: u16,
    pub metrics_port: u16,
    pub logging_level: RequestsLoggingLevel,
    pub frontend_dir_path: Option<String>,

    /// `None` when no classifier endpoint is configured.
    pub classifier: Option<ClassifierSettings>,
}

#[derive(Debug, Clone)]
pub struct ClassifierSettings {
    pub base_url: String,
    pub model: String,
    pub api_key: ApiKeySource,
    pub options: CompletionOptions,
}

impl AppConfig {
    /// Resolve configuration from CLI arguments and optional TOML file config.
    /// TOML values override CLI values where present.
    pub fn resolve(cli: &CliConfig, file_config: Option<FileConfig>) -> Result<Self> {
        let file = file_config.unwrap_or_default();

        let db_dir = file
            .db_dir
            .map(PathBuf::from)
            .or_else(|| cli.db_dir.clone())
            .ok_or_else(|| {
                anyhow::anyhow!("db_dir must be specified via --db-dir or in config file")
            })?;

        if !db_dir.exists() {
            bail!("Database directory does not exist: {:?}", db_dir);
        }
        if !db_dir.is_dir() {
            bail!("db_dir is not a directory: {:?}", db_dir);
        }

        let data_dir = file
            .data_dir
            .map(PathBuf::from)
            .or_else(|| cli.data_dir.clone())
            .unwrap_or_else(|| db_dir.clone());

        let port = file.port.unwrap_or(cli.port);
        let metrics_port = file.metrics_port.unwrap_or(cli.metrics_port);
        if port == metrics_port {
            bail!("port and metrics_port must differ (both are {})", port);
        }

        let logging_level = file
            .logging_level
            .and_then(|s| parse_logging_level(&s))
            .unwrap_or_else(|| cli.logging_level.clone());

        let frontend_dir_path = file
            .frontend_dir_path
            .or_else(|| cli.frontend_dir_path.clone());

        let classifier = resolve_classifier(cli, file.classifier.unwrap_or_default())?;

        Ok(Self {
            db_dir,
            data_dir,
            port,
            metrics_port,
            logging_level,
            frontend_dir_path,
            classifier,
        })
    }

    pub fn db_path(&self) -> PathBuf {
        self.db_dir.join("jobboard.db")
    }
}

fn resolve_classifier(
    cli: &CliConfig,
    file: ClassifierConfig,
) -> Result<Option<ClassifierSettings>> {
    let Some(base_url) = file.base_url.or_else(|| cli.classifier_url.clone()) else {
        return Ok(None);
    };
    let Some(model) = file.model.or_else(|| cli.classifier_model.clone()) else {
        bail!("classifier model must be set when a classifier base_url is configured");
    };

    let api_key = match (file.api_key_command, file.api_key) {
        (Some(command), _) => ApiKeySource::Command(command),
        (None, Some(key)) => ApiKeySource::Static(key),
        (None, None) => match &cli.classifier_api_key {
            Some(key) => ApiKeySource::Static(key.clone()),
            None => ApiKeySource::None,
        },
    };

    let defaults = CompletionOptions::default();
    let temperature = file.temperature.unwrap_or(defaults.temperature);
    if !(0.0..=2.0).contains(&temperature) {
        bail!("classifier temperature must be within 0.0..=2.0, got {}", temperature);
    }
    let options = CompletionOptions {
        temperature,
        timeout: file
            .timeout_secs
            .or(cli.classifier_timeout_secs)
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs),
        ..defaults
    };

    Ok(Some(ClassifierSettings {
        base_url,
        model,
        api_key,
        options,
    }))
}

/// Parses a logging level string into RequestsLoggingLevel.
/// Uses clap's ValueEnum trait for parsing.
fn parse_logging_level(s: &str) -> Option<RequestsLoggingLevel> {
    RequestsLoggingLevel::from_str(s, true).ok()
}
