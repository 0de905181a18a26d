//! Settings and about-page documents, kept as whole JSON files next to the
//! database.

use std::path::{Path, PathBuf};

use serde_json::{Map, Value};
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::debug;

const SETTINGS_FILE: &str = "settings.json";
const ABOUT_FILE: &str = "about.json";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SideDocument {
    Settings,
    About,
}

impl SideDocument {
    fn file_name(&self) -> &'static str {
        match self {
            SideDocument::Settings => SETTINGS_FILE,
            SideDocument::About => ABOUT_FILE,
        }
    }
}

#[derive(Debug, Error)]
pub enum SideDocumentError {
    #[error("document must be a JSON object")]
    NotAnObject,

    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("{path} is not valid JSON: {source}")]
    Corrupt {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Read-modify-write access to the side documents. Writes are serialized so a
/// merge never loses a concurrent update.
pub struct SideDocuments {
    dir: PathBuf,
    write_lock: Mutex<()>,
}

impl SideDocuments {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_of(&self, doc: SideDocument) -> PathBuf {
        self.dir.join(doc.file_name())
    }

    /// A missing file reads as `{}`.
    pub async fn read(&self, doc: SideDocument) -> Result<Value, SideDocumentError> {
        let path = self.path_of(doc);
        let raw = match tokio::fs::read_to_string(&path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(Value::Object(Map::new()))
            }
            Err(source) => return Err(SideDocumentError::Io { path, source }),
        };
        if raw.trim().is_empty() {
            return Ok(Value::Object(Map::new()));
        }
        serde_json::from_str(&raw).map_err(|source| SideDocumentError::Corrupt { path, source })
    }

    async fn write(&self, doc: SideDocument, value: &Value) -> Result<(), SideDocumentError> {
        let path = self.path_of(doc);
        let body = serde_json::to_string_pretty(value).map_err(|source| {
            SideDocumentError::Corrupt {
                path: path.clone(),
                source,
            }
        })?;
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|source| SideDocumentError::Io {
                path: self.dir.clone(),
                source,
            })?;
        tokio::fs::write(&path, body)
            .await
            .map_err(|source| SideDocumentError::Io {
                path: path.clone(),
                source,
            })?;
        debug!("Wrote {}", path.display());
        Ok(())
    }

    /// Top-level keys of `patch` overwrite those in the stored settings.
    pub async fn merge_settings(&self, patch: Value) -> Result<Value, SideDocumentError> {
        let Value::Object(patch) = patch else {
            return Err(SideDocumentError::NotAnObject);
        };
        let _guard = self.write_lock.lock().await;

        let mut current = match self.read(SideDocument::Settings).await? {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        current.extend(patch);
        let merged = Value::Object(current);
        self.write(SideDocument::Settings, &merged).await?;
        Ok(merged)
    }

    pub async fn replace_about(&self, content: Value) -> Result<Value, SideDocumentError> {
        if !content.is_object() {
            return Err(SideDocumentError::NotAnObject);
        }
        let _guard = self.write_lock.lock().await;
        self.write(SideDocument::About, &content).await?;
        Ok(content)
    }
}
