//! Whole-document JSON file access.
//!
//! Every operation acts on the complete file. Writes go through a temp file
//! followed by a rename so readers never observe a half-written document.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::error::{AppError, Result};

/// Storage backend for the persisted documents
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Read the whole document as text
    async fn read_document(&self, path: &str) -> Result<String>;

    /// Replace the whole document
    async fn write_document(&self, path: &str, content: &str) -> Result<()>;

    /// Check whether the document currently exists
    async fn exists(&self, path: &str) -> Result<bool>;

    /// Write `default_content` only if the document does not exist yet
    async fn ensure_exists(&self, path: &str, default_content: &str) -> Result<()> {
        if self.exists(path).await? {
            return Ok(());
        }
        info!("Creating missing document '{}' with default content", path);
        self.write_document(path, default_content).await
    }
}

/// Documents stored as files under a base directory
pub struct FsDocumentStore {
    base_dir: PathBuf,
}

impl FsDocumentStore {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    fn resolve(&self, path: &str) -> PathBuf {
        self.base_dir.join(path)
    }
}

#[async_trait]
impl DocumentStore for FsDocumentStore {
    async fn read_document(&self, path: &str) -> Result<String> {
        let full_path = self.resolve(path);
        match tokio::fs::read_to_string(&full_path).await {
            Ok(content) => Ok(content),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(AppError::DocumentNotFound {
                path: full_path.display().to_string(),
            }),
            Err(e) => Err(AppError::DocumentRead {
                path: full_path.display().to_string(),
                source: e,
            }),
        }
    }

    async fn write_document(&self, path: &str, content: &str) -> Result<()> {
        let full_path = self.resolve(path);
        let write_err = |e: std::io::Error| AppError::DocumentWrite {
            path: full_path.display().to_string(),
            source: e,
        };

        if let Some(parent) = full_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await.map_err(write_err)?;
        }

        // Write to temp file first, then rename for atomicity
        let temp_path = temp_path_for(&full_path);
        tokio::fs::write(&temp_path, content)
            .await
            .map_err(write_err)?;
        tokio::fs::rename(&temp_path, &full_path)
            .await
            .map_err(write_err)?;

        debug!("Wrote {} bytes to {}", content.len(), full_path.display());
        Ok(())
    }

    async fn exists(&self, path: &str) -> Result<bool> {
        let full_path = self.resolve(path);
        tokio::fs::try_exists(&full_path)
            .await
            .map_err(|e| AppError::DocumentRead {
                path: full_path.display().to_string(),
                source: e,
            })
    }
}

fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".tmp");
    PathBuf::from(name)
}
