//! In-memory document store for tests, with write-failure injection.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};

use super::documents::DocumentStore;
use crate::error::{AppError, Result};

#[derive(Default)]
pub struct MemoryDocumentStore {
    documents: Mutex<HashMap<String, String>>,
    failing_writes: Mutex<HashSet<String>>,
    write_count: Mutex<usize>,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_document(self, path: &str, content: &str) -> Self {
        self.documents
            .lock()
            .insert(path.to_string(), content.to_string());
        self
    }

    pub fn document(&self, path: &str) -> Option<String> {
        self.documents.lock().get(path).cloned()
    }

    /// Make every subsequent write to `path` fail
    pub fn fail_writes_to(&self, path: &str) {
        self.failing_writes.lock().insert(path.to_string());
    }

    pub fn allow_writes_to(&self, path: &str) {
        self.failing_writes.lock().remove(path);
    }

    pub fn write_count(&self) -> usize {
        *self.write_count.lock()
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn read_document(&self, path: &str) -> Result<String> {
        self.document(path)
            .ok_or_else(|| AppError::DocumentNotFound {
                path: path.to_string(),
            })
    }

    async fn write_document(&self, path: &str, content: &str) -> Result<()> {
        if self.failing_writes.lock().contains(path) {
            return Err(AppError::DocumentWrite {
                path: path.to_string(),
                source: std::io::Error::new(std::io::ErrorKind::Other, "injected write failure"),
            });
        }
        *self.write_count.lock() += 1;
        self.documents
            .lock()
            .insert(path.to_string(), content.to_string());
        Ok(())
    }

    async fn exists(&self, path: &str) -> Result<bool> {
        Ok(self.documents.lock().contains_key(path))
    }
}
