//! Shared key-value store.
//!
//! Values are whole JSON documents: a `set` replaces the value of each key
//! it names and there is no partial update or transaction across calls.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde_json::{Map, Value};
use tokio::fs;
use tokio::sync::{Mutex, RwLock};
use tracing::debug;

use crate::error::QueueError;

/// Key-value store trait for persistence.
#[async_trait]
pub trait KvStore: Send + Sync {
    /// Read the given keys. Absent keys are omitted from the result.
    async fn get(&self, keys: &[&str]) -> Result<HashMap<String, Value>, QueueError>;

    /// Write every entry in one round-trip.
    async fn set(&self, entries: HashMap<String, Value>) -> Result<(), QueueError>;

    /// Delete the given keys. Missing keys are ignored.
    async fn remove(&self, keys: &[&str]) -> Result<(), QueueError>;
}

/// In-memory store for testing.
pub struct MemoryKvStore {
    values: RwLock<HashMap<String, Value>>,
}

impl MemoryKvStore {
    /// Create a new memory store.
    pub fn new() -> Self {
        Self {
            values: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for MemoryKvStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl KvStore for MemoryKvStore {
    async fn get(&self, keys: &[&str]) -> Result<HashMap<String, Value>, QueueError> {
        let values = self.values.read().await;
        Ok(keys
            .iter()
            .filter_map(|k| values.get(*k).map(|v| (k.to_string(), v.clone())))
            .collect())
    }

    async fn set(&self, entries: HashMap<String, Value>) -> Result<(), QueueError> {
        let mut values = self.values.write().await;
        values.extend(entries);
        Ok(())
    }

    async fn remove(&self, keys: &[&str]) -> Result<(), QueueError> {
        let mut values = self.values.write().await;
        for key in keys {
            values.remove(*key);
        }
        Ok(())
    }
}

/// Store backed by a single JSON object file.
///
/// Every write reads the whole document, applies the change and replaces
/// the file through a temporary sibling plus rename. A missing file reads
/// as an empty store.
pub struct FileKvStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileKvStore {
    /// Create a store at `path`, creating parent directories.
    pub async fn new(path: impl Into<PathBuf>) -> Result<Self, QueueError> {
        let path = path.into();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await.map_err(|e| {
                QueueError::Storage(format!("Failed to create {}: {}", parent.display(), e))
            })?;
        }

        debug!("FileKvStore initialized at {:?}", path);

        Ok(Self {
            path,
            write_lock: Mutex::new(()),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_document(&self) -> Result<Map<String, Value>, QueueError> {
        let content = match fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Map::new()),
            Err(e) => {
                return Err(QueueError::Storage(format!(
                    "Failed to read {}: {}",
                    self.path.display(),
                    e
                )));
            }
        };

        if content.trim().is_empty() {
            return Ok(Map::new());
        }

        match serde_json::from_str::<Value>(&content) {
            Ok(Value::Object(map)) => Ok(map),
            Ok(_) => Err(QueueError::Storage(format!(
                "{} does not hold a JSON object",
                self.path.display()
            ))),
            Err(e) => Err(QueueError::Storage(format!(
                "Corrupt store {}: {}",
                self.path.display(),
                e
            ))),
        }
    }

    async fn write_document(&self, document: &Map<String, Value>) -> Result<(), QueueError> {
        let content = serde_json::to_string_pretty(document)?;
        let tmp = self.path.with_extension("json.tmp");

        fs::write(&tmp, content).await.map_err(|e| {
            QueueError::Storage(format!("Failed to write {}: {}", tmp.display(), e))
        })?;
        fs::rename(&tmp, &self.path).await.map_err(|e| {
            QueueError::Storage(format!("Failed to replace {}: {}", self.path.display(), e))
        })?;

        Ok(())
    }
}

#[async_trait]
impl KvStore for FileKvStore {
    async fn get(&self, keys: &[&str]) -> Result<HashMap<String, Value>, QueueError> {
        let document = self.read_document().await?;
        Ok(keys
            .iter()
            .filter_map(|k| document.get(*k).map(|v| (k.to_string(), v.clone())))
            .collect())
    }

    async fn set(&self, entries: HashMap<String, Value>) -> Result<(), QueueError> {
        let _guard = self.write_lock.lock().await;
        let mut document = self.read_document().await?;
        let count = entries.len();
        document.extend(entries);
        self.write_document(&document).await?;
        debug!("Wrote {} key(s) to {:?}", count, self.path);
        Ok(())
    }

    async fn remove(&self, keys: &[&str]) -> Result<(), QueueError> {
        let _guard = self.write_lock.lock().await;
        let mut document = self.read_document().await?;
        let before = document.len();
        for key in keys {
            document.remove(*key);
        }
        if document.len() != before {
            self.write_document(&document).await?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
