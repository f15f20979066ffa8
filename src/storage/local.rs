//! Local filesystem state store.
//!
//! Persists the seen snapshot as a single JSON file. Writes are atomic
//! (temp file plus rename) so an interrupted run cannot leave a truncated
//! snapshot behind.

use std::collections::BTreeSet;
use std::path::PathBuf;

use async_trait::async_trait;
use serde_json::Value;
use tokio::io::AsyncWriteExt;

use crate::error::{AppError, Result};
use crate::storage::{SeenSnapshot, StateStore};

/// JSON-file-backed state store.
#[derive(Debug, Clone)]
pub struct JsonStateStore {
    path: PathBuf,
}

impl JsonStateStore {
    /// Create a store persisting to the given file path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The file path this store persists to.
    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    /// Read the raw state file, returning None if it doesn't exist.
    async fn read_bytes(&self) -> Result<Option<Vec<u8>>> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AppError::Io(e)),
        }
    }

    /// Write bytes atomically (write to temp, then rename).
    async fn write_bytes(&self, bytes: &[u8]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let tmp = self.path.with_extension("tmp");
        let mut file = tokio::fs::File::create(&tmp).await?;
        file.write_all(bytes).await?;
        file.flush().await?;
        drop(file);

        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}

#[async_trait]
impl StateStore for JsonStateStore {
    async fn load_seen(&self) -> Result<BTreeSet<String>> {
        let Some(bytes) = self.read_bytes().await? else {
            return Ok(BTreeSet::new());
        };

        // Malformed state is downgraded to "no prior state", not an error.
        let value: Value = match serde_json::from_slice(&bytes) {
            Ok(value) => value,
            Err(e) => {
                log::warn!(
                    "State file {:?} is not valid JSON ({}); treating as empty",
                    self.path,
                    e
                );
                return Ok(BTreeSet::new());
            }
        };

        let Some(ids) = value.get("seen_ids").and_then(Value::as_array) else {
            log::warn!(
                "State file {:?} has no seen_ids array; treating as empty",
                self.path
            );
            return Ok(BTreeSet::new());
        };

        Ok(ids
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect())
    }

    async fn save_seen(&self, ids: &BTreeSet<String>) -> Result<()> {
        let snapshot = SeenSnapshot::new(ids);
        let bytes = serde_json::to_vec_pretty(&snapshot)?;
        self.write_bytes(&bytes).await
    }
}
