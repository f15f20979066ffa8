//! State persistence for the seen-identity snapshot.
//!
//! Each run replaces the stored snapshot with the current identity set
//! (no union with prior state). A listing that disappears from the source
//! and later reappears is therefore announced again; DESIGN.md records
//! this as a deliberate decision.

pub mod local;

use std::collections::BTreeSet;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;

// Re-export for convenience
pub use local::JsonStateStore;

/// On-disk representation of the seen snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeenSnapshot {
    /// ISO 8601 timestamp of the last update
    pub updated_at: DateTime<Utc>,

    /// Identity count, kept for quick inspection
    pub count: usize,

    /// Lexicographically sorted identities
    pub seen_ids: Vec<String>,
}

impl SeenSnapshot {
    /// Build a snapshot from an identity set.
    ///
    /// `BTreeSet` iteration keeps the stored order sorted, so the persisted
    /// file stays stable and diff-friendly across runs.
    pub fn new(ids: &BTreeSet<String>) -> Self {
        Self {
            updated_at: Utc::now(),
            count: ids.len(),
            seen_ids: ids.iter().cloned().collect(),
        }
    }
}

/// Trait for seen-state storage backends.
#[async_trait]
pub trait StateStore: Send + Sync {
    /// Load the persisted seen set.
    ///
    /// Absent or malformed state is treated as an empty set, not an error.
    async fn load_seen(&self) -> Result<BTreeSet<String>>;

    /// Atomically replace the persisted seen set.
    async fn save_seen(&self, ids: &BTreeSet<String>) -> Result<()>;
}
