//! Snapshot persistence for one timer key
//!
//! Every failure is logged and absorbed: reads degrade to "nothing
//! persisted" and writes are skipped.

use std::sync::Arc;

use tracing::{debug, warn};

use super::KeyValueStore;
use crate::state::TimerSnapshot;

/// Reads and writes a single [`TimerSnapshot`] under a fixed key
#[derive(Clone)]
pub struct SnapshotStore {
    key: String,
    backend: Arc<dyn KeyValueStore>,
}

impl SnapshotStore {
    pub fn new(key: impl Into<String>, backend: Arc<dyn KeyValueStore>) -> Self {
        Self {
            key: key.into(),
            backend,
        }
    }

    /// Load the snapshot, if one was written and still decodes
    pub fn get(&self) -> Option<TimerSnapshot> {
        let raw = match self.backend.get_item(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                warn!("Failed to read timer snapshot '{}': {:#}", self.key, e);
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(snapshot) => Some(snapshot),
            Err(e) => {
                warn!("Ignoring corrupt timer snapshot '{}': {}", self.key, e);
                None
            }
        }
    }

    /// Write the snapshot
    pub fn set(&self, snapshot: &TimerSnapshot) {
        let raw = match serde_json::to_string(snapshot) {
            Ok(raw) => raw,
            Err(e) => {
                warn!("Failed to encode timer snapshot '{}': {}", self.key, e);
                return;
            }
        };

        match self.backend.set_item(&self.key, &raw) {
            Ok(()) => debug!("Persisted timer snapshot '{}'", self.key),
            Err(e) => warn!("Failed to persist timer snapshot '{}': {:#}", self.key, e),
        }
    }

    /// Delete the snapshot
    pub fn remove(&self) {
        if let Err(e) = self.backend.remove_item(&self.key) {
            warn!("Failed to remove timer snapshot '{}': {:#}", self.key, e);
        }
    }
}

impl std::fmt::Debug for SnapshotStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SnapshotStore").field("key", &self.key).finish()
    }
}
