//! JSON snapshots of the in-memory store.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use finaizen_core::transaction::{HistoryEntry, ScheduledTransaction};
use finaizen_shared::AppError;

use crate::repositories::InMemoryStore;

/// Current snapshot format version.
pub const SNAPSHOT_VERSION: u32 = 1;

/// Snapshot I/O errors.
#[derive(Debug, Error)]
pub enum SnapshotError {
    /// Reading or writing the file failed.
    #[error("snapshot I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The file is not a valid snapshot.
    #[error("snapshot JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The file was written by an unknown format version.
    #[error("unsupported snapshot version {0} (expected {SNAPSHOT_VERSION})")]
    UnsupportedVersion(u32),
}

impl From<SnapshotError> for AppError {
    fn from(err: SnapshotError) -> Self {
        Self::Storage(err.to_string())
    }
}

/// Serializable copy of every schedule and history record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Format version.
    pub version: u32,
    /// Scheduled transactions.
    pub schedules: Vec<ScheduledTransaction>,
    /// History records.
    pub history: Vec<HistoryEntry>,
}

impl Default for Snapshot {
    fn default() -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            schedules: Vec::new(),
            history: Vec::new(),
        }
    }
}

impl Snapshot {
    /// Copies the current contents of `store`.
    #[must_use]
    pub fn capture(store: &InMemoryStore) -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            schedules: store.all_schedules(),
            history: store.all_history(),
        }
    }

    /// Builds a store holding this snapshot's records.
    #[must_use]
    pub fn into_store(self) -> InMemoryStore {
        InMemoryStore::from_parts(self.schedules, self.history)
    }

    /// Reads a snapshot from `path`. A missing file yields an empty snapshot.
    ///
    /// # Errors
    ///
    /// Returns `SnapshotError` if the file cannot be read or parsed.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, SnapshotError> {
        let path = path.as_ref();
        let bytes = match tokio::fs::read(path).await {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                info!(path = %path.display(), "No snapshot found, starting empty");
                return Ok(Self::default());
            }
            Err(err) => return Err(err.into()),
        };

        let snapshot: Self = serde_json::from_slice(&bytes)?;
        if snapshot.version != SNAPSHOT_VERSION {
            return Err(SnapshotError::UnsupportedVersion(snapshot.version));
        }
        debug!(
            path = %path.display(),
            schedules = snapshot.schedules.len(),
            history = snapshot.history.len(),
            "Loaded snapshot"
        );
        Ok(snapshot)
    }

    /// Writes the snapshot to `path`, replacing any previous file.
    ///
    /// The data goes to a sibling temporary file first and is renamed into
    /// place, so readers never see a partial snapshot.
    ///
    /// # Errors
    ///
    /// Returns `SnapshotError` if the file cannot be written.
    pub async fn save(&self, path: impl AsRef<Path>) -> Result<(), SnapshotError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }

        let json = serde_json::to_vec_pretty(self)?;
        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, json).await?;
        tokio::fs::rename(&tmp, path).await?;

        debug!(
            path = %path.display(),
            schedules = self.schedules.len(),
            history = self.history.len(),
            "Saved snapshot"
        );
        Ok(())
    }
}
