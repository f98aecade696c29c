//! Last-case save blob
//!
//! A single fixed key holds a small JSON blob: which case was opened last and,
//! once resolved, how it ended. Persistence is best-effort. Every failure is
//! logged at `warn` and swallowed; gameplay never sees it.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::engine::Outcome;

/// Storage key of the save blob.
pub const SAVE_KEY: &str = "system_subject_save_v2";

/// Save directory used when none is configured.
pub const DEFAULT_SAVE_DIR: &str = ".casefile";

/// The persisted blob.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveBlob {
    /// Id of the last opened case
    pub last_case_id: String,

    /// Title of the last opened case
    pub last_case_title: String,

    /// Outcome of the last resolution of that case
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_outcome: Option<Outcome>,

    /// When the last resolution happened
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolved_at: Option<DateTime<Utc>>,
}

/// Persistence collaborator.
///
/// Implementations must never fail loudly.
pub trait SaveStore: Send {
    /// Reads the blob, or `None` if absent or unreadable.
    fn load(&self) -> Option<SaveBlob>;

    /// Replaces the blob.
    fn write(&self, blob: &SaveBlob);

    /// Removes the blob.
    fn clear(&self);
}

/// Save store backed by one JSON file in a directory.
#[derive(Debug, Clone)]
pub struct FileSaveStore {
    path: PathBuf,
}

impl FileSaveStore {
    /// Creates a store writing `<dir>/system_subject_save_v2.json`.
    #[must_use]
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            path: dir.as_ref().join(format!("{SAVE_KEY}.json")),
        }
    }

    /// Path of the save file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn try_write(&self, blob: &SaveBlob) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_vec_pretty(blob).map_err(std::io::Error::other)?;
        std::fs::write(&self.path, json)
    }
}

impl Default for FileSaveStore {
    fn default() -> Self {
        Self::new(DEFAULT_SAVE_DIR)
    }
}

impl SaveStore for FileSaveStore {
    fn load(&self) -> Option<SaveBlob> {
        let raw = match std::fs::read(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "failed to read save");
                return None;
            }
        };
        match serde_json::from_slice(&raw) {
            Ok(blob) => Some(blob),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "ignoring unreadable save");
                None
            }
        }
    }

    fn write(&self, blob: &SaveBlob) {
        match self.try_write(blob) {
            Ok(()) => debug!(path = %self.path.display(), "save written"),
            Err(e) => warn!(path = %self.path.display(), error = %e, "failed to write save"),
        }
    }

    fn clear(&self) {
        match std::fs::remove_file(&self.path) {
            Ok(()) => debug!(path = %self.path.display(), "save cleared"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => warn!(path = %self.path.display(), error = %e, "failed to clear save"),
        }
    }
}

/// In-memory save store.
#[derive(Debug, Default)]
pub struct MemorySaveStore {
    blob: Mutex<Option<SaveBlob>>,
}

impl SaveStore for MemorySaveStore {
    fn load(&self) -> Option<SaveBlob> {
        self.blob.lock().ok().and_then(|guard| guard.clone())
    }

    fn write(&self, blob: &SaveBlob) {
        if let Ok(mut guard) = self.blob.lock() {
            *guard = Some(blob.clone());
        }
    }

    fn clear(&self) {
        if let Ok(mut guard) = self.blob.lock() {
            *guard = None;
        }
    }
}
