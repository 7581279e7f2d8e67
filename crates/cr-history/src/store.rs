//! Run history storage API.
//!
//! The whole history lives in one named slot as a JSON array of records and
//! is read and rewritten on every mutation. There is no locking or
//! versioning: two writers appending at the same time can lose one update.

use std::path::PathBuf;

use crate::slot::{FileSlots, SlotBackend};
use crate::types::{RunHistory, RunRecord};
use crate::HistoryResult;

pub const DEFAULT_STORAGE_KEY: &str = "battery_sim_runs";

pub struct RunStore {
    backend: Box<dyn SlotBackend>,
    key: String,
}

impl RunStore {
    pub fn new(backend: impl SlotBackend + 'static) -> Self {
        Self::with_key(backend, DEFAULT_STORAGE_KEY)
    }

    pub fn with_key(backend: impl SlotBackend + 'static, key: impl Into<String>) -> Self {
        Self {
            backend: Box::new(backend),
            key: key.into(),
        }
    }

    /// File-backed store rooted at `data_dir`.
    pub fn open_dir(data_dir: PathBuf, key: impl Into<String>) -> HistoryResult<Self> {
        let slots = FileSlots::new(data_dir)?;
        Ok(Self::with_key(slots, key))
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Read the full history. Missing, unreadable or malformed content yields
    /// an empty history.
    pub fn load(&self) -> RunHistory {
        let content = match self.backend.read(&self.key) {
            Ok(Some(content)) => content,
            Ok(None) => return Vec::new(),
            Err(e) => {
                tracing::warn!(key = %self.key, error = %e, "could not read run history");
                return Vec::new();
            }
        };

        match serde_json::from_str::<RunHistory>(&content) {
            Ok(history) => {
                tracing::debug!(key = %self.key, runs = history.len(), "loaded run history");
                history
            }
            Err(e) => {
                tracing::warn!(key = %self.key, error = %e, "ignoring malformed run history");
                Vec::new()
            }
        }
    }

    /// Overwrite the slot with `history`.
    pub fn save(&self, history: &[RunRecord]) -> HistoryResult<()> {
        let content = serde_json::to_string(history)?;
        self.backend.write(&self.key, &content)?;
        tracing::debug!(key = %self.key, runs = history.len(), "saved run history");
        Ok(())
    }

    /// Append one record to the end of the stored history.
    pub fn append(&self, record: RunRecord) -> HistoryResult<()> {
        let mut history = self.load();
        history.push(record);
        self.save(&history)
    }

    /// Remove the slot entirely.
    pub fn clear(&self) -> HistoryResult<()> {
        self.backend.remove(&self.key)?;
        tracing::debug!(key = %self.key, "cleared run history");
        Ok(())
    }
}
