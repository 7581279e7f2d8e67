//! cr-history: persisted run history and run records.

pub mod record;
pub mod slot;
pub mod store;
pub mod types;

pub use record::{build_record, build_record_at, timestamp_now};
pub use slot::{FileSlots, MemorySlots, SlotBackend};
pub use store::{DEFAULT_STORAGE_KEY, RunStore};
pub use types::*;

pub type HistoryResult<T> = Result<T, HistoryError>;

#[derive(thiserror::Error, Debug)]
pub enum HistoryError {
    #[error("Storage unavailable: {0}")]
    Storage(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Malformed service response: {reason}")]
    MalformedResponse { reason: String },
}
