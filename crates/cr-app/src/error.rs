//! Error types for the cr-app service layer.

use std::path::PathBuf;

/// Application error type shared by the CLI and the GUI.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// The remote call did not complete or the service reported a failure.
    /// The message is shown to the user verbatim.
    #[error("{0}")]
    Transport(String),

    #[error("Malformed service response: {0}")]
    MalformedResponse(String),

    #[error("History storage unavailable: {0}")]
    StorageUnavailable(String),

    #[error("Run failed: {0}")]
    RunFailed(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("History entry {position} not found ({count} saved runs)")]
    EntryNotFound { position: usize, count: usize },

    #[error("Failed to read config file: {path}")]
    ConfigRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Config error: {0}")]
    Config(String),

    #[error("Export failed: {0}")]
    Export(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for cr-app operations.
pub type AppResult<T> = Result<T, AppError>;

impl From<cr_history::HistoryError> for AppError {
    fn from(err: cr_history::HistoryError) -> Self {
        match err {
            cr_history::HistoryError::MalformedResponse { reason } => {
                AppError::MalformedResponse(reason)
            }
            cr_history::HistoryError::Storage(e) => AppError::StorageUnavailable(e.to_string()),
            cr_history::HistoryError::Json(e) => AppError::StorageUnavailable(e.to_string()),
        }
    }
}
