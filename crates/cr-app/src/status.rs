//! User-facing status line.

use std::fmt;

use crate::error::{AppError, AppResult};

#[derive(Debug, Clone, PartialEq, Default)]
pub enum RunStatus {
    #[default]
    Idle,
    Running,
    Done,
    Failed(String),
}

impl RunStatus {
    pub fn failed(message: impl fmt::Display) -> Self {
        RunStatus::Failed(message.to_string())
    }

    pub fn is_running(&self) -> bool {
        matches!(self, RunStatus::Running)
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, RunStatus::Failed(_))
    }

    /// `Err(AppError::RunFailed)` for a failed run, `Ok` otherwise.
    pub fn to_result(&self) -> AppResult<()> {
        match self {
            RunStatus::Failed(message) => Err(AppError::RunFailed(message.clone())),
            _ => Ok(()),
        }
    }

    pub fn label(&self) -> String {
        match self {
            RunStatus::Idle => String::new(),
            RunStatus::Running => "Running simulation...".to_string(),
            RunStatus::Done => "Done. Saved to history.".to_string(),
            RunStatus::Failed(message) => format!("Failed: {}", message),
        }
    }
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}
