//! Shared application service layer for cellrun.
//!
//! This crate provides a unified interface for both CLI and GUI frontends:
//! talking to the simulation service, presenting results, rendering run
//! history and exporting the current result.

pub mod client;
pub mod config;
pub mod error;
pub mod export;
pub mod history_view;
pub mod presenter;
pub mod session;
pub mod status;
pub mod summary;
pub mod view;

// Re-export key types for convenience
pub use client::{HttpSimulationClient, KNOWN_MODELS, SimulationClient, SimulationRequest};
pub use config::AppConfig;
pub use error::{AppError, AppResult};
pub use export::{ArtifactSink, DEFAULT_EXPORT_FILENAME, DirectorySink, plot_filename_for};
pub use history_view::{HistoryEntry, HistoryListing};
pub use presenter::{Panel, ResultPresenter};
pub use session::Session;
pub use status::RunStatus;
pub use summary::{ResultSummary, summarize, voltage_curve};
pub use view::ResultView;

pub use cr_history::{RunPayload, RunRecord, RunStore, ServiceResponse};
