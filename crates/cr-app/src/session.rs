//! Application state for one interactive session.
//!
//! A `Session` is created at startup and lives until the frontend exits. It
//! owns the run store, the presenter and the status line, and implements the
//! user actions: submit a run, replay a history entry, clear history, export.

use cr_history::{RunStore, ServiceResponse, build_record};

use crate::client::{SimulationClient, SimulationRequest};
use crate::error::{AppError, AppResult};
use crate::export::{self, ArtifactSink};
use crate::history_view::{self, HistoryEntry, HistoryListing};
use crate::presenter::ResultPresenter;
use crate::status::RunStatus;
use crate::view::ResultView;

pub struct Session {
    store: RunStore,
    presenter: ResultPresenter,
    status: RunStatus,
    listing: HistoryListing,
}

impl Session {
    pub fn new(store: RunStore) -> Self {
        Self {
            store,
            presenter: ResultPresenter::new(),
            status: RunStatus::Idle,
            listing: HistoryListing::Empty,
        }
    }

    /// Draw the full initial state into `view`.
    pub fn attach(&mut self, view: &mut dyn ResultView) {
        self.presenter.render_initial(view);
        self.render_history(view);
        view.render_status(&self.status);
    }

    pub fn status(&self) -> &RunStatus {
        &self.status
    }

    pub fn presenter(&self) -> &ResultPresenter {
        &self.presenter
    }

    pub fn store(&self) -> &RunStore {
        &self.store
    }

    /// Listing as of the last render.
    pub fn listing(&self) -> &HistoryListing {
        &self.listing
    }

    fn set_status(&mut self, status: RunStatus, view: &mut dyn ResultView) {
        self.status = status;
        view.render_status(&self.status);
    }

    /// Mark a run as started. Rejected parameters fail the status line and
    /// nothing should be sent.
    pub fn begin_run(
        &mut self,
        request: &SimulationRequest,
        view: &mut dyn ResultView,
    ) -> AppResult<()> {
        if let Err(e) = request.validate() {
            self.set_status(RunStatus::failed(&e), view);
            return Err(e);
        }
        tracing::info!(
            model = %request.model,
            c_rate = request.c_rate,
            t_hours = request.t_hours,
            init_soc = request.init_soc,
            "starting simulation run"
        );
        self.set_status(RunStatus::Running, view);
        Ok(())
    }

    /// Apply the outcome of a remote call started with [`Session::begin_run`].
    ///
    /// On success the run is appended to history, shown, and the history list
    /// re-rendered. On failure only the status line changes.
    pub fn finish_run(
        &mut self,
        outcome: AppResult<ServiceResponse>,
        view: &mut dyn ResultView,
    ) -> &RunStatus {
        let response = match outcome {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(error = %e, "simulation run failed");
                self.set_status(RunStatus::failed(&e), view);
                return &self.status;
            }
        };

        let record = match build_record(response) {
            Ok(record) => record,
            Err(e) => {
                let e = AppError::from(e);
                tracing::warn!(error = %e, "rejecting service response");
                self.set_status(RunStatus::failed(&e), view);
                return &self.status;
            }
        };

        let payload = record.payload();
        let saved = self.store.append(record).map_err(AppError::from);

        self.presenter.show(payload, view);
        self.render_history(view);

        match saved {
            Ok(()) => {
                tracing::info!(runs = self.listing.len(), "run saved to history");
                self.set_status(RunStatus::Done, view);
            }
            Err(e) => {
                tracing::warn!(error = %e, "run completed but was not saved");
                self.set_status(RunStatus::failed(&e), view);
            }
        }
        &self.status
    }

    /// Validate, call the service once, and apply the outcome.
    pub fn submit(
        &mut self,
        client: &dyn SimulationClient,
        request: &SimulationRequest,
        view: &mut dyn ResultView,
    ) -> &RunStatus {
        if self.begin_run(request, view).is_err() {
            return &self.status;
        }
        let outcome = client.simulate(request);
        self.finish_run(outcome, view)
    }

    /// Show a history entry as the current result.
    pub fn load_entry(&mut self, entry: &HistoryEntry, view: &mut dyn ResultView) {
        tracing::debug!(position = entry.position, "loading history entry");
        entry.load(&mut self.presenter, view);
    }

    /// Show the entry at `position` (1 = newest) of the stored history.
    pub fn load_position(&mut self, position: usize, view: &mut dyn ResultView) -> AppResult<()> {
        let listing = history_view::history_listing(&self.store.load());
        let entry = listing.get(position).ok_or(AppError::EntryNotFound {
            position,
            count: listing.len(),
        })?;
        self.load_entry(entry, view);
        Ok(())
    }

    pub fn render_history(&mut self, view: &mut dyn ResultView) -> &HistoryListing {
        self.listing = history_view::render_history(&self.store, view);
        &self.listing
    }

    /// Empty the stored history and re-render the list. The current result
    /// stays on screen.
    pub fn clear_history(&mut self, view: &mut dyn ResultView) -> AppResult<()> {
        self.store.clear()?;
        tracing::info!("cleared run history");
        self.render_history(view);
        Ok(())
    }

    pub fn export_current(&self, sink: &mut dyn ArtifactSink, filename: &str) -> AppResult<bool> {
        export::export_current(&self.presenter, sink, filename)
    }

    pub fn export_plot(&self, sink: &mut dyn ArtifactSink, filename: &str) -> AppResult<bool> {
        export::export_plot(&self.presenter, sink, filename)
    }
}
