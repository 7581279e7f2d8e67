//! Retained screen model fed by the session.
//!
//! egui redraws every frame, so the session's view updates are stored here
//! and the panels read from this state.

use std::sync::Arc;

use cr_app::export::decode_data_uri;
use cr_app::{
    HistoryListing, ResultSummary, ResultView, RunPayload, RunStatus, summarize, voltage_curve,
};

pub struct ShownImage {
    pub uri: String,
    pub bytes: Arc<[u8]>,
}

pub struct ShownResult {
    pub payload: RunPayload,
    pub summary: ResultSummary,
    pub curve: Vec<[f64; 2]>,
    pub image: Option<ShownImage>,
    pub image_error: Option<String>,
}

pub struct ScreenState {
    pub result: Option<ShownResult>,
    pub history: HistoryListing,
    pub status: RunStatus,
    generation: u64,
    stale_uris: Vec<String>,
}

impl Default for ScreenState {
    fn default() -> Self {
        Self {
            result: None,
            history: HistoryListing::Empty,
            status: RunStatus::Idle,
            generation: 0,
            stale_uris: Vec::new(),
        }
    }
}

impl ScreenState {
    /// Image URIs that are no longer displayed and can be dropped from the
    /// loader cache.
    pub fn take_stale_uris(&mut self) -> Vec<String> {
        std::mem::take(&mut self.stale_uris)
    }

    fn retire_current_image(&mut self) {
        if let Some(image) = self.result.take().and_then(|r| r.image) {
            self.stale_uris.push(image.uri);
        }
    }
}

impl ResultView for ScreenState {
    fn render_empty(&mut self) {
        self.retire_current_image();
    }

    fn render_result(&mut self, payload: &RunPayload) {
        self.retire_current_image();
        self.generation += 1;

        let (image, image_error) = match payload.plot_image.as_deref().map(decode_data_uri) {
            Some(Ok(bytes)) => (
                Some(ShownImage {
                    uri: format!("bytes://cellrun-plot-{}.png", self.generation),
                    bytes: bytes.into(),
                }),
                None,
            ),
            Some(Err(e)) => (None, Some(e.to_string())),
            None => (None, None),
        };

        self.result = Some(ShownResult {
            payload: payload.clone(),
            summary: summarize(&payload.result),
            curve: voltage_curve(&payload.result),
            image,
            image_error,
        });
    }

    fn render_history_list(&mut self, listing: &HistoryListing) {
        self.history = listing.clone();
    }

    fn render_status(&mut self, status: &RunStatus) {
        self.status = status.clone();
    }
}
