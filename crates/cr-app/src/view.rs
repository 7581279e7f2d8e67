//! View-update interface implemented by each frontend.
//!
//! The service layer never draws anything itself. It tells a `ResultView`
//! what changed and the frontend decides how to show it.

use cr_history::RunPayload;

use crate::history_view::HistoryListing;
use crate::status::RunStatus;

pub trait ResultView {
    /// Show the "no result yet" placeholder and hide the result panel.
    fn render_empty(&mut self);

    /// Show the result panel with exactly this payload and hide the
    /// placeholder. A payload without an image must leave no image on screen.
    fn render_result(&mut self, payload: &RunPayload);

    fn render_history_list(&mut self, listing: &HistoryListing);

    fn render_status(&mut self, status: &RunStatus);
}
