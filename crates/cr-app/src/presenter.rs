//! Current result presentation.

use cr_history::RunPayload;

use crate::view::ResultView;

/// Which of the two result-area panels is visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Panel {
    #[default]
    Empty,
    Result,
}

/// Holds the result currently shown to the user.
///
/// Fresh runs and history replays both go through [`ResultPresenter::show`];
/// each call replaces the previous payload wholesale.
#[derive(Debug, Default)]
pub struct ResultPresenter {
    current: Option<RunPayload>,
    visible: Panel,
}

impl ResultPresenter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bring a freshly attached view up to date: the placeholder if nothing
    /// has been shown yet, otherwise the current result.
    pub fn render_initial(&self, view: &mut dyn ResultView) {
        match &self.current {
            Some(payload) => view.render_result(payload),
            None => view.render_empty(),
        }
    }

    pub fn show(&mut self, payload: RunPayload, view: &mut dyn ResultView) {
        self.visible = Panel::Result;
        let current = self.current.insert(payload);
        view.render_result(current);
    }

    pub fn current(&self) -> Option<&RunPayload> {
        self.current.as_ref()
    }

    pub fn plot_image(&self) -> Option<&str> {
        self.current.as_ref().and_then(|p| p.plot_image.as_deref())
    }

    pub fn visible_panel(&self) -> Panel {
        self.visible
    }
}
