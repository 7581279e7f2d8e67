pub mod history_view;
pub mod result_view;
pub mod screen;

pub use history_view::{HistoryAction, HistoryPanel};
pub use result_view::ResultPanel;
pub use screen::ScreenState;
