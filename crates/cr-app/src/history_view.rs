//! Reverse-chronological history listing.

use chrono::{DateTime, Local};
use cr_history::{RunInputs, RunPayload, RunRecord, RunStore};

use crate::presenter::ResultPresenter;
use crate::view::ResultView;

/// One row of the rendered history list.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryEntry {
    /// 1-based position in the rendered list; 1 is the newest run.
    pub position: usize,
    pub model: String,
    pub saved_at: String,
    pub saved_at_display: String,
    /// `None` when the stored meta is incomplete.
    pub inputs: Option<RunInputs>,
    payload: RunPayload,
}

impl HistoryEntry {
    fn from_record(position: usize, record: &RunRecord) -> Self {
        let meta = record.run_meta();
        let model = match &meta {
            Some(meta) => meta.model.clone(),
            None => record.meta["model"]
                .as_str()
                .unwrap_or("unknown")
                .to_string(),
        };
        Self {
            position,
            model,
            saved_at: record.saved_at.clone(),
            saved_at_display: format_saved_at(&record.saved_at),
            inputs: meta.map(|meta| meta.inputs),
            payload: record.payload(),
        }
    }

    /// One-line summary of the run inputs.
    pub fn inputs_label(&self) -> String {
        match &self.inputs {
            Some(inputs) => format!(
                "C-rate={}  t={} h  SOC0={}",
                inputs.c_rate, inputs.t_hours, inputs.init_soc
            ),
            None => "inputs unavailable".to_string(),
        }
    }

    pub fn has_plot_image(&self) -> bool {
        self.payload.plot_image.is_some()
    }

    pub fn payload(&self) -> &RunPayload {
        &self.payload
    }

    /// Replay this run into the presenter. No network call is involved.
    pub fn load(&self, presenter: &mut ResultPresenter, view: &mut dyn ResultView) {
        presenter.show(self.payload.clone(), view);
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum HistoryListing {
    Empty,
    Entries(Vec<HistoryEntry>),
}

impl HistoryListing {
    pub fn entries(&self) -> &[HistoryEntry] {
        match self {
            HistoryListing::Empty => &[],
            HistoryListing::Entries(entries) => entries,
        }
    }

    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, HistoryListing::Empty)
    }

    pub fn get(&self, position: usize) -> Option<&HistoryEntry> {
        position
            .checked_sub(1)
            .and_then(|index| self.entries().get(index))
    }
}

/// Build the listing for `history`, newest first.
pub fn history_listing(history: &[RunRecord]) -> HistoryListing {
    if history.is_empty() {
        return HistoryListing::Empty;
    }

    let entries = history
        .iter()
        .rev()
        .enumerate()
        .map(|(index, record)| HistoryEntry::from_record(index + 1, record))
        .collect();
    HistoryListing::Entries(entries)
}

/// Read the persisted history and push the listing to the view.
///
/// Always reflects what is stored right now, so it can be called after any
/// mutation.
pub fn render_history(store: &RunStore, view: &mut dyn ResultView) -> HistoryListing {
    let listing = history_listing(&store.load());
    view.render_history_list(&listing);
    listing
}

/// Local-time display for a `savedAt` stamp. Unparseable stamps are shown
/// as stored.
pub fn format_saved_at(saved_at: &str) -> String {
    match DateTime::parse_from_rfc3339(saved_at) {
        Ok(at) => at
            .with_timezone(&Local)
            .format("%Y-%m-%d %H:%M:%S")
            .to_string(),
        Err(_) => saved_at.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cr_history::{ServiceResponse, build_record};
    use serde_json::json;

    fn record(c_rate: f64, image: bool) -> RunRecord {
        build_record(ServiceResponse {
            result: json!({"meta": {"model": "SPM", "inputs": {"c_rate": c_rate, "t_hours": 1.5, "init_soc": 0.9}}}),
            plot_image: image.then(|| "data:image/png;base64,AA==".to_string()),
        })
        .unwrap()
    }

    #[test]
    fn empty_history_gives_empty_listing() {
        let listing = history_listing(&[]);
        assert!(listing.is_empty());
        assert_eq!(listing.len(), 0);
        assert!(listing.get(1).is_none());
    }

    #[test]
    fn newest_first_with_positions() {
        let history = vec![record(1.0, true), record(2.0, false), record(3.0, true)];
        let listing = history_listing(&history);

        let rates: Vec<f64> = listing
            .entries()
            .iter()
            .map(|e| e.inputs.as_ref().unwrap().c_rate)
            .collect();
        assert_eq!(rates, vec![3.0, 2.0, 1.0]);
        let positions: Vec<usize> = listing.entries().iter().map(|e| e.position).collect();
        assert_eq!(positions, vec![1, 2, 3]);

        let second = listing.get(2).unwrap();
        assert_eq!(second.model, "SPM");
        assert_eq!(second.inputs_label(), "C-rate=2  t=1.5 h  SOC0=0.9");
        assert!(!second.has_plot_image());
        assert!(listing.get(0).is_none());
        assert!(listing.get(4).is_none());
    }

    #[test]
    fn entry_payload_comes_from_record() {
        let history = vec![record(1.0, true)];
        let listing = history_listing(&history);
        let entry = listing.get(1).unwrap();
        assert_eq!(entry.payload(), &history[0].payload());
    }

    #[test]
    fn incomplete_stored_meta_still_lists() {
        let stored = RunRecord {
            saved_at: "2026-03-01T10:00:00.000Z".to_string(),
            result: json!({"meta": {"model": "Thevenin"}}),
            meta: json!({"model": "Thevenin"}),
            plot_image: None,
        };
        let listing = history_listing(&[stored]);
        let entry = listing.get(1).unwrap();
        assert_eq!(entry.model, "Thevenin");
        assert!(entry.inputs.is_none());
        assert_eq!(entry.inputs_label(), "inputs unavailable");
    }

    #[test]
    fn saved_at_formatting() {
        assert_eq!(format_saved_at("yesterday"), "yesterday");
        let shown = format_saved_at("2026-03-01T10:00:00.000Z");
        assert_eq!(shown.len(), "2026-03-01 10:00:00".len());
        assert!(shown.starts_with("2026-0"));
    }
}
