use std::io::{self, Write};

use cr_app::{HistoryListing, ResultView, RunPayload, RunStatus, summarize};

/// Prints session updates to stdout.
pub struct TerminalView {
    print_history: bool,
}

impl TerminalView {
    pub fn new(print_history: bool) -> Self {
        Self { print_history }
    }
}

impl ResultView for TerminalView {
    fn render_empty(&mut self) {
        println!("No result to show yet. Run a simulation or load a run from history.");
    }

    fn render_result(&mut self, payload: &RunPayload) {
        let summary = summarize(&payload.result);

        println!("\nResult:");
        if let Some(model) = &summary.model {
            println!("  Model: {}", model);
        }
        if let Some(parameter_set) = &summary.parameter_set {
            println!("  Parameter set: {}", parameter_set);
        }
        let inputs = &payload.result["meta"]["inputs"];
        if inputs.is_object() {
            println!(
                "  Inputs: C-rate={}  t={} h  SOC0={}",
                inputs["c_rate"], inputs["t_hours"], inputs["init_soc"]
            );
        }
        if let Some(n_points) = summary.n_points {
            println!("  Time points: {}", n_points);
        }
        if let (Some(v_min), Some(v_max)) = (summary.v_min, summary.v_max) {
            println!("  Voltage range: {:.4} - {:.4} V", v_min, v_max);
        }
        match &payload.plot_image {
            Some(image) => println!("  Plot image: available ({} bytes encoded)", image.len()),
            None => println!("  Plot image: none"),
        }
    }

    fn render_history_list(&mut self, listing: &HistoryListing) {
        if !self.print_history {
            return;
        }
        match listing {
            HistoryListing::Empty => println!("No saved runs."),
            HistoryListing::Entries(entries) => {
                println!("Saved runs (newest first):");
                for entry in entries {
                    println!(
                        "  [{:>3}] {}  {:<9} {}{}",
                        entry.position,
                        entry.saved_at_display,
                        entry.model,
                        entry.inputs_label(),
                        if entry.has_plot_image() { "  [plot]" } else { "" }
                    );
                }
            }
        }
    }

    fn render_status(&mut self, status: &RunStatus) {
        match status {
            RunStatus::Idle => {}
            RunStatus::Running => {
                print!("{}", status);
                let _ = io::stdout().flush();
            }
            RunStatus::Done => println!("\r✓ {}", status),
            RunStatus::Failed(_) => println!("\r✗ {}", status),
        }
    }
}
