use cr_app::export::render_export;
use egui_plot::{Legend, Line, Plot, PlotPoints};

use super::screen::ShownResult;

#[derive(Default)]
pub struct ResultPanel {
    show_raw: bool,
}

impl ResultPanel {
    pub fn show(&mut self, ui: &mut egui::Ui, result: Option<&ShownResult>) {
        ui.heading("Result");

        let Some(result) = result else {
            ui.label("No result yet. Run a simulation or load a run from history.");
            return;
        };

        egui::Grid::new("result_summary")
            .num_columns(2)
            .striped(true)
            .show(ui, |ui| {
                let summary = &result.summary;
                if let Some(model) = &summary.model {
                    ui.label("Model");
                    ui.label(model);
                    ui.end_row();
                }
                if let Some(parameter_set) = &summary.parameter_set {
                    ui.label("Parameter set");
                    ui.label(parameter_set);
                    ui.end_row();
                }
                if let Some(n_points) = summary.n_points {
                    ui.label("Time points");
                    ui.label(n_points.to_string());
                    ui.end_row();
                }
                if let (Some(v_min), Some(v_max)) = (summary.v_min, summary.v_max) {
                    ui.label("Voltage range");
                    ui.label(format!("{:.4} - {:.4} V", v_min, v_max));
                    ui.end_row();
                }
            });

        ui.separator();

        if let Some(image) = &result.image {
            ui.add(
                egui::Image::from_bytes(image.uri.clone(), image.bytes.clone())
                    .max_width(ui.available_width().min(720.0)),
            );
        } else if let Some(error) = &result.image_error {
            ui.colored_label(egui::Color32::RED, format!("Could not decode plot: {}", error));
        } else if !result.curve.is_empty() {
            let points: PlotPoints = result.curve.clone().into();
            Plot::new("voltage_plot")
                .legend(Legend::default())
                .height(320.0)
                .x_axis_label("Time (min)")
                .y_axis_label("Terminal voltage (V)")
                .show(ui, |plot_ui| {
                    plot_ui.line(Line::new(points).name("Voltage"));
                });
        } else {
            ui.label("No plot for this run");
        }

        ui.separator();
        ui.checkbox(&mut self.show_raw, "Show raw result");
        if self.show_raw {
            let raw = render_export(&result.payload.result).unwrap_or_else(|e| e.to_string());
            egui::ScrollArea::vertical()
                .max_height(300.0)
                .show(ui, |ui| {
                    ui.monospace(raw);
                });
        }
    }
}
