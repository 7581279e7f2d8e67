use crate::run_worker::RunWorker;
use crate::views::{HistoryAction, HistoryPanel, ResultPanel, ScreenState};
use cr_app::{
    AppConfig, DirectorySink, KNOWN_MODELS, RunStatus, RunStore, Session, SimulationClient,
    SimulationRequest, plot_filename_for,
};
use cr_history::MemorySlots;
use egui_file_dialog::FileDialog;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

pub struct CellrunApp {
    config: AppConfig,
    session: Session,
    screen: ScreenState,
    client: Arc<dyn SimulationClient>,
    form: SimulationRequest,
    run_worker: Option<RunWorker>,
    file_dialog: FileDialog,
    file_dialog_action: Option<FileDialogAction>,
    history_panel: HistoryPanel,
    result_panel: ResultPanel,
    notice: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum FileDialogAction {
    ExportResult,
    ExportPlot,
}

impl CellrunApp {
    pub fn new(cc: &eframe::CreationContext<'_>, config: AppConfig) -> Self {
        egui_extras::install_image_loaders(&cc.egui_ctx);

        let mut notice = None;
        let store = match config.open_store() {
            Ok(store) => store,
            Err(e) => {
                tracing::warn!(error = %e, "falling back to in-memory history");
                notice = Some(format!("History will not be kept after exit: {}", e));
                RunStore::with_key(MemorySlots::new(), config.storage_key.clone())
            }
        };

        let mut session = Session::new(store);
        let mut screen = ScreenState::default();
        session.attach(&mut screen);

        Self {
            client: Arc::new(config.client()),
            config,
            session,
            screen,
            form: SimulationRequest::default(),
            run_worker: None,
            file_dialog: FileDialog::new(),
            file_dialog_action: None,
            history_panel: HistoryPanel::default(),
            result_panel: ResultPanel::default(),
            notice,
        }
    }

    fn start_run(&mut self) {
        if self.run_worker.is_some() {
            return;
        }
        if self.session.begin_run(&self.form, &mut self.screen).is_ok() {
            self.run_worker = Some(RunWorker::start(self.client.clone(), self.form.clone()));
        }
    }

    fn poll_worker(&mut self) {
        let outcome = match &self.run_worker {
            Some(worker) => worker.poll(),
            None => return,
        };
        if let Some(outcome) = outcome {
            self.run_worker = None;
            self.session.finish_run(outcome, &mut self.screen);
        }
    }

    fn clear_history(&mut self) {
        self.notice = match self.session.clear_history(&mut self.screen) {
            Ok(()) => Some("History cleared".to_string()),
            Err(e) => Some(format!("Could not clear history: {}", e)),
        };
    }

    fn open_save_dialog(&mut self, action: FileDialogAction) {
        let default_name = match action {
            FileDialogAction::ExportResult => self.config.export_filename.clone(),
            FileDialogAction::ExportPlot => plot_filename_for(&self.config.export_filename),
        };
        self.file_dialog = FileDialog::new().default_file_name(&default_name);
        self.file_dialog_action = Some(action);
        self.file_dialog.save_file();
    }

    fn export_to(&mut self, action: FileDialogAction, path: PathBuf) {
        let (mut sink, filename) = match DirectorySink::for_path(&path) {
            Ok(split) => split,
            Err(e) => {
                self.notice = Some(e.to_string());
                return;
            }
        };

        let outcome = match action {
            FileDialogAction::ExportResult => self.session.export_current(&mut sink, &filename),
            FileDialogAction::ExportPlot => self.session.export_plot(&mut sink, &filename),
        };

        self.notice = match outcome {
            Ok(true) => Some(format!("Saved {}", path.display())),
            Ok(false) => None,
            Err(e) => Some(e.to_string()),
        };
    }

    fn parameter_form(&mut self, ui: &mut egui::Ui) {
        let running = self.run_worker.is_some();

        ui.heading("Simulation");
        ui.add_enabled_ui(!running, |ui| {
            egui::Grid::new("run_form").num_columns(2).show(ui, |ui| {
                ui.label("Model");
                egui::ComboBox::from_id_salt("model_selector")
                    .selected_text(self.form.model.clone())
                    .show_ui(ui, |ui| {
                        for model in KNOWN_MODELS {
                            ui.selectable_value(&mut self.form.model, model.to_string(), *model);
                        }
                    });
                ui.end_row();

                ui.label("C-rate");
                ui.add(
                    egui::DragValue::new(&mut self.form.c_rate)
                        .speed(0.05)
                        .range(0.01..=20.0),
                );
                ui.end_row();

                ui.label("Duration");
                ui.add(
                    egui::DragValue::new(&mut self.form.t_hours)
                        .speed(0.05)
                        .range(0.01..=100.0)
                        .suffix(" h"),
                );
                ui.end_row();

                ui.label("Initial SOC");
                ui.add(
                    egui::DragValue::new(&mut self.form.init_soc)
                        .speed(0.01)
                        .range(0.0..=1.0),
                );
                ui.end_row();
            });

            if ui.button("Run simulation").clicked() {
                self.start_run();
            }
        });

        ui.small(format!("Service: {}", self.config.endpoint));
    }
}

impl eframe::App for CellrunApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_worker();
        if self.run_worker.is_some() {
            ctx.request_repaint_after(Duration::from_millis(100));
        }
        for uri in self.screen.take_stale_uris() {
            ctx.forget_image(&uri);
        }

        let has_result = self.session.presenter().current().is_some();
        let has_plot = self.session.presenter().plot_image().is_some();

        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if ui
                    .add_enabled(has_result, egui::Button::new("Export JSON"))
                    .clicked()
                {
                    self.open_save_dialog(FileDialogAction::ExportResult);
                }
                if ui
                    .add_enabled(has_plot, egui::Button::new("Save plot"))
                    .clicked()
                {
                    self.open_save_dialog(FileDialogAction::ExportPlot);
                }
            });
        });

        self.file_dialog.update(ctx);
        if let Some(path) = self.file_dialog.take_selected() {
            if let Some(action) = self.file_dialog_action.take() {
                self.export_to(action, path.to_path_buf());
            }
        }

        egui::TopBottomPanel::bottom("status_line").show(ctx, |ui| {
            ui.horizontal(|ui| {
                match &self.screen.status {
                    RunStatus::Idle => {}
                    RunStatus::Running => {
                        ui.spinner();
                        ui.label(self.screen.status.label());
                    }
                    RunStatus::Done => {
                        ui.colored_label(egui::Color32::DARK_GREEN, self.screen.status.label());
                    }
                    RunStatus::Failed(_) => {
                        ui.colored_label(egui::Color32::RED, self.screen.status.label());
                    }
                }
                if let Some(notice) = &self.notice {
                    ui.separator();
                    ui.label(notice);
                }
            });
        });

        egui::SidePanel::left("form_and_history")
            .default_width(300.0)
            .show(ctx, |ui| {
                self.parameter_form(ui);
                ui.separator();

                match self.history_panel.show(ui, &self.screen.history) {
                    Some(HistoryAction::Load(entry)) => {
                        self.session.load_entry(&entry, &mut self.screen);
                    }
                    Some(HistoryAction::Clear) => self.clear_history(),
                    None => {}
                }
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                self.result_panel.show(ui, self.screen.result.as_ref());
            });
        });
    }
}
