use cr_app::{HistoryEntry, HistoryListing};

/// What the user asked for in the history panel this frame.
pub enum HistoryAction {
    Load(HistoryEntry),
    Clear,
}

#[derive(Default)]
pub struct HistoryPanel {
    confirm_clear: bool,
}

impl HistoryPanel {
    pub fn show(&mut self, ui: &mut egui::Ui, listing: &HistoryListing) -> Option<HistoryAction> {
        let mut action = None;

        ui.heading("History");

        ui.horizontal(|ui| {
            if self.confirm_clear {
                ui.label("Delete all saved runs?");
                if ui.button("Yes, clear").clicked() {
                    action = Some(HistoryAction::Clear);
                    self.confirm_clear = false;
                }
                if ui.button("Cancel").clicked() {
                    self.confirm_clear = false;
                }
            } else if ui
                .add_enabled(!listing.is_empty(), egui::Button::new("Clear history"))
                .clicked()
            {
                self.confirm_clear = true;
            }
        });

        ui.separator();

        match listing {
            HistoryListing::Empty => {
                ui.label("No runs saved yet");
            }
            HistoryListing::Entries(entries) => {
                ui.label(format!("{} saved run(s)", entries.len()));
                egui::ScrollArea::vertical().show(ui, |ui| {
                    for entry in entries {
                        ui.group(|ui| {
                            ui.horizontal(|ui| {
                                ui.strong(&entry.model);
                                ui.separator();
                                ui.label(&entry.saved_at_display);
                            });
                            ui.label(entry.inputs_label());
                            ui.horizontal(|ui| {
                                if ui.button("Load").clicked() {
                                    action = Some(HistoryAction::Load(entry.clone()));
                                }
                                if !entry.has_plot_image() {
                                    ui.weak("no plot image");
                                }
                            });
                        });
                        ui.add_space(4.0);
                    }
                });
            }
        }

        action
    }
}
