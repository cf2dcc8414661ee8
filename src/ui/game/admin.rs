use eframe::egui;

use crate::engine::error::GatewayError;
use crate::engine::wire::AdminAction;

#[derive(Debug, Default)]
pub struct AdminPanel {
    pub open: bool,
    busy: bool,
    result: Option<String>,
}

impl AdminPanel {
    pub fn open(&mut self) {
        self.open = true;
        self.result = None;
    }

    /// Marks the panel busy. Returns false if another action is still running.
    pub fn begin(&mut self) -> bool {
        if self.busy {
            return false;
        }
        self.busy = true;
        true
    }

    pub fn finish(&mut self, action: AdminAction, result: Result<String, GatewayError>) {
        self.busy = false;
        self.result = Some(match result {
            Ok(text) => text,
            Err(e) => format!("{}\n{e}", action.failure_text()),
        });
    }

    pub fn result(&self) -> Option<&str> {
        self.result.as_deref()
    }

    /// Returns the action the user clicked, if any.
    pub fn show(&mut self, ctx: &egui::Context) -> Option<AdminAction> {
        if !self.open {
            return None;
        }
        let mut clicked = None;
        let mut open = self.open;

        egui::Window::new("Game Admin Tools")
            .open(&mut open)
            .collapsible(false)
            .default_width(520.0)
            .show(ctx, |ui| {
                ui.horizontal_wrapped(|ui| {
                    for action in AdminAction::ALL {
                        if ui
                            .add_enabled(!self.busy, egui::Button::new(action.label()))
                            .clicked()
                        {
                            clicked = Some(action);
                        }
                    }
                });

                if self.busy {
                    ui.vertical_centered(|ui| ui.spinner());
                }

                if let Some(result) = &self.result {
                    ui.separator();
                    egui::ScrollArea::vertical()
                        .max_height(300.0)
                        .show(ui, |ui| {
                            ui.add(egui::Label::new(egui::RichText::new(result).monospace()).wrap());
                        });
                }

                ui.separator();
                if ui.button("Close").clicked() {
                    self.open = false;
                }
            });

        self.open = open && self.open;
        clicked
    }
}
