use std::time::{Duration, Instant};

use eframe::egui;

use crate::engine::protocol::EngineCommand;
use crate::ui::route::Route;

/// What a screen wants done after handling input: backend calls and navigation.
#[derive(Debug, Default)]
pub struct Effects {
    commands: Vec<EngineCommand>,
    route: Option<Route>,
}

impl Effects {
    pub fn send(&mut self, command: EngineCommand) {
        self.commands.push(command);
    }

    pub fn navigate(&mut self, route: Route) {
        self.route = Some(route);
    }

    pub fn drain_commands(&mut self) -> Vec<EngineCommand> {
        std::mem::take(&mut self.commands)
    }

    pub fn take_route(&mut self) -> Option<Route> {
        self.route.take()
    }

    #[cfg(test)]
    pub fn commands(&self) -> &[EngineCommand] {
        &self.commands
    }

    #[cfg(test)]
    pub fn route(&self) -> Option<&Route> {
        self.route.as_ref()
    }
}

pub const NOTICE_TTL: Duration = Duration::from_secs(6);

/// Single dismissible error notification, hidden automatically after a while.
#[derive(Debug, Default)]
pub struct Notice {
    current: Option<(String, Instant)>,
}

impl Notice {
    pub fn error(&mut self, text: impl Into<String>) {
        let text = text.into();
        log::warn!("{text}");
        self.current = Some((text, Instant::now()));
    }

    pub fn dismiss(&mut self) {
        self.current = None;
    }

    pub fn text(&self) -> Option<&str> {
        self.current.as_ref().map(|(t, _)| t.as_str())
    }

    pub fn expire(&mut self, now: Instant) {
        if let Some((_, shown)) = &self.current {
            if now.saturating_duration_since(*shown) >= NOTICE_TTL {
                self.current = None;
            }
        }
    }

    pub fn show(&mut self, ctx: &egui::Context) {
        self.expire(Instant::now());
        let Some(text) = self.text().map(str::to_owned) else {
            return;
        };

        egui::Area::new(egui::Id::new("error_notice"))
            .anchor(egui::Align2::CENTER_BOTTOM, [0.0, -24.0])
            .show(ctx, |ui| {
                egui::Frame::new()
                    .fill(egui::Color32::from_rgb(120, 30, 30))
                    .corner_radius(egui::CornerRadius::same(6))
                    .inner_margin(egui::Margin::symmetric(12, 8))
                    .show(ui, |ui| {
                        ui.horizontal(|ui| {
                            ui.label(egui::RichText::new(text).color(egui::Color32::WHITE));
                            if ui.small_button("✕").clicked() {
                                self.dismiss();
                            }
                        });
                    });
            });

        ctx.request_repaint_after(NOTICE_TTL);
    }
}
