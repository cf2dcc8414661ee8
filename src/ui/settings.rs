use eframe::egui;
use egui::Color32;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

use crate::model::message::Speaker;

pub const DEFAULT_API_URL: &str = "http://localhost:5000/api/RPG";
pub const API_URL_ENV: &str = "RPG_API_URL";

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct AppSettings {
    /// Base path of the game service; every endpoint hangs off it.
    pub api_base_url: String,
    pub request_timeout_secs: u64,
    pub poll_interval_ms: u64,
    pub ui_scale: f32,

    // Speaker → color mapping
    pub speaker_colors: HashMap<String, [u8; 4]>,
}

impl Default for AppSettings {
    fn default() -> Self {
        let mut speaker_colors = HashMap::new();

        speaker_colors.insert("Player".into(), [40, 70, 120, 255]);
        speaker_colors.insert("DungeonMaster".into(), [60, 60, 60, 255]);
        speaker_colors.insert("Npc".into(), [40, 90, 60, 255]);

        Self {
            api_base_url: DEFAULT_API_URL.into(),
            request_timeout_secs: 120,
            poll_interval_ms: 1000,
            ui_scale: 1.0,
            speaker_colors,
        }
    }
}

impl AppSettings {
    pub fn color(&self, key: &str) -> Color32 {
        self.speaker_colors
            .get(key)
            .map(|c| Color32::from_rgba_unmultiplied(c[0], c[1], c[2], c[3]))
            .unwrap_or(Color32::DARK_GRAY)
    }

    pub fn set_color(&mut self, key: &str, color: Color32) {
        self.speaker_colors.insert(
            key.to_string(),
            [color.r(), color.g(), color.b(), color.a()],
        );
    }

    pub fn speaker_color(&self, speaker: &Speaker) -> Color32 {
        self.color(speaker_key(speaker))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms.max(100))
    }

    pub fn with_env_overrides(mut self) -> Self {
        self.apply_api_url_override(std::env::var(API_URL_ENV).ok());
        self
    }

    fn apply_api_url_override(&mut self, value: Option<String>) {
        if let Some(url) = value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty()) {
            log::info!("using game service at {url} ({API_URL_ENV})");
            self.api_base_url = url;
        }
    }
}

pub fn speaker_key(speaker: &Speaker) -> &'static str {
    match speaker {
        Speaker::Player => "Player",
        Speaker::DungeonMaster => "DungeonMaster",
        Speaker::Npc { .. } => "Npc",
    }
}

/// Editor for [`AppSettings`]. Works on a draft until saved.
#[derive(Default)]
pub struct SettingsWindow {
    open: bool,
    draft: Option<AppSettings>,
}

impl SettingsWindow {
    pub fn open(&mut self, current: &AppSettings) {
        self.open = true;
        self.draft = Some(current.clone());
    }

    /// Returns the new settings when the user saves.
    pub fn show(&mut self, ctx: &egui::Context, current: &AppSettings) -> Option<AppSettings> {
        if !self.open {
            return None;
        }
        let draft = self.draft.get_or_insert_with(|| current.clone());
        let mut saved = None;
        let mut open = self.open;
        let mut close = false;

        egui::Window::new("Settings")
            .open(&mut open)
            .collapsible(false)
            .resizable(false)
            .show(ctx, |ui| {
                ui.label("Game service URL");
                ui.text_edit_singleline(&mut draft.api_base_url);
                if draft.api_base_url != current.api_base_url {
                    ui.small("Takes effect after restart.");
                }

                ui.separator();
                ui.label("UI Scale");
                ui.add(egui::Slider::new(&mut draft.ui_scale, 0.75..=2.0));

                ui.label("World update poll interval (ms)");
                ui.add(egui::DragValue::new(&mut draft.poll_interval_ms).range(100..=10_000));

                ui.separator();
                ui.label("Chat colors");
                for (key, label) in [
                    ("Player", "You"),
                    ("DungeonMaster", "Dungeon Master"),
                    ("Npc", "Characters"),
                ] {
                    let mut color = draft.color(key);
                    ui.horizontal(|ui| {
                        if ui.color_edit_button_srgba(&mut color).changed() {
                            draft.set_color(key, color);
                        }
                        ui.label(label);
                    });
                }

                ui.separator();
                ui.horizontal(|ui| {
                    if ui.button("Save").clicked() {
                        saved = Some(draft.clone());
                        close = true;
                    }
                    if ui.button("Reset to defaults").clicked() {
                        *draft = AppSettings::default();
                    }
                });
            });

        self.open = open && !close;
        if !self.open {
            self.draft = None;
        }
        saved
    }
}
