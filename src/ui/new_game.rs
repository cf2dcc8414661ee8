use eframe::egui;
use log::info;

use crate::engine::protocol::{EngineCommand, EngineResponse};
use crate::engine::wire::{CreateCharacterRequest, CreateGameRequest};
use crate::model::scenario::{GamePreferences, Scenario};
use crate::ui::effects::{Effects, Notice};
use crate::ui::route::Route;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardStep {
    ChooseScenario,
    DescribeCharacter,
}

impl WizardStep {
    pub fn index(self) -> usize {
        match self {
            WizardStep::ChooseScenario => 0,
            WizardStep::DescribeCharacter => 1,
        }
    }
}

/// Two-step flow: create the game from a scenario, then describe the character.
pub struct NewGameWizard {
    step: WizardStep,
    scenarios: Vec<Scenario>,
    scenarios_loading: bool,
    selected_scenario: Option<String>,
    pub preferences: GamePreferences,
    pub character_description: String,
    game_id: Option<String>,
    busy: bool,
    pub notice: Notice,
    pub effects: Effects,
}

impl NewGameWizard {
    pub fn new() -> Self {
        let mut effects = Effects::default();
        effects.send(EngineCommand::ListScenarios);

        Self {
            step: WizardStep::ChooseScenario,
            scenarios: Vec::new(),
            scenarios_loading: true,
            selected_scenario: None,
            preferences: GamePreferences::default(),
            character_description: String::new(),
            game_id: None,
            busy: false,
            notice: Notice::default(),
            effects,
        }
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn game_id(&self) -> Option<&str> {
        self.game_id.as_deref()
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    pub fn select_scenario(&mut self, scenario_id: &str) {
        if self.scenarios.iter().any(|s| s.scenario_id == scenario_id) {
            self.selected_scenario = Some(scenario_id.to_string());
        }
    }

    pub fn selected_scenario(&self) -> Option<&Scenario> {
        let id = self.selected_scenario.as_deref()?;
        self.scenarios.iter().find(|s| s.scenario_id == id)
    }

    pub fn create_game(&mut self) {
        if self.busy || self.step != WizardStep::ChooseScenario {
            return;
        }
        let Some(scenario_id) = self.selected_scenario.clone() else {
            self.notice.error("Please select a scenario first.");
            return;
        };
        self.busy = true;
        self.effects.send(EngineCommand::CreateGame(CreateGameRequest {
            scenario_id,
            preferences: self.preferences.clone(),
        }));
    }

    pub fn create_character(&mut self) {
        if self.busy || self.step != WizardStep::DescribeCharacter {
            return;
        }
        let Some(game_id) = self.game_id.clone() else {
            self.notice
                .error("Game ID is missing. Please go back and try again.");
            return;
        };
        let description = self.character_description.trim();
        if description.is_empty() {
            self.notice
                .error("Please describe your character before proceeding.");
            return;
        }
        self.busy = true;
        self.effects
            .send(EngineCommand::CreateCharacter(CreateCharacterRequest {
                game_id,
                character_description: description.to_string(),
            }));
    }

    pub fn back(&mut self) {
        if !self.busy && self.step == WizardStep::DescribeCharacter {
            self.step = WizardStep::ChooseScenario;
        }
    }

    pub fn cancel(&mut self) {
        self.effects.navigate(Route::Title);
    }

    pub fn handle(&mut self, response: EngineResponse) {
        match response {
            EngineResponse::Scenarios(result) => {
                self.scenarios_loading = false;
                match result {
                    Ok(list) => {
                        if self.selected_scenario.is_none() {
                            self.selected_scenario = list.first().map(|s| s.scenario_id.clone());
                        }
                        self.scenarios = list;
                    }
                    Err(e) => self
                        .notice
                        .error(format!("Failed to load scenarios. Please try again. ({e})")),
                }
            }
            EngineResponse::GameCreated(result) => {
                if !self.busy || self.step != WizardStep::ChooseScenario {
                    return;
                }
                self.busy = false;
                match result {
                    Ok(game_id) => {
                        info!("game {game_id} created");
                        self.game_id = Some(game_id);
                        self.step = WizardStep::DescribeCharacter;
                    }
                    Err(e) => self
                        .notice
                        .error(format!("Failed to create game. Please try again. ({e})")),
                }
            }
            EngineResponse::CharacterCreated { game_id, result } => {
                self.busy = false;
                match result {
                    Ok(()) => self.effects.navigate(Route::game(game_id)),
                    Err(e) => self
                        .notice
                        .error(format!("Failed to create character. Please try again. ({e})")),
                }
            }
            _ => {}
        }
    }

    pub fn show(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.heading("Create New Adventure");
            });
            ui.add_space(8.0);

            ui.horizontal(|ui| {
                for (step, label) in [
                    (WizardStep::ChooseScenario, "1. Choose Scenario"),
                    (WizardStep::DescribeCharacter, "2. Create Character"),
                ] {
                    let text = egui::RichText::new(label);
                    let text = if step == self.step {
                        text.strong()
                    } else if step.index() < self.step.index() {
                        text
                    } else {
                        text.weak()
                    };
                    ui.label(text);
                }
            });
            ui.separator();

            egui::ScrollArea::vertical().show(ui, |ui| match self.step {
                WizardStep::ChooseScenario => self.draw_scenario_step(ui),
                WizardStep::DescribeCharacter => self.draw_character_step(ui),
            });
        });

        self.notice.show(ctx);
    }

    fn draw_scenario_step(&mut self, ui: &mut egui::Ui) {
        ui.heading("Choose a Scenario & Game Preferences");
        ui.add_space(6.0);

        if self.scenarios_loading {
            ui.spinner();
        }

        let selected_text = self
            .selected_scenario
            .clone()
            .unwrap_or_else(|| "Select a scenario".into());
        let mut picked: Option<String> = None;
        egui::ComboBox::from_label("Scenario")
            .selected_text(selected_text)
            .show_ui(ui, |ui| {
                for s in &self.scenarios {
                    let selected = self.selected_scenario.as_deref() == Some(s.scenario_id.as_str());
                    if ui.selectable_label(selected, &s.scenario_id).clicked() {
                        picked = Some(s.scenario_id.clone());
                    }
                }
            });
        if let Some(id) = picked {
            self.select_scenario(&id);
        }
        ui.small("Select the world setting for your adventure");

        if let Some(scenario) = self.selected_scenario() {
            if let Some(setting) = &scenario.game_setting {
                ui.add_space(6.0);
                ui.group(|ui| {
                    ui.strong("Scenario Details");
                    egui::Grid::new("scenario_details")
                        .num_columns(2)
                        .show(ui, |ui| {
                            ui.label("Name:");
                            ui.label(&scenario.name);
                            ui.end_row();
                            ui.label("Genre:");
                            ui.label(&setting.genre);
                            ui.end_row();
                            ui.label("Theme:");
                            ui.label(&setting.theme);
                            ui.end_row();
                        });
                    ui.label("Description:");
                    ui.label(&setting.description);
                });
            }
        }

        ui.add_space(10.0);
        ui.strong("Game Preferences");
        egui::Grid::new("preferences").num_columns(3).show(ui, |ui| {
            ui.label("Tone");
            ui.text_edit_singleline(&mut self.preferences.tone);
            ui.small("e.g., light, neutral, dark");
            ui.end_row();

            ui.label("Complexity");
            ui.text_edit_singleline(&mut self.preferences.complexity);
            ui.small("e.g., low, medium, high");
            ui.end_row();

            ui.label("Age Appropriateness");
            ui.text_edit_singleline(&mut self.preferences.age_appropriateness);
            ui.small("e.g., child, teen, mature");
            ui.end_row();
        });

        ui.add_space(12.0);
        ui.horizontal(|ui| {
            if ui.button("Cancel").clicked() {
                self.cancel();
            }
            let enabled = !self.busy && self.selected_scenario.is_some();
            if ui
                .add_enabled(enabled, egui::Button::new("Create Game"))
                .clicked()
            {
                self.create_game();
            }
            if self.busy {
                ui.spinner();
            }
        });
    }

    fn draw_character_step(&mut self, ui: &mut egui::Ui) {
        ui.heading("Describe Your Character");
        ui.label(
            "Describe your character in detail - their appearance, background, personality, \
             skills, etc. The AI will create a game-ready character from your description.",
        );
        ui.add_space(6.0);

        ui.add(
            egui::TextEdit::multiline(&mut self.character_description)
                .desired_rows(8)
                .desired_width(f32::INFINITY)
                .hint_text(
                    "E.g. A tall elven ranger with keen senses and an affinity for nature...",
                ),
        );

        ui.add_space(12.0);
        ui.horizontal(|ui| {
            if ui.add_enabled(!self.busy, egui::Button::new("Back")).clicked() {
                self.back();
            }
            let enabled = !self.busy && !self.character_description.trim().is_empty();
            if ui
                .add_enabled(enabled, egui::Button::new("Create Character & Start Game"))
                .clicked()
            {
                self.create_character();
            }
            if self.busy {
                ui.spinner();
            }
        });
    }
}
