use eframe::egui;
use log::warn;

use crate::engine::protocol::{EngineCommand, EngineResponse};
use crate::model::scenario::Game;
use crate::ui::effects::Effects;
use crate::ui::route::Route;

#[derive(Debug, Default)]
enum GamesList {
    #[default]
    NotLoaded,
    Loading,
    Loaded(Vec<Game>),
    Failed(String),
}

#[derive(Default)]
pub struct TitleScreen {
    games: GamesList,
    dialog_open: bool,
    pub wants_settings: bool,
    pub effects: Effects,
}

impl TitleScreen {
    pub fn new() -> Self {
        Self::default()
    }

    /// The saved-games list is fetched once and reused, unless the last try failed.
    pub fn open_load_dialog(&mut self) {
        self.dialog_open = true;
        if matches!(self.games, GamesList::NotLoaded | GamesList::Failed(_)) {
            self.games = GamesList::Loading;
            self.effects.send(EngineCommand::ListGames);
        }
    }

    pub fn select_game(&mut self, game_id: &str) {
        self.effects.navigate(Route::game(game_id));
    }

    pub fn new_game(&mut self) {
        self.effects.navigate(Route::NewGame);
    }

    pub fn handle(&mut self, response: EngineResponse) {
        if let EngineResponse::Games(result) = response {
            self.games = match result {
                Ok(games) => GamesList::Loaded(games),
                Err(e) => {
                    warn!("failed to load games: {e}");
                    GamesList::Failed(format!("Failed to load games. Please try again.\n{e}"))
                }
            };
        }
    }

    pub fn show(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.add_space(ui.available_height() * 0.25);
                ui.heading(egui::RichText::new("Text RPG Adventure").size(40.0));
                ui.label(egui::RichText::new("LLM-Powered Journey").size(22.0).weak());
                ui.add_space(32.0);

                ui.horizontal(|ui| {
                    let width = 180.0;
                    ui.add_space((ui.available_width() - width * 2.0 - 16.0).max(0.0) / 2.0);
                    if ui
                        .add_sized([width, 40.0], egui::Button::new("New Game"))
                        .clicked()
                    {
                        self.new_game();
                    }
                    ui.add_space(16.0);
                    if ui
                        .add_sized([width, 40.0], egui::Button::new("Load Game"))
                        .clicked()
                    {
                        self.open_load_dialog();
                    }
                });

                ui.add_space(16.0);
                if ui.small_button("Settings").clicked() {
                    self.wants_settings = true;
                }
            });
        });

        self.show_load_dialog(ctx);
    }

    fn show_load_dialog(&mut self, ctx: &egui::Context) {
        if !self.dialog_open {
            return;
        }
        let mut open = self.dialog_open;
        let mut chosen: Option<String> = None;
        let mut retry = false;

        egui::Window::new("Load Game")
            .open(&mut open)
            .collapsible(false)
            .default_width(460.0)
            .show(ctx, |ui| match &self.games {
                GamesList::NotLoaded | GamesList::Loading => {
                    ui.vertical_centered(|ui| ui.spinner());
                }
                GamesList::Failed(err) => {
                    ui.colored_label(ui.visuals().error_fg_color, err);
                    if ui.button("Retry").clicked() {
                        retry = true;
                    }
                }
                GamesList::Loaded(games) if games.is_empty() => {
                    ui.label("No saved games found. Start a new adventure!");
                }
                GamesList::Loaded(games) => {
                    egui::ScrollArea::vertical().max_height(420.0).show(ui, |ui| {
                        for game in games {
                            ui.group(|ui| {
                                ui.set_width(ui.available_width());
                                ui.horizontal(|ui| {
                                    ui.label(egui::RichText::new(&game.name).strong());
                                    ui.with_layout(
                                        egui::Layout::right_to_left(egui::Align::Center),
                                        |ui| {
                                            if ui.button("Play").clicked() {
                                                chosen = Some(game.game_id.clone());
                                            }
                                        },
                                    );
                                });
                                ui.label(format!(
                                    "Character: {}",
                                    game.player_name.as_deref().unwrap_or("-")
                                ));
                                ui.label(format!(
                                    "Location: {}",
                                    game.player_location.as_deref().unwrap_or("-")
                                ));
                                ui.small(format!("Game ID: {}", game.game_id));
                            });
                        }
                    });
                }
            });

        self.dialog_open = open;
        if retry {
            self.games = GamesList::NotLoaded;
            self.open_load_dialog();
        }
        if let Some(id) = chosen {
            self.select_game(&id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::error::GatewayError;

    fn game(id: &str) -> Game {
        Game {
            game_id: id.into(),
            name: "Run".into(),
            player_name: None,
            player_location: None,
        }
    }

    #[test]
    fn games_are_fetched_once_and_cached() {
        let mut t = TitleScreen::new();
        t.open_load_dialog();
        assert_eq!(t.effects.drain_commands(), vec![EngineCommand::ListGames]);

        t.handle(EngineResponse::Games(Ok(vec![game("g1")])));
        t.open_load_dialog();
        assert!(t.effects.drain_commands().is_empty());
    }

    #[test]
    fn empty_list_is_cached_too() {
        let mut t = TitleScreen::new();
        t.open_load_dialog();
        t.effects.drain_commands();
        t.handle(EngineResponse::Games(Ok(Vec::new())));
        t.open_load_dialog();
        assert!(t.effects.drain_commands().is_empty());
    }

    #[test]
    fn failed_fetch_is_retried_on_next_open() {
        let mut t = TitleScreen::new();
        t.open_load_dialog();
        t.effects.drain_commands();
        t.handle(EngineResponse::Games(Err(GatewayError::Unreachable("down".into()))));
        t.open_load_dialog();
        assert_eq!(t.effects.drain_commands(), vec![EngineCommand::ListGames]);
    }

    #[test]
    fn reopening_while_loading_does_not_refetch() {
        let mut t = TitleScreen::new();
        t.open_load_dialog();
        t.open_load_dialog();
        assert_eq!(t.effects.drain_commands().len(), 1);
    }

    #[test]
    fn selecting_a_game_routes_to_it() {
        let mut t = TitleScreen::new();
        t.select_game("g1");
        assert_eq!(t.effects.route(), Some(&Route::game("g1")));
        t.new_game();
        assert_eq!(t.effects.route(), Some(&Route::NewGame));
    }
}
