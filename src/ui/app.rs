use std::sync::mpsc;
use std::time::Instant;

use eframe::egui;
use log::{debug, error, info};

use crate::engine::engine::EngineLink;
use crate::engine::error::GatewayError;
use crate::engine::protocol::{EngineResponse, Envelope, Reply, ScreenId};
use crate::ui::effects::Effects;
use crate::ui::game::screen::GameScreen;
use crate::ui::new_game::NewGameWizard;
use crate::ui::route::Route;
use crate::ui::settings::{AppSettings, SettingsWindow};
use crate::ui::settings_io;
use crate::ui::title::TitleScreen;

/// The screen behind the current route. Replaced, never reused, on navigation.
enum Screen {
    Title(TitleScreen),
    NewGame(NewGameWizard),
    Game(Box<GameScreen>),
}

impl Screen {
    fn effects(&mut self) -> &mut Effects {
        match self {
            Screen::Title(t) => &mut t.effects,
            Screen::NewGame(w) => &mut w.effects,
            Screen::Game(g) => &mut g.effects,
        }
    }
}

pub struct RpgApp {
    settings: AppSettings,
    settings_window: SettingsWindow,

    route: Route,
    screen: Screen,
    screen_id: ScreenId,
    next_screen_id: u64,

    link: EngineLink,
}

impl RpgApp {
    pub fn new(settings: AppSettings, link: EngineLink, start: Route) -> Self {
        let mut app = Self {
            settings,
            settings_window: SettingsWindow::default(),
            route: Route::Title,
            screen: Screen::Title(TitleScreen::new()),
            screen_id: ScreenId(0),
            next_screen_id: 1,
            link,
        };
        if start != Route::Title {
            app.navigate(start);
        }
        app
    }

    pub fn route(&self) -> &Route {
        &self.route
    }

    /// Swap in a fresh screen. Replies still in flight for the old one are dropped.
    fn navigate(&mut self, route: Route) {
        info!("navigate {} -> {}", self.route.path(), route.path());

        if let Screen::Game(game) = &mut self.screen {
            game.teardown();
        }

        self.screen_id = ScreenId(self.next_screen_id);
        self.next_screen_id += 1;

        self.screen = match &route {
            Route::Title => Screen::Title(TitleScreen::new()),
            Route::NewGame => Screen::NewGame(NewGameWizard::new()),
            Route::Game { game_id } => Screen::Game(Box::new(GameScreen::new(
                game_id,
                self.settings.poll_interval(),
            ))),
        };
        self.route = route;
        self.dispatch_effects();
    }

    fn dispatch_effects(&mut self) {
        let effects = self.screen.effects();
        let commands = effects.drain_commands();
        let route = effects.take_route();

        let mut undelivered = Vec::new();
        for command in commands {
            let envelope = Envelope {
                origin: self.screen_id,
                command,
            };
            if let Err(mpsc::SendError(envelope)) = self.link.commands.send(envelope) {
                error!("engine is gone; failing {:?}", envelope.command);
                undelivered.push(envelope.command);
            }
        }

        if let Some(route) = route {
            self.navigate(route);
            return;
        }

        if !undelivered.is_empty() {
            let now = Instant::now();
            for command in undelivered {
                let failure = command.into_failure(GatewayError::Unreachable(
                    "the background worker has stopped".into(),
                ));
                self.deliver(failure, now);
            }
            self.dispatch_effects();
        }
    }

    fn drain_replies(&mut self, now: Instant) {
        while let Ok(Reply { origin, response }) = self.link.replies.try_recv() {
            if origin != self.screen_id {
                debug!("dropping reply for stale screen {origin:?}");
                continue;
            }
            self.deliver(response, now);
        }
    }

    fn deliver(&mut self, response: EngineResponse, now: Instant) {
        match &mut self.screen {
            Screen::Title(t) => t.handle(response),
            Screen::NewGame(w) => w.handle(response),
            Screen::Game(g) => g.handle(response, now),
        }
    }
}

impl eframe::App for RpgApp {
    fn update(&mut self, ctx: &egui::Context, _: &mut eframe::Frame) {
        ctx.set_zoom_factor(self.settings.ui_scale);

        let now = Instant::now();
        self.drain_replies(now);

        match &mut self.screen {
            Screen::Title(title) => {
                title.show(ctx);
                if std::mem::take(&mut title.wants_settings) {
                    self.settings_window.open(&self.settings);
                }
            }
            Screen::NewGame(wizard) => wizard.show(ctx),
            Screen::Game(game) => {
                if let Some(wait) = game.on_frame(now) {
                    ctx.request_repaint_after(wait);
                }
                game.show(ctx, &self.settings);
            }
        }

        if let Some(updated) = self.settings_window.show(ctx, &self.settings) {
            if let Err(e) = settings_io::save_settings(&updated) {
                error!("failed to save settings: {e:#}");
            }
            self.settings = updated;
        }

        self.dispatch_effects();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::protocol::{EngineCommand, GameSnapshot};
    use crate::engine::wire::UserInputRequest;
    use crate::model::player::PlayerInfo;
    use crate::model::scenario::Scenario;
    use std::sync::mpsc::{Receiver, Sender};
    use std::time::Duration;

    struct Harness {
        app: RpgApp,
        commands: Receiver<Envelope>,
        replies: Sender<Reply>,
    }

    fn harness(start: Route) -> Harness {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (reply_tx, reply_rx) = mpsc::channel();
        let link = EngineLink {
            commands: cmd_tx,
            replies: reply_rx,
        };
        Harness {
            app: RpgApp::new(AppSettings::default(), link, start),
            commands: cmd_rx,
            replies: reply_tx,
        }
    }

    fn scenarios(origin: ScreenId) -> Reply {
        Reply {
            origin,
            response: EngineResponse::Scenarios(Ok(vec![Scenario {
                scenario_id: "forest-01".into(),
                name: "Forest".into(),
                game_setting: None,
                game_preferences: None,
            }])),
        }
    }

    #[test]
    fn start_route_issues_its_first_request() {
        let h = harness(Route::game("g1"));
        let sent = h.commands.try_recv().unwrap();
        assert_eq!(
            sent.command,
            EngineCommand::LoadGame {
                game_id: "g1".into()
            }
        );
        assert_eq!(sent.origin, h.app.screen_id);
        assert_eq!(h.app.route(), &Route::game("g1"));
    }

    #[test]
    fn title_start_sends_nothing() {
        let h = harness(Route::Title);
        assert!(h.commands.try_recv().is_err());
    }

    #[test]
    fn replies_for_a_replaced_screen_are_dropped() {
        let mut h = harness(Route::NewGame);
        let first = h.commands.try_recv().unwrap().origin;

        h.app.navigate(Route::NewGame);
        let second = h.commands.try_recv().unwrap().origin;
        assert_ne!(first, second);

        h.replies.send(scenarios(first)).unwrap();
        h.app.drain_replies(Instant::now());
        let Screen::NewGame(wizard) = &h.app.screen else {
            panic!("expected wizard");
        };
        assert!(wizard.selected_scenario().is_none());

        h.replies.send(scenarios(second)).unwrap();
        h.app.drain_replies(Instant::now());
        let Screen::NewGame(wizard) = &h.app.screen else {
            panic!("expected wizard");
        };
        assert_eq!(wizard.selected_scenario().unwrap().scenario_id, "forest-01");
    }

    #[test]
    fn screen_navigation_is_followed() {
        let mut h = harness(Route::Title);
        if let Screen::Title(t) = &mut h.app.screen {
            t.new_game();
        }
        h.app.dispatch_effects();
        assert_eq!(h.app.route(), &Route::NewGame);
        assert_eq!(
            h.commands.try_recv().unwrap().command,
            EngineCommand::ListScenarios
        );
    }

    #[test]
    fn character_creation_lands_on_the_game_screen() {
        let mut h = harness(Route::NewGame);
        let origin = h.commands.try_recv().unwrap().origin;
        h.replies
            .send(Reply {
                origin,
                response: EngineResponse::CharacterCreated {
                    game_id: "g7".into(),
                    result: Ok(()),
                },
            })
            .unwrap();
        h.app.drain_replies(Instant::now());
        h.app.dispatch_effects();

        assert_eq!(h.app.route(), &Route::game("g7"));
        let load = h.commands.try_recv().unwrap();
        assert_ne!(load.origin, origin);
        assert_eq!(
            load.command,
            EngineCommand::LoadGame {
                game_id: "g7".into()
            }
        );
    }

    #[test]
    fn pending_check_fails_cleanly_when_the_engine_is_gone() {
        let mut h = harness(Route::game("g1"));
        let origin = h.commands.try_recv().unwrap().origin;
        let now = Instant::now();
        for response in [
            EngineResponse::GameLoaded(Ok(Box::new(GameSnapshot {
                player: PlayerInfo::default(),
                npcs: Vec::new(),
                inventory: Vec::new(),
            }))),
            EngineResponse::InputAnswered {
                request: UserInputRequest::to_dungeon_master("g1", "look"),
                reply: Ok("A cave.".into()),
                npcs: Some(Ok(Vec::new())),
            },
        ] {
            h.replies.send(Reply { origin, response }).unwrap();
        }
        h.app.drain_replies(now);

        let Screen::Game(game) = &mut h.app.screen else {
            panic!("expected game screen");
        };
        assert!(game.session().poller.is_pending());
        game.on_frame(now + Duration::from_secs(2));

        drop(h.commands);
        h.app.dispatch_effects();

        let Screen::Game(game) = &h.app.screen else {
            panic!("expected game screen");
        };
        assert!(!game.session().poller.is_pending());
        assert!(!game.session().poller.is_active());
    }

    #[test]
    fn undelivered_load_surfaces_as_an_error() {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (_reply_tx, reply_rx) = mpsc::channel();
        drop(cmd_rx);
        let link = EngineLink {
            commands: cmd_tx,
            replies: reply_rx,
        };
        let app = RpgApp::new(AppSettings::default(), link, Route::game("g1"));
        let Screen::Game(game) = &app.screen else {
            panic!("expected game screen");
        };
        assert!(game.notice.text().unwrap().contains("background worker has stopped"));
    }
}
