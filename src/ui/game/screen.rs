use std::time::{Duration, Instant};

use eframe::egui;
use log::{debug, info};

use crate::engine::protocol::{EngineCommand, EngineResponse};
use crate::engine::wire::AdminAction;
use crate::ui::effects::{Effects, Notice};
use crate::ui::game::admin::AdminPanel;
use crate::ui::game::panels;
use crate::ui::game::session::{ChatTarget, GameSession};
use crate::ui::route::Route;
use crate::ui::settings::AppSettings;

/// Controller for `/game/:gameId`.
pub struct GameScreen {
    pub(super) session: GameSession,
    pub(super) dm_input: String,
    pub(super) npc_input: String,
    pub(super) dm_busy: bool,
    pub(super) npc_busy: bool,
    pub(super) npcs_loading: bool,
    pub(super) loading: bool,
    pub(super) npcs_expanded: bool,
    pub(super) admin: AdminPanel,
    pub notice: Notice,
    pub effects: Effects,
}

impl GameScreen {
    pub fn new(game_id: &str, poll_interval: Duration) -> Self {
        let mut screen = Self {
            session: GameSession::new(game_id, poll_interval),
            dm_input: String::new(),
            npc_input: String::new(),
            dm_busy: false,
            npc_busy: false,
            npcs_loading: false,
            loading: false,
            npcs_expanded: true,
            admin: AdminPanel::default(),
            notice: Notice::default(),
            effects: Effects::default(),
        };

        if game_id.is_empty() {
            screen
                .notice
                .error("Game ID is missing. Please return to the title screen.");
        } else {
            screen.loading = true;
            screen.effects.send(EngineCommand::LoadGame {
                game_id: game_id.to_string(),
            });
        }
        screen
    }

    pub fn session(&self) -> &GameSession {
        &self.session
    }

    pub fn send(&mut self, target: ChatTarget) {
        let raw = match target {
            ChatTarget::DungeonMaster => &self.dm_input,
            ChatTarget::SelectedNpc => &self.npc_input,
        };
        match self.session.prepare_send(target, raw) {
            Err(e) => self.notice.error(e.to_string()),
            Ok(None) => {}
            Ok(Some(request)) => {
                match target {
                    ChatTarget::DungeonMaster => {
                        self.dm_input.clear();
                        self.dm_busy = true;
                    }
                    ChatTarget::SelectedNpc => {
                        self.npc_input.clear();
                        self.npc_busy = true;
                    }
                }
                self.effects.send(EngineCommand::SendInput(request));
            }
        }
    }

    pub fn refresh_npcs(&mut self) {
        if self.npcs_loading || self.session.game_id().is_empty() {
            return;
        }
        self.npcs_loading = true;
        self.effects.send(EngineCommand::RefreshNpcs {
            game_id: self.session.game_id().to_string(),
        });
    }

    pub fn run_admin(&mut self, action: AdminAction) {
        if self.session.game_id().is_empty() || !self.admin.begin() {
            return;
        }
        info!("admin action: {}", action.label());
        self.effects.send(EngineCommand::Admin {
            game_id: self.session.game_id().to_string(),
            action,
        });
    }

    pub fn return_to_title(&mut self) {
        self.effects.navigate(Route::Title);
    }

    /// Fire the poll timer if it is due. Returns when the next frame is needed.
    pub fn on_frame(&mut self, now: Instant) -> Option<Duration> {
        if let Some(ticket) = self.session.poller.tick(now) {
            self.effects.send(EngineCommand::CheckPending {
                game_id: self.session.game_id().to_string(),
                ticket,
            });
        }
        self.session.poller.time_until_tick(now)
    }

    /// Called when navigating away.
    pub fn teardown(&mut self) {
        self.session.poller.cancel();
        debug!("game screen for {} torn down", self.session.game_id());
    }

    pub fn handle(&mut self, response: EngineResponse, now: Instant) {
        match response {
            EngineResponse::GameLoaded(result) => {
                self.loading = false;
                match result {
                    Ok(snapshot) => self.session.apply_snapshot(*snapshot),
                    Err(e) => self
                        .notice
                        .error(format!("Failed to load game data. Please try again. ({e})")),
                }
            }
            EngineResponse::InputAnswered {
                request,
                reply,
                npcs,
            } => {
                match ChatTarget::from(request.prompt_type) {
                    ChatTarget::DungeonMaster => self.dm_busy = false,
                    ChatTarget::SelectedNpc => self.npc_busy = false,
                }
                match reply {
                    Ok(text) => {
                        self.session.record_reply(&request, text);
                        match npcs {
                            Some(Ok(list)) => self.session.apply_npcs(list),
                            Some(Err(e)) => self.notice.error(format!(
                                "Failed to refresh visible NPCs. Please try again. ({e})"
                            )),
                            None => {}
                        }
                        self.session.poller.start(now);
                    }
                    Err(e) => self.notice.error(format!(
                        "Failed to get response from the game. Please try again. ({e})"
                    )),
                }
            }
            EngineResponse::Npcs(result) => {
                self.npcs_loading = false;
                match result {
                    Ok(list) => self.session.apply_npcs(list),
                    Err(e) => self.notice.error(format!(
                        "Failed to refresh visible NPCs. Please try again. ({e})"
                    )),
                }
            }
            EngineResponse::Pending { ticket, result } => {
                self.session.poller.on_result(ticket, result, now)
            }
            EngineResponse::AdminDone { action, result } => self.admin.finish(action, result),
            other => debug!("game screen ignoring {other:?}"),
        }
    }

    pub fn show(&mut self, ctx: &egui::Context, settings: &AppSettings) {
        panels::draw_header(ctx, self);
        panels::draw_sidebar(ctx, self);
        panels::draw_dm_chat(ctx, self, settings);
        panels::draw_main_window(ctx, self, settings);

        if let Some(action) = self.admin.show(ctx) {
            self.run_admin(action);
        }
        self.notice.show(ctx);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::error::GatewayError;
    use crate::engine::protocol::GameSnapshot;
    use crate::engine::wire::{PromptType, UserInputRequest};
    use crate::model::npc::Npc;
    use crate::model::player::PlayerInfo;

    fn aria() -> Npc {
        Npc {
            id: "npc_aria".into(),
            name: "Aria".into(),
            ..Npc::default()
        }
    }

    fn loaded(now: Instant) -> GameScreen {
        let mut g = GameScreen::new("g1", Duration::from_secs(1));
        assert_eq!(
            g.effects.drain_commands(),
            vec![EngineCommand::LoadGame {
                game_id: "g1".into()
            }]
        );
        g.handle(
            EngineResponse::GameLoaded(Ok(Box::new(GameSnapshot {
                player: PlayerInfo::default(),
                npcs: vec![aria()],
                inventory: Vec::new(),
            }))),
            now,
        );
        g
    }

    fn sent_request(g: &mut GameScreen) -> UserInputRequest {
        match g.effects.drain_commands().as_slice() {
            [EngineCommand::SendInput(req)] => req.clone(),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn missing_game_id_reports_error_without_loading() {
        let mut g = GameScreen::new("", Duration::from_secs(1));
        assert!(g.effects.drain_commands().is_empty());
        assert!(g.notice.text().unwrap().contains("Game ID is missing"));
    }

    #[test]
    fn npc_message_is_trimmed_before_sending() {
        let now = Instant::now();
        let mut g = loaded(now);
        g.npc_input = " heal me ".into();
        g.send(ChatTarget::SelectedNpc);

        let req = sent_request(&mut g);
        assert_eq!(req.user_input, "heal me");
        assert_eq!(req.prompt_type, PromptType::Npc);
        assert_eq!(req.npc_id.as_deref(), Some("npc_aria"));
        assert!(g.npc_input.is_empty());
        assert!(g.npc_busy);
    }

    #[test]
    fn blank_message_sends_nothing_and_appends_nothing() {
        let now = Instant::now();
        let mut g = loaded(now);
        g.npc_input = "   ".into();
        g.send(ChatTarget::SelectedNpc);
        assert!(g.effects.drain_commands().is_empty());
        assert!(g.session().transcript("npc_aria").is_empty());
        assert!(g.notice.text().is_none());
    }

    #[test]
    fn npc_chat_without_any_npc_raises_validation_error() {
        let now = Instant::now();
        let mut g = GameScreen::new("g1", Duration::from_secs(1));
        g.effects.drain_commands();
        g.handle(
            EngineResponse::GameLoaded(Ok(Box::new(GameSnapshot {
                player: PlayerInfo::default(),
                npcs: Vec::new(),
                inventory: Vec::new(),
            }))),
            now,
        );
        g.npc_input = "hello?".into();
        g.send(ChatTarget::SelectedNpc);
        assert!(g.effects.drain_commands().is_empty());
        assert_eq!(g.notice.text(), Some("No NPC selected for chat."));
    }

    #[test]
    fn successful_reply_appends_refreshes_and_starts_polling() {
        let now = Instant::now();
        let mut g = loaded(now);
        g.dm_input = "open the door".into();
        g.send(ChatTarget::DungeonMaster);
        let request = sent_request(&mut g);

        let newcomer = Npc {
            id: "npc_bo".into(),
            name: "Bo".into(),
            ..Npc::default()
        };
        g.handle(
            EngineResponse::InputAnswered {
                request,
                reply: Ok("The door creaks open.".into()),
                npcs: Some(Ok(vec![aria(), newcomer])),
            },
            now,
        );

        assert!(!g.dm_busy);
        assert_eq!(g.session().dm_transcript.len(), 2);
        assert_eq!(g.session().npcs.len(), 2);
        assert!(g.session().poller.is_pending());

        assert!(g.on_frame(now + Duration::from_millis(500)).is_some());
        assert!(g.effects.drain_commands().is_empty());
        g.on_frame(now + Duration::from_secs(1));
        assert!(matches!(
            g.effects.drain_commands().as_slice(),
            [EngineCommand::CheckPending { .. }]
        ));
    }

    #[test]
    fn failed_send_keeps_optimistic_line_and_does_not_poll() {
        let now = Instant::now();
        let mut g = loaded(now);
        g.dm_input = "jump".into();
        g.send(ChatTarget::DungeonMaster);
        let request = sent_request(&mut g);
        g.handle(
            EngineResponse::InputAnswered {
                request,
                reply: Err(GatewayError::Unreachable("refused".into())),
                npcs: None,
            },
            now,
        );
        assert_eq!(g.session().dm_transcript.len(), 1);
        assert!(!g.session().poller.is_active());
        assert!(g.notice.text().unwrap().contains("Failed to get response"));
    }

    #[test]
    fn pending_check_failure_stops_on_next_tick() {
        let now = Instant::now();
        let mut g = loaded(now);
        g.session.poller.start(now);
        g.on_frame(now + Duration::from_secs(1));
        let ticket = match g.effects.drain_commands().as_slice() {
            [EngineCommand::CheckPending { ticket, .. }] => *ticket,
            other => panic!("unexpected {other:?}"),
        };
        g.handle(
            EngineResponse::Pending {
                ticket,
                result: Err(GatewayError::Rejected {
                    status: 503,
                    body: String::new(),
                }),
            },
            now + Duration::from_secs(1),
        );
        assert!(!g.session().poller.is_pending());
        assert_eq!(g.on_frame(now + Duration::from_secs(5)), None);
        assert!(g.effects.drain_commands().is_empty());
    }

    #[test]
    fn teardown_cancels_polling() {
        let now = Instant::now();
        let mut g = loaded(now);
        g.session.poller.start(now);
        g.teardown();
        g.teardown();
        assert!(!g.session().poller.is_active());
        assert_eq!(g.on_frame(now + Duration::from_secs(3)), None);
        assert!(g.effects.drain_commands().is_empty());
    }

    #[test]
    fn npc_refresh_is_not_duplicated_while_loading() {
        let now = Instant::now();
        let mut g = loaded(now);
        g.refresh_npcs();
        g.refresh_npcs();
        assert_eq!(g.effects.drain_commands().len(), 1);
        g.handle(EngineResponse::Npcs(Ok(Vec::new())), now);
        g.refresh_npcs();
        assert_eq!(g.effects.drain_commands().len(), 1);
    }

    #[test]
    fn admin_actions_run_one_at_a_time() {
        let now = Instant::now();
        let mut g = loaded(now);
        g.run_admin(AdminAction::Validate);
        g.run_admin(AdminAction::AutocreateDangling);
        assert_eq!(
            g.effects.drain_commands(),
            vec![EngineCommand::Admin {
                game_id: "g1".into(),
                action: AdminAction::Validate
            }]
        );
        g.handle(
            EngineResponse::AdminDone {
                action: AdminAction::Validate,
                result: Ok("0 dangling references".into()),
            },
            now,
        );
        assert_eq!(g.admin.result(), Some("0 dangling references"));
    }
}
