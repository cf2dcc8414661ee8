use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::thread::ScopedJoinHandle;

use log::{debug, error, info};

use crate::engine::api_client::GameBackend;
use crate::engine::error::GatewayError;
use crate::engine::protocol::{EngineCommand, EngineResponse, Envelope, GameSnapshot, Reply};

pub type Notify = Box<dyn Fn() + Send>;

/// Worker that performs backend calls off the UI thread, one command at a time.
pub struct Engine {
    rx: Receiver<Envelope>,
    tx: Sender<Reply>,
    backend: Arc<dyn GameBackend>,
    notify: Notify,
}

/// The UI side of the channels to a running [`Engine`].
pub struct EngineLink {
    pub commands: Sender<Envelope>,
    pub replies: Receiver<Reply>,
}

impl Engine {
    pub fn new(
        rx: Receiver<Envelope>,
        tx: Sender<Reply>,
        backend: Arc<dyn GameBackend>,
        notify: Notify,
    ) -> Self {
        Self {
            rx,
            tx,
            backend,
            notify,
        }
    }

    /// Start a worker thread. It exits once every command sender is dropped.
    pub fn spawn(backend: Arc<dyn GameBackend>, notify: Notify) -> std::io::Result<EngineLink> {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (reply_tx, reply_rx) = mpsc::channel();

        std::thread::Builder::new()
            .name("rpg-engine".into())
            .spawn(move || {
                let mut engine = Engine::new(cmd_rx, reply_tx, backend, notify);
                engine.run();
            })?;

        Ok(EngineLink {
            commands: cmd_tx,
            replies: reply_rx,
        })
    }

    pub fn run(&mut self) {
        while let Ok(Envelope { origin, command }) = self.rx.recv() {
            let response = self.handle(command);
            if self.tx.send(Reply { origin, response }).is_err() {
                break;
            }
            (self.notify)();
        }
        info!("engine stopped");
    }

    fn handle(&self, command: EngineCommand) -> EngineResponse {
        let backend = self.backend.as_ref();
        debug!("engine: {command:?}");

        match command {
            EngineCommand::ListScenarios => EngineResponse::Scenarios(backend.list_scenarios()),
            EngineCommand::ListGames => EngineResponse::Games(backend.list_games()),
            EngineCommand::CreateGame(req) => EngineResponse::GameCreated(backend.create_game(&req)),
            EngineCommand::CreateCharacter(req) => EngineResponse::CharacterCreated {
                result: backend.create_character(&req),
                game_id: req.game_id,
            },
            EngineCommand::LoadGame { game_id } => {
                EngineResponse::GameLoaded(load_game(backend, &game_id).map(Box::new))
            }
            EngineCommand::SendInput(request) => {
                let reply = backend.send_input(&request);
                let npcs = reply
                    .is_ok()
                    .then(|| backend.visible_npcs(&request.game_id));
                EngineResponse::InputAnswered {
                    request,
                    reply,
                    npcs,
                }
            }
            EngineCommand::RefreshNpcs { game_id } => {
                EngineResponse::Npcs(backend.visible_npcs(&game_id))
            }
            EngineCommand::CheckPending { game_id, ticket } => EngineResponse::Pending {
                ticket,
                result: backend.has_pending_entities(&game_id),
            },
            EngineCommand::Admin { game_id, action } => EngineResponse::AdminDone {
                action,
                result: backend.admin(&game_id, action),
            },
        }
    }
}

/// Fetch the three session snapshots concurrently and wait for all of them.
fn load_game(backend: &dyn GameBackend, game_id: &str) -> Result<GameSnapshot, GatewayError> {
    std::thread::scope(|s| {
        let player = s.spawn(move || backend.player_info(game_id));
        let npcs = s.spawn(move || backend.visible_npcs(game_id));
        let inventory = s.spawn(move || backend.inventory(game_id));

        Ok(GameSnapshot {
            player: join(player)?,
            npcs: join(npcs)?,
            inventory: join(inventory)?,
        })
    })
}

fn join<T>(handle: ScopedJoinHandle<'_, Result<T, GatewayError>>) -> Result<T, GatewayError> {
    handle.join().unwrap_or_else(|_| {
        error!("fetch thread panicked");
        Err(GatewayError::Request("fetch thread panicked".into()))
    })
}
