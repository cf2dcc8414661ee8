use crate::engine::error::GatewayError;
use crate::engine::poller::PollTicket;
use crate::engine::wire::{AdminAction, CreateCharacterRequest, CreateGameRequest, UserInputRequest};
use crate::model::inventory::InventoryItem;
use crate::model::npc::Npc;
use crate::model::player::PlayerInfo;
use crate::model::scenario::{Game, Scenario};

/// Identifies the screen instance that issued a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScreenId(pub u64);

#[derive(Debug, Clone, PartialEq)]
pub enum EngineCommand {
    ListScenarios,
    ListGames,
    CreateGame(CreateGameRequest),
    CreateCharacter(CreateCharacterRequest),
    /// Player, visible NPCs and inventory, fetched together.
    LoadGame { game_id: String },
    /// Sends the input, then refreshes the visible NPCs.
    SendInput(UserInputRequest),
    RefreshNpcs { game_id: String },
    CheckPending { game_id: String, ticket: PollTicket },
    Admin { game_id: String, action: AdminAction },
}

impl EngineCommand {
    /// The response this command gets when it never reaches the backend.
    pub fn into_failure(self, error: GatewayError) -> EngineResponse {
        match self {
            EngineCommand::ListScenarios => EngineResponse::Scenarios(Err(error)),
            EngineCommand::ListGames => EngineResponse::Games(Err(error)),
            EngineCommand::CreateGame(_) => EngineResponse::GameCreated(Err(error)),
            EngineCommand::CreateCharacter(req) => EngineResponse::CharacterCreated {
                game_id: req.game_id,
                result: Err(error),
            },
            EngineCommand::LoadGame { .. } => EngineResponse::GameLoaded(Err(error)),
            EngineCommand::SendInput(request) => EngineResponse::InputAnswered {
                request,
                reply: Err(error),
                npcs: None,
            },
            EngineCommand::RefreshNpcs { .. } => EngineResponse::Npcs(Err(error)),
            EngineCommand::CheckPending { ticket, .. } => EngineResponse::Pending {
                ticket,
                result: Err(error),
            },
            EngineCommand::Admin { action, .. } => EngineResponse::AdminDone {
                action,
                result: Err(error),
            },
        }
    }
}

#[derive(Debug)]
pub struct GameSnapshot {
    pub player: PlayerInfo,
    pub npcs: Vec<Npc>,
    pub inventory: Vec<InventoryItem>,
}

#[derive(Debug)]
pub enum EngineResponse {
    Scenarios(Result<Vec<Scenario>, GatewayError>),
    Games(Result<Vec<Game>, GatewayError>),
    GameCreated(Result<String, GatewayError>),
    CharacterCreated {
        game_id: String,
        result: Result<(), GatewayError>,
    },
    GameLoaded(Result<Box<GameSnapshot>, GatewayError>),
    InputAnswered {
        request: UserInputRequest,
        reply: Result<String, GatewayError>,
        /// Absent when the send itself failed.
        npcs: Option<Result<Vec<Npc>, GatewayError>>,
    },
    Npcs(Result<Vec<Npc>, GatewayError>),
    Pending {
        ticket: PollTicket,
        result: Result<bool, GatewayError>,
    },
    AdminDone {
        action: AdminAction,
        result: Result<String, GatewayError>,
    },
}

#[derive(Debug)]
pub struct Envelope {
    pub origin: ScreenId,
    pub command: EngineCommand,
}

#[derive(Debug)]
pub struct Reply {
    pub origin: ScreenId,
    pub response: EngineResponse,
}
