use std::time::Duration;

use log::{debug, warn};
use reqwest::blocking::{Client, RequestBuilder};
use reqwest::Url;
use serde::de::DeserializeOwned;

use crate::engine::error::GatewayError;
use crate::engine::wire::{
    normalize_reply, AdminAction, CreateCharacterRequest, CreateGameRequest, CreateGameResponse,
    UserInputRequest,
};
use crate::model::inventory::InventoryItem;
use crate::model::npc::Npc;
use crate::model::player::PlayerInfo;
use crate::model::scenario::{Game, Scenario};

/// One method per game-service operation. Implementations hold no session state.
pub trait GameBackend: Send + Sync {
    fn list_scenarios(&self) -> Result<Vec<Scenario>, GatewayError>;
    fn list_games(&self) -> Result<Vec<Game>, GatewayError>;
    fn create_game(&self, req: &CreateGameRequest) -> Result<String, GatewayError>;
    fn create_character(&self, req: &CreateCharacterRequest) -> Result<(), GatewayError>;
    fn send_input(&self, req: &UserInputRequest) -> Result<String, GatewayError>;
    fn player_info(&self, game_id: &str) -> Result<PlayerInfo, GatewayError>;
    fn visible_npcs(&self, game_id: &str) -> Result<Vec<Npc>, GatewayError>;
    fn inventory(&self, game_id: &str) -> Result<Vec<InventoryItem>, GatewayError>;
    fn has_pending_entities(&self, game_id: &str) -> Result<bool, GatewayError>;
    fn admin(&self, game_id: &str, action: AdminAction) -> Result<String, GatewayError>;
}

pub struct HttpGateway {
    client: Client,
    base: Url,
}

impl HttpGateway {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, GatewayError> {
        let base = Url::parse(base_url)
            .map_err(|e| GatewayError::Request(format!("invalid base URL '{base_url}': {e}")))?;
        if base.cannot_be_a_base() {
            return Err(GatewayError::Request(format!(
                "base URL '{base_url}' cannot carry a path"
            )));
        }
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self { client, base })
    }

    pub fn base_url(&self) -> &str {
        self.base.as_str()
    }

    fn url(&self, segments: &[&str], query: &[(&str, &str)]) -> Result<Url, GatewayError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| GatewayError::Request("base URL cannot carry a path".into()))?
            .pop_if_empty()
            .extend(segments);
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }
        Ok(url)
    }

    fn execute(&self, what: &str, req: RequestBuilder) -> Result<String, GatewayError> {
        debug!("-> {what}");
        let resp = req.send().map_err(|e| {
            warn!("{what} failed: {e}");
            GatewayError::from(e)
        })?;
        let status = resp.status().as_u16();
        let body = resp.text()?;
        check_status(status, body).inspect_err(|e| warn!("{what}: {e}"))
    }

    fn get_json<T: DeserializeOwned>(
        &self,
        segments: &[&str],
        query: &[(&str, &str)],
    ) -> Result<T, GatewayError> {
        let url = self.url(segments, query)?;
        let what = format!("GET {}", url.path());
        let body = self.execute(&what, self.client.get(url))?;
        decode(&body)
    }
}

impl GameBackend for HttpGateway {
    fn list_scenarios(&self) -> Result<Vec<Scenario>, GatewayError> {
        self.get_json(&["scenarios"], &[])
    }

    fn list_games(&self) -> Result<Vec<Game>, GatewayError> {
        self.get_json(&["listGames"], &[])
    }

    fn create_game(&self, req: &CreateGameRequest) -> Result<String, GatewayError> {
        if req.scenario_id.trim().is_empty() {
            return Err(GatewayError::validation("Please select a scenario first."));
        }
        let url = self.url(&["createGame"], &[])?;
        let body = self.execute("POST createGame", self.client.post(url).json(req))?;
        let resp: CreateGameResponse = decode(&body)?;
        Ok(resp.game_id)
    }

    fn create_character(&self, req: &CreateCharacterRequest) -> Result<(), GatewayError> {
        if req.game_id.is_empty() {
            return Err(GatewayError::validation("Game ID is missing."));
        }
        let url = self.url(&["createCharacter"], &[])?;
        self.execute("POST createCharacter", self.client.post(url).json(req))?;
        Ok(())
    }

    fn send_input(&self, req: &UserInputRequest) -> Result<String, GatewayError> {
        req.validate()?;
        let url = self.url(&["input"], &[])?;
        let body = self.execute("POST input", self.client.post(url).json(req))?;
        Ok(normalize_reply(&body))
    }

    fn player_info(&self, game_id: &str) -> Result<PlayerInfo, GatewayError> {
        self.get_json::<Option<PlayerInfo>>(&["player"], &[("gameId", game_id)])
            .map(Option::unwrap_or_default)
    }

    fn visible_npcs(&self, game_id: &str) -> Result<Vec<Npc>, GatewayError> {
        self.get_json::<Option<Vec<Npc>>>(&["visibleNpcs"], &[("gameId", game_id)])
            .map(Option::unwrap_or_default)
    }

    fn inventory(&self, game_id: &str) -> Result<Vec<InventoryItem>, GatewayError> {
        self.get_json::<Option<Vec<InventoryItem>>>(&["inventory"], &[("gameId", game_id)])
            .map(Option::unwrap_or_default)
    }

    fn has_pending_entities(&self, game_id: &str) -> Result<bool, GatewayError> {
        self.get_json(&["pending", game_id], &[])
    }

    fn admin(&self, game_id: &str, action: AdminAction) -> Result<String, GatewayError> {
        let url = self.url(&[game_id, action.segment()], &[])?;
        let what = format!("admin {}", url.path());
        let req = if action.is_post() {
            self.client.post(url)
        } else {
            self.client.get(url)
        };
        let body = self.execute(&what, req)?;
        Ok(normalize_reply(&body))
    }
}

fn check_status(status: u16, body: String) -> Result<String, GatewayError> {
    if (200..300).contains(&status) {
        Ok(body)
    } else {
        Err(GatewayError::Rejected { status, body })
    }
}

fn decode<T: DeserializeOwned>(body: &str) -> Result<T, GatewayError> {
    Ok(serde_json::from_str(body)?)
}
