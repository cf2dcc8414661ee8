//! Request and response payloads in the backend's JSON shape.
//!
//! Field casing here is dictated by the game service and is not uniform
//! (`scenarioId` next to `Preferences`, PascalCase on `/input`).

use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;

use crate::engine::error::GatewayError;
use crate::model::scenario::GamePreferences;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreateGameRequest {
    #[serde(rename = "scenarioId")]
    pub scenario_id: String,
    #[serde(rename = "Preferences")]
    pub preferences: GamePreferences,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateGameResponse {
    pub game_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCharacterRequest {
    pub game_id: String,
    pub character_description: String,
}

/// Who an input line is addressed to. Sent as the backend's numeric enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptType {
    DungeonMaster = 0,
    Npc = 1,
}

impl Serialize for PromptType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(*self as u8)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct UserInputRequest {
    pub game_id: String,
    pub user_input: String,
    pub prompt_type: PromptType,
    /// Always serialized; `null` for the dungeon master.
    pub npc_id: Option<String>,
}

impl UserInputRequest {
    pub fn to_dungeon_master(game_id: impl Into<String>, input: impl Into<String>) -> Self {
        Self {
            game_id: game_id.into(),
            user_input: input.into(),
            prompt_type: PromptType::DungeonMaster,
            npc_id: None,
        }
    }

    pub fn to_npc(
        game_id: impl Into<String>,
        input: impl Into<String>,
        npc_id: Option<String>,
    ) -> Self {
        Self {
            game_id: game_id.into(),
            user_input: input.into(),
            prompt_type: PromptType::Npc,
            npc_id,
        }
    }

    /// Checked before anything goes over the wire.
    pub fn validate(&self) -> Result<(), GatewayError> {
        if self.game_id.trim().is_empty() {
            return Err(GatewayError::validation("Game ID is missing."));
        }
        if self.user_input.trim().is_empty() {
            return Err(GatewayError::validation("Cannot send an empty message."));
        }
        match (self.prompt_type, self.npc_id.as_deref()) {
            (PromptType::Npc, None) | (PromptType::Npc, Some("")) => Err(
                GatewayError::validation("A message to a character needs the character's id."),
            ),
            _ => Ok(()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminAction {
    Validate,
    AutocreateDangling,
    SyncNpcLocations,
}

impl AdminAction {
    pub const ALL: [AdminAction; 3] = [
        AdminAction::Validate,
        AdminAction::AutocreateDangling,
        AdminAction::SyncNpcLocations,
    ];

    pub fn label(self) -> &'static str {
        match self {
            AdminAction::Validate => "Validate Game Data",
            AdminAction::AutocreateDangling => "Autocreate Dangling References",
            AdminAction::SyncNpcLocations => "Sync NPC Locations",
        }
    }

    pub fn failure_text(self) -> &'static str {
        match self {
            AdminAction::Validate => "Error validating game data.",
            AdminAction::AutocreateDangling => "Error creating dangling references.",
            AdminAction::SyncNpcLocations => "Error syncing NPC locations.",
        }
    }

    pub(crate) fn is_post(self) -> bool {
        !matches!(self, AdminAction::Validate)
    }

    /// Last path segment; the game id goes in the segment before it.
    pub(crate) fn segment(self) -> &'static str {
        match self {
            AdminAction::Validate => "validate",
            AdminAction::AutocreateDangling => "autocreate-dangling",
            AdminAction::SyncNpcLocations => "sync-npc-locations",
        }
    }
}

/// Turn a free-form reply body into something a chat bubble can show.
pub fn normalize_reply(body: &str) -> String {
    match serde_json::from_str::<Value>(body) {
        Ok(Value::String(s)) => s,
        Ok(Value::Object(map)) => match map.get("response") {
            Some(Value::String(s)) => s.clone(),
            _ => Value::Object(map).to_string(),
        },
        Ok(other) => other.to_string(),
        Err(_) => body.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn create_game_body_matches_contract() {
        let req = CreateGameRequest {
            scenario_id: "forest-01".into(),
            preferences: GamePreferences {
                tone: "dark".into(),
                ..GamePreferences::default()
            },
        };
        assert_eq!(
            serde_json::to_value(&req).unwrap(),
            json!({
                "scenarioId": "forest-01",
                "Preferences": {
                    "tone": "dark",
                    "complexity": "medium",
                    "ageAppropriateness": "teen"
                }
            })
        );
    }

    #[test]
    fn dm_input_sends_explicit_null_npc_id() {
        let req = UserInputRequest::to_dungeon_master("g1", "look around");
        assert_eq!(
            serde_json::to_value(&req).unwrap(),
            json!({
                "GameId": "g1",
                "UserInput": "look around",
                "PromptType": 0,
                "NpcId": null
            })
        );
    }

    #[test]
    fn npc_input_carries_id() {
        let req = UserInputRequest::to_npc("g1", "heal me", Some("npc_7".into()));
        assert!(req.validate().is_ok());
        let v = serde_json::to_value(&req).unwrap();
        assert_eq!(v["PromptType"], json!(1));
        assert_eq!(v["NpcId"], json!("npc_7"));
    }

    #[test]
    fn npc_input_without_id_fails_validation() {
        assert!(UserInputRequest::to_npc("g1", "hi", None)
            .validate()
            .unwrap_err()
            .is_validation());
        assert!(UserInputRequest::to_npc("g1", "hi", Some(String::new()))
            .validate()
            .is_err());
    }

    #[test]
    fn reply_normalization() {
        assert_eq!(normalize_reply(r#""You enter the cave.""#), "You enter the cave.");
        assert_eq!(normalize_reply(r#"{"response":"Hello there"}"#), "Hello there");
        assert_eq!(normalize_reply(r#"{"other":1}"#), r#"{"other":1}"#);
        assert_eq!(normalize_reply("plain text reply"), "plain text reply");
        assert_eq!(normalize_reply("42"), "42");
    }

    #[test]
    fn admin_routes() {
        assert_eq!(AdminAction::Validate.segment(), "validate");
        assert!(!AdminAction::Validate.is_post());
        assert_eq!(AdminAction::SyncNpcLocations.segment(), "sync-npc-locations");
        assert!(AdminAction::AutocreateDangling.is_post());
    }
}
