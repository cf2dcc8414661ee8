use serde::{Deserialize, Serialize};

use crate::model::null_default;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameSetting {
    #[serde(default, deserialize_with = "null_default")]
    pub genre: String,
    #[serde(default, deserialize_with = "null_default")]
    pub theme: String,
    #[serde(default, deserialize_with = "null_default")]
    pub description: String,
}

/// Player-chosen knobs sent along with `createGame`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GamePreferences {
    #[serde(deserialize_with = "null_default")]
    pub tone: String,
    #[serde(deserialize_with = "null_default")]
    pub complexity: String,
    #[serde(deserialize_with = "null_default")]
    pub age_appropriateness: String,
}

impl Default for GamePreferences {
    fn default() -> Self {
        Self {
            tone: "neutral".into(),
            complexity: "medium".into(),
            age_appropriateness: "teen".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scenario {
    pub scenario_id: String,
    #[serde(default, deserialize_with = "null_default")]
    pub name: String,
    #[serde(default)]
    pub game_setting: Option<GameSetting>,
    #[serde(default)]
    pub game_preferences: Option<GamePreferences>,
}

/// Saved game summary as listed on the title screen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Game {
    pub game_id: String,
    #[serde(default, deserialize_with = "null_default")]
    pub name: String,
    #[serde(default)]
    pub player_name: Option<String>,
    #[serde(default)]
    pub player_location: Option<String>,
}
