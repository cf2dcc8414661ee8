use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::model::message::Message;
use crate::model::null_default;

/// Key the backend uses for the player's side of a logged exchange.
pub const PLAYER_LOG_KEY: &str = "Player";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Npc {
    pub id: String,
    #[serde(default, deserialize_with = "null_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_default")]
    pub is_visible: bool,
    #[serde(default, deserialize_with = "null_default")]
    pub is_discovered: bool,
    #[serde(default)]
    pub relationships: Value,

    /// Each entry maps `"Player"` and the NPC's name to what they said.
    #[serde(default, deserialize_with = "null_default")]
    pub conversation_log: Vec<Map<String, Value>>,
}

impl Npc {
    pub fn initial(&self) -> String {
        self.name
            .chars()
            .next()
            .map(|c| c.to_uppercase().collect())
            .unwrap_or_else(|| "?".into())
    }

    /// Build the opening transcript from the server-side conversation log.
    ///
    /// An entry contributes its player line and then the NPC's reply when one is
    /// present. An unanswered entry whose player line is repeated by the entry right
    /// after it is the same turn recorded before the reply arrived, so it is folded
    /// into that later entry instead of producing a duplicate line.
    pub fn seed_transcript(&self) -> Vec<Message> {
        let mut out = Vec::new();
        let log = &self.conversation_log;

        for (i, entry) in log.iter().enumerate() {
            let player = log_text(entry, PLAYER_LOG_KEY);
            let reply = log_text(entry, &self.name);

            if reply.is_none() {
                if let (Some(p), Some(next)) = (player, log.get(i + 1)) {
                    if log_text(next, PLAYER_LOG_KEY) == Some(p) {
                        continue;
                    }
                }
            }

            if let Some(p) = player {
                out.push(Message::player(p));
            }
            if let Some(r) = reply {
                out.push(Message::npc(&self.id, &self.name, r));
            }
        }

        out
    }
}

fn log_text<'a>(entry: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    entry
        .get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
}
