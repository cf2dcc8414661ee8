use chrono::{DateTime, Local};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Speaker {
    Player,
    DungeonMaster,
    Npc { id: String, name: String },
}

impl Speaker {
    pub fn label(&self) -> &str {
        match self {
            Speaker::Player => "You",
            Speaker::DungeonMaster => "Dungeon Master",
            Speaker::Npc { name, .. } if !name.is_empty() => name,
            Speaker::Npc { .. } => "NPC",
        }
    }
}

/// A single chat line. Transcripts keep these in insertion order.
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    pub speaker: Speaker,
    pub text: String,
    pub timestamp: Option<DateTime<Local>>,
}

impl Message {
    pub fn player(text: impl Into<String>) -> Self {
        Self::now(Speaker::Player, text)
    }

    pub fn dungeon_master(text: impl Into<String>) -> Self {
        Self::now(Speaker::DungeonMaster, text)
    }

    pub fn npc(id: impl Into<String>, name: impl Into<String>, text: impl Into<String>) -> Self {
        Self::now(
            Speaker::Npc {
                id: id.into(),
                name: name.into(),
            },
            text,
        )
    }

    fn now(speaker: Speaker, text: impl Into<String>) -> Self {
        Self {
            speaker,
            text: text.into(),
            timestamp: Some(Local::now()),
        }
    }

    pub fn is_player(&self) -> bool {
        self.speaker == Speaker::Player
    }
}
