use std::collections::HashMap;
use std::time::Duration;

use crate::engine::error::GatewayError;
use crate::engine::poller::PendingPoller;
use crate::engine::protocol::GameSnapshot;
use crate::engine::wire::{PromptType, UserInputRequest};
use crate::model::inventory::InventoryItem;
use crate::model::message::Message;
use crate::model::npc::Npc;
use crate::model::player::PlayerInfo;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MainView {
    NpcChat,
    Inventory,
    Character,
}

/// Which chat box an input came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatTarget {
    DungeonMaster,
    /// The currently selected NPC.
    SelectedNpc,
}

impl From<PromptType> for ChatTarget {
    fn from(p: PromptType) -> Self {
        match p {
            PromptType::DungeonMaster => ChatTarget::DungeonMaster,
            PromptType::Npc => ChatTarget::SelectedNpc,
        }
    }
}

/// Everything the game screen knows about one session. Dropped with the screen.
#[derive(Debug)]
pub struct GameSession {
    game_id: String,
    pub player: Option<PlayerInfo>,
    pub npcs: Vec<Npc>,
    pub inventory: Vec<InventoryItem>,
    pub dm_transcript: Vec<Message>,
    /// One transcript per NPC id, kept for the whole session.
    transcripts: HashMap<String, Vec<Message>>,
    selected_npc: Option<String>,
    pub view: MainView,
    pub poller: PendingPoller,
}

impl GameSession {
    pub fn new(game_id: impl Into<String>, poll_interval: Duration) -> Self {
        Self {
            game_id: game_id.into(),
            player: None,
            npcs: Vec::new(),
            inventory: Vec::new(),
            dm_transcript: Vec::new(),
            transcripts: HashMap::new(),
            selected_npc: None,
            view: MainView::NpcChat,
            poller: PendingPoller::new(poll_interval),
        }
    }

    pub fn game_id(&self) -> &str {
        &self.game_id
    }

    pub fn title(&self) -> String {
        match &self.player {
            Some(p) if !p.name.is_empty() => format!("{}'s Adventure", p.name),
            _ => format!("Game #{}", self.game_id),
        }
    }

    pub fn apply_snapshot(&mut self, snapshot: GameSnapshot) {
        self.player = Some(snapshot.player);
        self.inventory = snapshot.inventory;
        self.apply_npcs(snapshot.npcs);
    }

    /// Replace the visible NPC list. Newly seen NPCs get a transcript seeded from
    /// their conversation log; existing transcripts are left alone.
    pub fn apply_npcs(&mut self, npcs: Vec<Npc>) {
        for npc in &npcs {
            self.transcripts
                .entry(npc.id.clone())
                .or_insert_with(|| npc.seed_transcript());
        }
        self.npcs = npcs;

        let still_visible = self
            .selected_npc
            .as_ref()
            .is_some_and(|id| self.npcs.iter().any(|n| &n.id == id));
        if !still_visible {
            let had_selection = self.selected_npc.is_some();
            self.selected_npc = self.npcs.first().map(|n| n.id.clone());
            if !had_selection && self.selected_npc.is_some() {
                self.view = MainView::NpcChat;
            }
        }
    }

    pub fn select_npc(&mut self, npc_id: &str) {
        if self.npcs.iter().any(|n| n.id == npc_id) {
            self.selected_npc = Some(npc_id.to_string());
            self.view = MainView::NpcChat;
        }
    }

    pub fn selected_npc(&self) -> Option<&Npc> {
        let id = self.selected_npc.as_deref()?;
        self.npcs.iter().find(|n| n.id == id)
    }

    pub fn transcript(&self, npc_id: &str) -> &[Message] {
        self.transcripts.get(npc_id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Validate and trim an input line, append it to the right transcript and build
    /// the request. `Ok(None)` means there was nothing to send.
    pub fn prepare_send(
        &mut self,
        target: ChatTarget,
        raw: &str,
    ) -> Result<Option<UserInputRequest>, GatewayError> {
        if self.game_id.is_empty() {
            return Err(GatewayError::validation(
                "Game ID is missing. Please return to the title screen.",
            ));
        }
        let npc_id = match target {
            ChatTarget::DungeonMaster => None,
            ChatTarget::SelectedNpc => match self.selected_npc() {
                Some(npc) => Some(npc.id.clone()),
                None => return Err(GatewayError::validation("No NPC selected for chat.")),
            },
        };

        let text = raw.trim();
        if text.is_empty() {
            return Ok(None);
        }

        let request = match npc_id {
            Some(id) => {
                self.transcripts
                    .entry(id.clone())
                    .or_default()
                    .push(Message::player(text));
                UserInputRequest::to_npc(&self.game_id, text, Some(id))
            }
            None => {
                self.dm_transcript.push(Message::player(text));
                UserInputRequest::to_dungeon_master(&self.game_id, text)
            }
        };
        Ok(Some(request))
    }

    /// Append the backend's answer to the conversation the request came from.
    pub fn record_reply(&mut self, request: &UserInputRequest, reply: String) {
        match (request.prompt_type, request.npc_id.as_deref()) {
            (PromptType::Npc, Some(id)) => {
                let name = self
                    .npcs
                    .iter()
                    .find(|n| n.id == id)
                    .map(|n| n.name.clone())
                    .unwrap_or_default();
                self.transcripts
                    .entry(id.to_string())
                    .or_default()
                    .push(Message::npc(id, name, reply));
            }
            _ => self.dm_transcript.push(Message::dungeon_master(reply)),
        }
    }
}
