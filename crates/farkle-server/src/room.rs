//! Game room management.
//!
//! A room owns one engine instance. Transitions go through the room while
//! the caller holds the room's map entry, so exactly one transition is in
//! flight at a time.

use farkle_core::{GameAction, GameEvent, GameState};
use std::collections::HashMap;
use thiserror::Error;
use uuid::Uuid;

use crate::protocol::{PlayerInfo, RoomInfo, RoomStatus};

/// Farkle plays fine at a large table, but cap rooms somewhere sensible
const MAX_ROOM_PLAYERS: u8 = 8;

#[derive(Debug, Error)]
pub enum RoomError {
    #[error("Room is full")]
    RoomFull,

    #[error("Player not in room")]
    PlayerNotInRoom,

    #[error("Not the host")]
    NotHost,

    #[error("Game already started")]
    GameAlreadyStarted,

    #[error("Not enough players")]
    NotEnoughPlayers,

    #[error("Game not started")]
    GameNotStarted,

    #[error("Not your turn")]
    NotYourTurn,

    #[error("Invalid action: {0}")]
    InvalidAction(String),
}

/// A player in a game room.
#[derive(Debug, Clone)]
pub struct RoomPlayer {
    pub id: Uuid,
    pub name: String,
    pub ready: bool,
    pub connected: bool,
    /// Seat in the game's turn order, assigned when the game starts
    pub game_index: Option<usize>,
}

impl RoomPlayer {
    pub fn new(id: Uuid, name: String) -> Self {
        Self {
            id,
            name,
            ready: false,
            connected: true,
            game_index: None,
        }
    }

    pub fn to_info(&self) -> PlayerInfo {
        PlayerInfo {
            id: self.id,
            name: self.name.clone(),
            ready: self.ready,
            connected: self.connected,
        }
    }
}

/// A game room that can hold multiple players.
pub struct GameRoom {
    pub id: Uuid,
    pub name: String,
    pub max_players: u8,
    pub host_id: Uuid,
    pub status: RoomStatus,
    pub players: HashMap<Uuid, RoomPlayer>,
    /// Order of players for turn taking
    pub player_order: Vec<Uuid>,
    /// The game state (once started)
    pub game: Option<GameState>,
}

impl GameRoom {
    pub fn new(id: Uuid, host_id: Uuid, host_name: String, max_players: u8) -> Self {
        let mut players = HashMap::new();
        players.insert(host_id, RoomPlayer::new(host_id, host_name.clone()));

        Self {
            id,
            name: format!("{}'s Game", host_name),
            max_players: max_players.clamp(2, MAX_ROOM_PLAYERS),
            host_id,
            status: RoomStatus::Waiting,
            players,
            player_order: vec![host_id],
            game: None,
        }
    }

    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    pub fn is_full(&self) -> bool {
        self.players.len() >= self.max_players as usize
    }

    pub fn add_player(&mut self, player_id: Uuid, name: String) -> Result<(), RoomError> {
        if self.status != RoomStatus::Waiting {
            return Err(RoomError::GameAlreadyStarted);
        }
        if self.is_full() {
            return Err(RoomError::RoomFull);
        }

        self.players.insert(player_id, RoomPlayer::new(player_id, name));
        self.player_order.push(player_id);
        Ok(())
    }

    pub fn remove_player(&mut self, player_id: Uuid) -> Result<bool, RoomError> {
        if !self.players.contains_key(&player_id) {
            return Err(RoomError::PlayerNotInRoom);
        }

        self.players.remove(&player_id);
        self.player_order.retain(|&id| id != player_id);

        // If host left, assign new host
        if player_id == self.host_id && !self.player_order.is_empty() {
            self.host_id = self.player_order[0];
        }

        // Return true if room is now empty
        Ok(self.players.is_empty())
    }

    pub fn set_player_connected(&mut self, player_id: Uuid, connected: bool) {
        if let Some(player) = self.players.get_mut(&player_id) {
            player.connected = connected;
        }
    }

    pub fn start_game(&mut self, requester_id: Uuid) -> Result<(), RoomError> {
        if requester_id != self.host_id {
            return Err(RoomError::NotHost);
        }
        if self.status != RoomStatus::Waiting {
            return Err(RoomError::GameAlreadyStarted);
        }
        if self.players.len() < 2 {
            return Err(RoomError::NotEnoughPlayers);
        }

        // Assign seats to players in join order
        for (idx, &player_id) in self.player_order.iter().enumerate() {
            if let Some(player) = self.players.get_mut(&player_id) {
                player.game_index = Some(idx);
            }
        }

        let player_names: Vec<String> = self
            .player_order
            .iter()
            .filter_map(|id| self.players.get(id).map(|p| p.name.clone()))
            .collect();

        let mut game = GameState::new();
        game.apply_action(GameAction::StartGame { player_names })
            .map_err(|e| RoomError::InvalidAction(e.to_string()))?;

        self.game = Some(game);
        self.status = RoomStatus::InGame;

        Ok(())
    }

    /// Return the room to the lobby, discarding the game (host only)
    pub fn reset_game(&mut self, requester_id: Uuid) -> Result<(), RoomError> {
        if requester_id != self.host_id {
            return Err(RoomError::NotHost);
        }

        self.game = None;
        self.status = RoomStatus::Waiting;
        for player in self.players.values_mut() {
            player.game_index = None;
        }

        Ok(())
    }

    pub fn apply_action(
        &mut self,
        player_id: Uuid,
        action: serde_json::Value,
    ) -> Result<Vec<GameEvent>, RoomError> {
        let game = self.game.as_mut().ok_or(RoomError::GameNotStarted)?;

        let player = self
            .players
            .get(&player_id)
            .ok_or(RoomError::PlayerNotInRoom)?;

        let game_index = player.game_index.ok_or(RoomError::PlayerNotInRoom)?;

        let action: GameAction = serde_json::from_value(action)
            .map_err(|e| RoomError::InvalidAction(e.to_string()))?;

        // The room owns the roster and the game lifecycle; lobby and
        // management actions don't go through this channel
        if matches!(
            action,
            GameAction::StartGame { .. } | GameAction::JoinGame { .. } | GameAction::ResetGame
        ) {
            return Err(RoomError::InvalidAction(
                "action is managed by the room".to_string(),
            ));
        }

        if game.current_player_index != game_index {
            return Err(RoomError::NotYourTurn);
        }

        game.apply_action(action)
            .map_err(|e| RoomError::InvalidAction(e.to_string()))
    }

    pub fn get_game_state(&self) -> Option<serde_json::Value> {
        self.game.as_ref().map(|g| serde_json::to_value(g).unwrap())
    }

    pub fn get_valid_actions(&self) -> Option<Vec<serde_json::Value>> {
        self.game.as_ref().map(|g| {
            g.valid_actions()
                .into_iter()
                .map(|a| serde_json::to_value(a).unwrap())
                .collect()
        })
    }

    pub fn get_current_player(&self) -> Option<usize> {
        self.game.as_ref().map(|g| g.current_player_index)
    }

    pub fn to_info(&self) -> RoomInfo {
        RoomInfo {
            id: self.id,
            name: self.name.clone(),
            players: self
                .player_order
                .iter()
                .filter_map(|id| self.players.get(id).map(|p| p.to_info()))
                .collect(),
            max_players: self.max_players,
            host_id: self.host_id,
            status: self.status,
        }
    }
}
