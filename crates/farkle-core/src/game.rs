//! Core game state machine.
//!
//! This module contains the main `GameState` struct and all turn logic.
//! The state is mutated exclusively through [`GameState::apply_action`];
//! presentation layers read snapshots and never touch fields directly.

use crate::actions::{GameAction, GameEvent};
use crate::dice::{roll_dice, Die, DICE_PER_TURN};
use crate::player::Player;
use crate::scoring::score_dice;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;
use uuid::Uuid;

/// Game phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Waiting for players before the game starts
    Lobby,
    /// Current player must roll
    Rolling,
    /// A scoring roll is on the table; dice must be selected
    Selecting,
    /// Dice selected; bank the turn score or push your luck and re-roll
    Banking,
    /// The roll scored nothing; the turn's score is lost
    Farkle,
    /// Score banked; waiting for the turn to pass
    Ended,
}

/// Errors that can occur when applying actions
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum GameError {
    #[error("No players to start the game with")]
    NoPlayers,

    #[error("Game already started")]
    GameAlreadyStarted,

    #[error("Invalid action for current phase")]
    InvalidPhase,

    #[error("Selection must contain at least one die")]
    EmptySelection,

    #[error("Selected die is not part of the current roll")]
    UnknownDie,
}

/// The complete game state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    /// Unique game ID
    pub id: Uuid,
    /// All players in turn order
    pub players: Vec<Player>,
    /// Index of the player whose turn it is
    pub current_player_index: usize,
    /// The current roll: dice not yet set aside
    pub dice: Vec<Die>,
    /// Dice set aside as scoring material this turn
    pub kept: Vec<Die>,
    /// Score accumulated this turn, not yet banked
    pub turn_score: u32,
    /// Value of the full kept set already credited to `turn_score`;
    /// lets a later selection upgrade earlier kept dice (e.g. 5,5 into a triple)
    kept_score: u32,
    /// The current player's banked total, refreshed on banking and turn change
    pub banked_score: u32,
    /// Current game phase
    pub phase: GamePhase,
    /// Rolls taken this turn
    pub roll_count: u32,
    /// Face values of the most recent roll
    pub last_roll: Vec<u8>,
    /// Every die this turn contributed to scoring; a fresh six may be rolled
    pub hot_dice: bool,
}

impl GameState {
    /// Create an empty lobby
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            players: Vec::new(),
            current_player_index: 0,
            dice: Vec::new(),
            kept: Vec::new(),
            turn_score: 0,
            kept_score: 0,
            banked_score: 0,
            phase: GamePhase::Lobby,
            roll_count: 0,
            last_roll: Vec::new(),
            hot_dice: false,
        }
    }

    /// Get the number of players
    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    /// Get the player whose turn it is
    pub fn current_player(&self) -> Option<&Player> {
        self.players.get(self.current_player_index)
    }

    /// Read-only snapshot of the whole state
    pub fn snapshot(&self) -> GameState {
        self.clone()
    }

    /// Get all currently valid actions.
    ///
    /// Actions carrying a payload are returned with an empty placeholder;
    /// they indicate the action kind is legal, the actual validation
    /// happens in `apply_action`.
    pub fn valid_actions(&self) -> Vec<GameAction> {
        let mut actions = Vec::new();

        match self.phase {
            GamePhase::Lobby => {
                actions.push(GameAction::JoinGame {
                    player_name: String::new(),
                });
                actions.push(GameAction::StartGame {
                    player_names: Vec::new(),
                });
            }
            GamePhase::Rolling => {
                actions.push(GameAction::RollDice);
            }
            GamePhase::Selecting => {
                actions.push(GameAction::SelectDice {
                    die_ids: Vec::new(),
                });
            }
            GamePhase::Banking => {
                actions.push(GameAction::BankScore);
                // Push your luck: re-roll the dice that weren't kept
                actions.push(GameAction::RollDice);
            }
            GamePhase::Farkle | GamePhase::Ended => {
                actions.push(GameAction::EndTurn);
            }
        }

        // Legal from any phase
        actions.push(GameAction::ResetGame);

        actions
    }

    /// Apply an action to the game state.
    ///
    /// Rejected actions leave the state untouched.
    pub fn apply_action(&mut self, action: GameAction) -> Result<Vec<GameEvent>, GameError> {
        self.apply_action_with_rng(action, &mut rand::thread_rng())
    }

    /// Apply an action using the given randomness source (for seeded tests)
    pub fn apply_action_with_rng<R: Rng>(
        &mut self,
        action: GameAction,
        rng: &mut R,
    ) -> Result<Vec<GameEvent>, GameError> {
        match action {
            GameAction::StartGame { player_names } => self.start_game(player_names),
            GameAction::JoinGame { player_name } => self.join_game(player_name),
            GameAction::RollDice => self.roll(rng),
            GameAction::SelectDice { die_ids } => self.select_dice(&die_ids),
            GameAction::BankScore => self.bank_score(),
            GameAction::EndTurn => self.end_turn(),
            GameAction::ResetGame => {
                *self = GameState::new();
                Ok(vec![GameEvent::GameReset])
            }
        }
    }

    // ==================== Lobby ====================

    fn start_game(&mut self, player_names: Vec<String>) -> Result<Vec<GameEvent>, GameError> {
        if self.phase != GamePhase::Lobby {
            return Err(GameError::GameAlreadyStarted);
        }
        if self.players.is_empty() && player_names.is_empty() {
            return Err(GameError::NoPlayers);
        }

        self.players.extend(player_names.into_iter().map(Player::new));

        self.current_player_index = 0;
        for (i, player) in self.players.iter_mut().enumerate() {
            player.is_current = i == 0;
        }

        self.clear_turn();
        self.banked_score = 0;
        self.phase = GamePhase::Rolling;

        Ok(vec![GameEvent::GameStarted {
            player_ids: self.players.iter().map(|p| p.id).collect(),
        }])
    }

    fn join_game(&mut self, player_name: String) -> Result<Vec<GameEvent>, GameError> {
        if self.phase != GamePhase::Lobby {
            return Err(GameError::GameAlreadyStarted);
        }

        let player = Player::new(player_name);
        let event = GameEvent::PlayerJoined {
            player: player.id,
            name: player.name.clone(),
        };
        self.players.push(player);

        Ok(vec![event])
    }

    // ==================== Turn Actions ====================

    fn roll<R: Rng>(&mut self, rng: &mut R) -> Result<Vec<GameEvent>, GameError> {
        if !matches!(self.phase, GamePhase::Rolling | GamePhase::Banking) {
            return Err(GameError::InvalidPhase);
        }

        // Fresh six at the start of a turn, or after hot dice when every
        // die was set aside; otherwise re-roll exactly the unkept dice.
        let n = if self.dice.is_empty() {
            self.kept.clear();
            self.kept_score = 0;
            DICE_PER_TURN
        } else {
            self.dice.len()
        };

        let roll = roll_dice(n, rng);
        self.resolve_roll(roll)
    }

    /// Classify a fresh roll and advance the phase accordingly
    fn resolve_roll(&mut self, roll: Vec<Die>) -> Result<Vec<GameEvent>, GameError> {
        self.last_roll = roll.iter().map(|d| d.value).collect();
        self.dice = roll;
        self.roll_count += 1;
        self.hot_dice = false;

        let player_id = self.current_player().map(|p| p.id).unwrap_or_default();
        let mut events = vec![GameEvent::DiceRolled {
            player: player_id,
            values: self.last_roll.clone(),
            roll_count: self.roll_count,
        }];

        let result = score_dice(&self.dice);
        if result.farkle {
            self.turn_score = 0;
            self.kept_score = 0;
            self.phase = GamePhase::Farkle;

            let player = &mut self.players[self.current_player_index];
            player.record_farkle();
            events.push(GameEvent::Farkled {
                player: player.id,
                farkle_count: player.farkle_count,
            });
        } else {
            self.phase = GamePhase::Selecting;
        }

        Ok(events)
    }

    fn select_dice(&mut self, die_ids: &[Uuid]) -> Result<Vec<GameEvent>, GameError> {
        if self.phase != GamePhase::Selecting {
            return Err(GameError::InvalidPhase);
        }
        if die_ids.is_empty() {
            return Err(GameError::EmptySelection);
        }

        let selected: HashSet<Uuid> = die_ids.iter().copied().collect();
        if selected
            .iter()
            .any(|id| !self.dice.iter().any(|d| d.id == *id))
        {
            return Err(GameError::UnknownDie);
        }

        // Move the chosen dice into the kept pool
        let mut remaining = Vec::with_capacity(self.dice.len() - selected.len());
        for mut die in self.dice.drain(..) {
            if selected.contains(&die.id) {
                die.kept = true;
                self.kept.push(die);
            } else {
                remaining.push(die);
            }
        }
        self.dice = remaining;

        // Re-score the full kept set jointly and credit the delta, so a
        // selection can upgrade dice kept earlier in the turn
        let result = score_dice(&self.kept);
        let points = result.score.saturating_sub(self.kept_score);
        self.turn_score += points;
        self.kept_score = result.score;

        let player_id = self.current_player().map(|p| p.id).unwrap_or_default();
        let mut events = vec![GameEvent::DiceKept {
            player: player_id,
            die_ids: self.kept.iter().map(|d| d.id).collect(),
            points,
            turn_score: self.turn_score,
        }];

        // Hot dice: nothing left to roll and every kept die scored
        if self.dice.is_empty() && result.hot_dice {
            self.hot_dice = true;
            events.push(GameEvent::HotDice { player: player_id });
        }

        self.phase = GamePhase::Banking;
        Ok(events)
    }

    fn bank_score(&mut self) -> Result<Vec<GameEvent>, GameError> {
        if self.phase != GamePhase::Banking {
            return Err(GameError::InvalidPhase);
        }

        let points = self.turn_score;
        let player = &mut self.players[self.current_player_index];
        player.bank(points);
        self.banked_score = player.score;
        self.phase = GamePhase::Ended;

        Ok(vec![GameEvent::ScoreBanked {
            player: player.id,
            points,
            total: player.score,
        }])
    }

    fn end_turn(&mut self) -> Result<Vec<GameEvent>, GameError> {
        if !matches!(self.phase, GamePhase::Farkle | GamePhase::Ended) {
            return Err(GameError::InvalidPhase);
        }

        let old_index = self.current_player_index;
        let next_index = (old_index + 1) % self.players.len();

        self.players[old_index].is_current = false;
        self.players[next_index].is_current = true;
        self.current_player_index = next_index;

        self.clear_turn();
        self.banked_score = self.players[next_index].score;
        self.phase = GamePhase::Rolling;

        Ok(vec![GameEvent::TurnEnded {
            player: self.players[old_index].id,
            next_player: self.players[next_index].id,
        }])
    }

    /// Reset all per-turn state
    fn clear_turn(&mut self) {
        self.dice.clear();
        self.kept.clear();
        self.turn_score = 0;
        self.kept_score = 0;
        self.roll_count = 0;
        self.last_roll.clear();
        self.hot_dice = false;
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}
