//! Game actions that players can take.
//!
//! This module defines all possible actions in the game and the events
//! that result from those actions.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// All possible actions a player can take
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum GameAction {
    // ==================== Lobby ====================
    /// Start the game with the given roster (appended to anyone who joined)
    StartGame { player_names: Vec<String> },
    /// Add a player to the lobby without starting
    JoinGame { player_name: String },

    // ==================== Turn Actions ====================
    /// Roll the unkept dice (or a fresh six at the start of a turn)
    RollDice,
    /// Set aside dice from the current roll as scoring material
    SelectDice { die_ids: Vec<Uuid> },
    /// Commit the accumulated turn score to the current player
    BankScore,
    /// Pass the dice to the next player
    EndTurn,

    // ==================== Game Management ====================
    /// Return to an empty lobby, discarding all players and scores
    ResetGame,
}

/// Events that occur as a result of actions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum GameEvent {
    /// The game left the lobby and play began
    GameStarted { player_ids: Vec<Uuid> },

    /// A player joined the lobby
    PlayerJoined { player: Uuid, name: String },

    /// Dice were rolled
    DiceRolled {
        player: Uuid,
        values: Vec<u8>,
        roll_count: u32,
    },

    /// A roll produced no scoring dice; the turn's score is lost
    Farkled { player: Uuid, farkle_count: u32 },

    /// Dice were set aside for scoring
    DiceKept {
        player: Uuid,
        die_ids: Vec<Uuid>,
        points: u32,
        turn_score: u32,
    },

    /// Every die scored; a fresh six may be rolled with the score intact
    HotDice { player: Uuid },

    /// Turn score was committed to a player's total
    ScoreBanked {
        player: Uuid,
        points: u32,
        total: u32,
    },

    /// Turn passed to the next player
    TurnEnded { player: Uuid, next_player: Uuid },

    /// The game returned to an empty lobby
    GameReset,
}
