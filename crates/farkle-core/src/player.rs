//! Player state.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single player's state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    /// Unique player ID
    pub id: Uuid,
    /// Display name
    pub name: String,
    /// Banked score, only ever increases
    pub score: u32,
    /// Whether it is this player's turn
    pub is_current: bool,
    /// Consecutive scoreless turns. Tracked for the traditional
    /// "three farkles" house rule; no penalty is applied (see DESIGN.md).
    pub farkle_count: u32,
}

impl Player {
    /// Create a new player with zero score
    pub fn new(name: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            score: 0,
            is_current: false,
            farkle_count: 0,
        }
    }

    /// Commit a finished turn's score to this player's total
    pub fn bank(&mut self, points: u32) {
        self.score += points;
        self.farkle_count = 0;
    }

    /// Record a scoreless turn
    pub fn record_farkle(&mut self) {
        self.farkle_count += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_player_zero_state() {
        let player = Player::new("Ada".to_string());
        assert_eq!(player.score, 0);
        assert_eq!(player.farkle_count, 0);
        assert!(!player.is_current);
    }

    #[test]
    fn test_bank_accumulates_and_clears_farkles() {
        let mut player = Player::new("Ada".to_string());
        player.record_farkle();
        player.record_farkle();
        assert_eq!(player.farkle_count, 2);

        player.bank(350);
        assert_eq!(player.score, 350);
        assert_eq!(player.farkle_count, 0);

        player.bank(500);
        assert_eq!(player.score, 850);
    }
}
