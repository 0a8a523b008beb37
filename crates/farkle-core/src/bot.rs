//! AI players.
//!
//! This module provides different difficulty levels of AI players:
//! - Easy: keep everything that scores, bank at the first opportunity
//! - Medium: push its luck until a fixed turn-score threshold
//! - Hard: weigh the banked lead against the odds of the next roll farkling

use crate::actions::GameAction;
use crate::game::{GamePhase, GameState};
use crate::scoring::score_dice;
use rand::prelude::*;
use serde::{Deserialize, Serialize};

/// Medium bots bank once the turn is worth this much
const MEDIUM_BANK_THRESHOLD: u32 = 300;

/// Approximate chance that `n` dice roll no scoring die, in percent.
/// Zero dice means a fresh hot-dice six.
fn farkle_chance(n: usize) -> u32 {
    match n {
        1 => 67,
        2 => 44,
        3 => 28,
        4 => 16,
        5 => 8,
        _ => 2,
    }
}

/// Bot difficulty level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BotDifficulty {
    Easy,
    Medium,
    Hard,
}

/// A bot player that can decide on actions
pub struct Bot {
    pub difficulty: BotDifficulty,
    rng: StdRng,
}

impl Bot {
    pub fn new(difficulty: BotDifficulty) -> Self {
        Self {
            difficulty,
            rng: StdRng::from_entropy(),
        }
    }

    pub fn with_seed(difficulty: BotDifficulty, seed: u64) -> Self {
        Self {
            difficulty,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Choose an action for the current phase, or None when the game is
    /// waiting in the lobby
    pub fn choose_action(&mut self, game: &GameState) -> Option<GameAction> {
        match game.phase {
            GamePhase::Lobby => None,
            GamePhase::Rolling => Some(GameAction::RollDice),
            GamePhase::Selecting => Some(self.choose_selection(game)),
            GamePhase::Banking => Some(self.choose_bank_or_press(game)),
            GamePhase::Farkle | GamePhase::Ended => Some(GameAction::EndTurn),
        }
    }

    /// Keep every scoring die of the current roll
    fn choose_selection(&mut self, game: &GameState) -> GameAction {
        let result = score_dice(&game.dice);
        GameAction::SelectDice {
            die_ids: result.scoring_die_ids,
        }
    }

    fn choose_bank_or_press(&mut self, game: &GameState) -> GameAction {
        match self.difficulty {
            BotDifficulty::Easy => GameAction::BankScore,

            BotDifficulty::Medium => {
                if game.turn_score >= MEDIUM_BANK_THRESHOLD {
                    GameAction::BankScore
                } else {
                    GameAction::RollDice
                }
            }

            BotDifficulty::Hard => {
                // Expected loss of pressing is turn_score * farkle_chance;
                // press while the pot is small relative to that risk, with
                // a little noise so games don't play out identically
                let risk = game.turn_score * farkle_chance(game.dice.len()) / 100;
                let appetite: u32 = 100 + self.rng.gen_range(0..100u32);
                if risk > appetite {
                    GameAction::BankScore
                } else {
                    GameAction::RollDice
                }
            }
        }
    }
}
