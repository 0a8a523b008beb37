//! Scoring rules for a set of dice.
//!
//! Standard Farkle scoring, evaluated jointly over the whole candidate set:
//! - Three 1s score 1000; three of any other value `v` score `v * 100`
//! - Four, five, and six of a kind score 2x, 3x, and 4x the triple value
//! - Leftover single 1s score 100 each, leftover single 5s score 50 each
//! - Everything else scores nothing
//!
//! A non-empty set scoring 0 is a farkle. A set where every die contributed
//! to a scoring combination is "hot dice".

use crate::dice::Die;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Score for three 1s
const TRIPLE_ONES: u32 = 1000;

/// Score for a leftover single 1
const SINGLE_ONE: u32 = 100;

/// Score for a leftover single 5
const SINGLE_FIVE: u32 = 50;

/// Multiplier applied to the triple value for 3/4/5/6 of a kind
fn kind_multiplier(count: usize) -> u32 {
    match count {
        3 => 1,
        4 => 2,
        5 => 3,
        _ => 4,
    }
}

/// Result of scoring a set of dice.
///
/// Deterministic: for a fixed multiset of values the result is always the
/// same, regardless of die order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoringResult {
    /// Total points from the whole set
    pub score: u32,
    /// True when a non-empty set yields no points (turn-ending bust)
    pub farkle: bool,
    /// True when every die in the set contributed to a scoring combination
    pub hot_dice: bool,
    /// Identities of the dice that contributed points
    pub scoring_die_ids: Vec<Uuid>,
    /// Human-readable breakdown, e.g. "Three 2s (200) + Single 5 (50)"
    pub description: String,
}

impl ScoringResult {
    /// Result for an empty candidate set
    fn empty() -> Self {
        Self {
            score: 0,
            farkle: false,
            hot_dice: false,
            scoring_die_ids: Vec::new(),
            description: String::new(),
        }
    }
}

/// Score a set of dice jointly.
///
/// Triples (and larger groups) consume their dice first; leftover 1s and 5s
/// score as singles. The kept flag on the input dice is ignored - the caller
/// decides which dice form the candidate set.
pub fn score_dice(dice: &[Die]) -> ScoringResult {
    if dice.is_empty() {
        return ScoringResult::empty();
    }

    // Count per face value (index 0 = face 1)
    let mut counts = [0usize; 6];
    for die in dice {
        counts[(die.value - 1) as usize] += 1;
    }

    let mut score = 0u32;
    let mut parts: Vec<String> = Vec::new();
    // Per-face number of dice that contributed, used to pick scoring ids
    let mut used = [0usize; 6];

    for value in 1..=6u8 {
        let count = counts[(value - 1) as usize];
        if count >= 3 {
            let triple = if value == 1 {
                TRIPLE_ONES
            } else {
                u32::from(value) * 100
            };
            let points = triple * kind_multiplier(count);
            score += points;
            used[(value - 1) as usize] = count;
            let label = match count {
                3 => "Three",
                4 => "Four",
                5 => "Five",
                _ => "Six",
            };
            parts.push(format!("{} {}s ({})", label, value, points));
        }
    }

    // Leftover singles: only 1s and 5s score
    let loose_ones = counts[0] - used[0];
    if loose_ones > 0 {
        let points = SINGLE_ONE * loose_ones as u32;
        score += points;
        used[0] += loose_ones;
        parts.push(if loose_ones == 1 {
            format!("Single 1 ({})", points)
        } else {
            format!("{} single 1s ({})", loose_ones, points)
        });
    }
    let loose_fives = counts[4] - used[4];
    if loose_fives > 0 {
        let points = SINGLE_FIVE * loose_fives as u32;
        score += points;
        used[4] += loose_fives;
        parts.push(if loose_fives == 1 {
            format!("Single 5 ({})", points)
        } else {
            format!("{} single 5s ({})", loose_fives, points)
        });
    }

    // Map the per-face usage back onto die identities. Order within a face
    // doesn't matter: dice of equal value are interchangeable for scoring.
    let mut scoring_die_ids = Vec::new();
    let mut remaining = used;
    for die in dice {
        let slot = &mut remaining[(die.value - 1) as usize];
        if *slot > 0 {
            *slot -= 1;
            scoring_die_ids.push(die.id);
        }
    }

    let farkle = score == 0;
    let hot_dice = !farkle && scoring_die_ids.len() == dice.len();

    ScoringResult {
        score,
        farkle,
        hot_dice,
        scoring_die_ids,
        description: if farkle {
            "Farkle!".to_string()
        } else {
            parts.join(" + ")
        },
    }
}
