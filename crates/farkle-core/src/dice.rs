//! Dice rolling.
//!
//! This module contains:
//! - The `Die` struct with value, kept flag, and identity
//! - The roller that produces fresh dice for a turn

use rand::Rng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Number of dice in a full fresh roll
pub const DICE_PER_TURN: usize = 6;

/// A single die in the current turn.
///
/// Dice get fresh identities on every roll; only kept dice survive across
/// rolls within a turn, and everything is discarded when the turn ends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Die {
    /// Unique identity, referenced by selection actions
    pub id: Uuid,
    /// Face value (1-6)
    pub value: u8,
    /// Whether this die has been set aside as scoring material
    pub kept: bool,
}

impl Die {
    /// Create a die with a fresh identity
    pub fn new(value: u8) -> Self {
        debug_assert!((1..=6).contains(&value), "die value out of range");
        Self {
            id: Uuid::new_v4(),
            value,
            kept: false,
        }
    }
}

/// Roll `n` dice, each independently uniform over 1-6 with a fresh identity.
///
/// Side-effect-free apart from the rng; game state is untouched.
pub fn roll_dice<R: Rng>(n: usize, rng: &mut R) -> Vec<Die> {
    (0..n).map(|_| Die::new(rng.gen_range(1..=6))).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_roll_count_and_range() {
        let mut rng = StdRng::seed_from_u64(42);
        let dice = roll_dice(DICE_PER_TURN, &mut rng);

        assert_eq!(dice.len(), 6);
        for die in &dice {
            assert!((1..=6).contains(&die.value));
            assert!(!die.kept);
        }
    }

    #[test]
    fn test_roll_fresh_identities() {
        let mut rng = StdRng::seed_from_u64(7);
        let first = roll_dice(6, &mut rng);
        let second = roll_dice(6, &mut rng);

        for a in &first {
            for b in &second {
                assert_ne!(a.id, b.id);
            }
        }
    }

    #[test]
    fn test_roll_zero_is_empty() {
        let mut rng = StdRng::seed_from_u64(0);
        assert!(roll_dice(0, &mut rng).is_empty());
    }

    #[test]
    fn test_all_faces_reachable() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut seen = [false; 6];
        for die in roll_dice(500, &mut rng) {
            seen[(die.value - 1) as usize] = true;
        }
        assert!(seen.iter().all(|&s| s));
    }
}
