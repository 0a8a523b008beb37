//! Farkle - a push-your-luck dice game engine
//!
//! This crate provides the core game logic for Farkle, including:
//! - Dice rolling with per-die identities
//! - Joint scoring of kept dice (triples and better, loose 1s and 5s)
//! - Turn/phase state machine with full rule enforcement
//!
//! # Architecture
//!
//! The game engine is designed to be platform-agnostic. It can be compiled to:
//! - Native Rust for server-side game hosting
//! - WebAssembly for a browser dashboard running local games
//!
//! All mutation goes through [`GameState::apply_action`], which rejects
//! illegal actions without touching the state. Presentation layers read
//! snapshots and gate the actions they offer via [`GameState::valid_actions`].
//!
//! # Modules
//!
//! - [`dice`]: The dice roller
//! - [`scoring`]: Scoring rules for a set of dice
//! - [`player`]: Player state
//! - [`actions`]: Actions and the events they produce
//! - [`game`]: Game state machine
//! - [`bot`]: AI players

pub mod actions;
pub mod bot;
pub mod dice;
pub mod game;
pub mod player;
pub mod scoring;
#[cfg(feature = "wasm")]
pub mod wasm;

// Re-export commonly used types
pub use actions::{GameAction, GameEvent};
pub use bot::{Bot, BotDifficulty};
pub use dice::{roll_dice, Die, DICE_PER_TURN};
pub use game::{GameError, GamePhase, GameState};
pub use player::Player;
pub use scoring::{score_dice, ScoringResult};
