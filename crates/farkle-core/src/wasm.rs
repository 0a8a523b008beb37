//! WebAssembly bindings for the Farkle game engine.
//!
//! This module exposes the game engine to the browser dashboard through
//! wasm-bindgen. State, actions, and events cross the boundary as JSON.

#[cfg(feature = "wasm")]
use wasm_bindgen::prelude::*;

#[cfg(feature = "wasm")]
use crate::actions::GameAction;
#[cfg(feature = "wasm")]
use crate::bot::{Bot, BotDifficulty};
#[cfg(feature = "wasm")]
use crate::game::GameState;

/// Initialize panic hook for better error messages in browser console
#[cfg(feature = "wasm")]
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

/// WASM-exposed game wrapper
#[cfg(feature = "wasm")]
#[wasm_bindgen]
pub struct WasmGame {
    state: GameState,
}

#[cfg(feature = "wasm")]
#[wasm_bindgen]
impl WasmGame {
    /// Create an empty lobby
    #[wasm_bindgen(constructor)]
    pub fn new() -> WasmGame {
        WasmGame {
            state: GameState::new(),
        }
    }

    /// Get the current game state as JSON
    #[wasm_bindgen(js_name = getState)]
    pub fn get_state(&self) -> String {
        serde_json::to_string(&self.state).unwrap_or_else(|_| "{}".to_string())
    }

    /// Get valid actions for the current phase as a JSON array
    #[wasm_bindgen(js_name = getValidActions)]
    pub fn get_valid_actions(&self) -> String {
        serde_json::to_string(&self.state.valid_actions()).unwrap_or_else(|_| "[]".to_string())
    }

    /// Apply an action from JSON, returns events JSON or error
    #[wasm_bindgen(js_name = applyAction)]
    pub fn apply_action(&mut self, action_json: &str) -> Result<String, JsValue> {
        let action: GameAction = serde_json::from_str(action_json)
            .map_err(|e| JsValue::from_str(&format!("Invalid action JSON: {}", e)))?;

        match self.state.apply_action(action) {
            Ok(events) => Ok(serde_json::to_string(&events).unwrap_or_else(|_| "[]".to_string())),
            Err(e) => Err(JsValue::from_str(&format!("Action failed: {}", e))),
        }
    }

    /// Get the current phase as a string
    #[wasm_bindgen(js_name = getPhase)]
    pub fn get_phase(&self) -> String {
        serde_json::to_string(&self.state.phase).unwrap_or_else(|_| "\"Unknown\"".to_string())
    }

    /// Get the score accumulated this turn
    #[wasm_bindgen(js_name = getTurnScore)]
    pub fn get_turn_score(&self) -> u32 {
        self.state.turn_score
    }

    /// Get the current player index
    #[wasm_bindgen(js_name = getCurrentPlayer)]
    pub fn get_current_player(&self) -> usize {
        self.state.current_player_index
    }

    /// Get the face values of the most recent roll
    #[wasm_bindgen(js_name = getLastRoll)]
    pub fn get_last_roll(&self) -> Vec<u8> {
        self.state.last_roll.clone()
    }

    /// Let a bot pick the next action, returned as JSON (null in the lobby)
    #[wasm_bindgen(js_name = suggestAction)]
    pub fn suggest_action(&self, difficulty: &str) -> String {
        let difficulty = match difficulty {
            "easy" => BotDifficulty::Easy,
            "hard" => BotDifficulty::Hard,
            _ => BotDifficulty::Medium,
        };
        let mut bot = Bot::new(difficulty);
        match bot.choose_action(&self.state) {
            Some(action) => {
                serde_json::to_string(&action).unwrap_or_else(|_| "null".to_string())
            }
            None => "null".to_string(),
        }
    }
}

#[cfg(feature = "wasm")]
impl Default for WasmGame {
    fn default() -> Self {
        Self::new()
    }
}
