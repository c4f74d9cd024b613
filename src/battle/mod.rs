//! Battle system - two squads on a square board, one action per turn
//!
//! The player's squad fights a computer squad. Each turn one character moves
//! or attacks. Wiping out the computer squad advances the level; the game ends
//! when the player's squad is gone or level 4 is cleared.

pub mod ai;
pub mod archetype;
pub mod board;
pub mod character;
pub mod constants;
pub mod engine;
pub mod geometry;
pub mod resolution;
pub mod squad;
pub mod state;

// Re-exports for convenient access
pub use ai::{AiAction, GreedyCommander, TacticsAI};
pub use archetype::{Archetype, ArchetypeProperties};
pub use board::{Board, PositionedCharacter};
pub use character::{Character, HealthLevel};
pub use constants::*;
pub use engine::{CellHint, GameController, Step, ThinkTicket};
pub use geometry::{attack_cells, enumerate_reachable, manhattan_distance, move_cells};
pub use resolution::{calculate_damage, score_for, strike, Strike};
pub use squad::{generate_team, pick_unique, spawn_positions, Team};
pub use state::GameState;
