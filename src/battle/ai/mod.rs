//! Computer opponent decision-making
//!
//! Architecture: trait + implementation
//! - TacticsAI trait defines the interface for swappable opponents
//! - GreedyCommander is the built-in single-action heuristic

mod commander;

pub use commander::GreedyCommander;

use crate::battle::board::Board;
use crate::core::types::CellIndex;

/// A single computer action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AiAction {
    Attack { attacker: CellIndex, target: CellIndex },
    Move { from: CellIndex, to: CellIndex },
}

/// Trait for computer opponent implementations
pub trait TacticsAI {
    /// Choose at most one action for the computer side; `None` passes the turn
    fn decide(&mut self, board: &Board) -> Option<AiAction>;
}
