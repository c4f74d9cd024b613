//! Game state owned by the turn engine

use crate::battle::board::{Board, PositionedCharacter};
use crate::battle::constants::MIN_LEVEL;
use crate::core::types::{CellIndex, Faction, Turn};

/// Complete state of one game
#[derive(Debug, Clone, PartialEq)]
pub struct GameState {
    /// `None` once the game is over
    pub current_turn: Option<Turn>,
    /// Cell of the selected player character
    pub selected: Option<CellIndex>,
    pub level: u8,
    pub score: u64,
    /// Best score so far; only raised at level, game-over and new-game boundaries
    pub max_score: u64,
    pub board: Board,
}

impl GameState {
    /// Empty level-1 state with the player to move
    pub fn new(board_size: usize) -> Self {
        Self {
            current_turn: Some(Turn::Player),
            selected: None,
            level: MIN_LEVEL,
            score: 0,
            max_score: 0,
            board: Board::new(board_size),
        }
    }

    pub fn is_finished(&self) -> bool {
        self.current_turn.is_none()
    }

    pub fn positions(&self) -> &[PositionedCharacter] {
        self.board.positions()
    }

    /// Fold the current score into the best score
    pub fn record_max_score(&mut self) {
        self.max_score = self.max_score.max(self.score);
    }

    /// Selected cell, if it still holds a player character
    pub fn selected_friendly(&self) -> Option<CellIndex> {
        self.selected
            .filter(|&cell| self.board.faction_at(cell) == Some(Faction::Player))
    }
}
