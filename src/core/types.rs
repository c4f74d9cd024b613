//! Core type definitions used throughout the codebase

use serde::{Deserialize, Serialize};

/// Index of a board cell, row-major in `[0, board_size²)`
pub type CellIndex = usize;

/// Side a character fights for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Faction {
    Player,
    Computer,
}

/// Whose move it is. A finished game has no turn (`Option<Turn>::None`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Turn {
    Player,
    Computer,
}

/// Row/column pair on a square board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct GridPos {
    pub row: i64,
    pub col: i64,
}

impl GridPos {
    pub fn new(row: i64, col: i64) -> Self {
        Self { row, col }
    }

    pub fn from_index(index: CellIndex, board_size: usize) -> Self {
        Self {
            row: (index / board_size) as i64,
            col: (index % board_size) as i64,
        }
    }

    /// Cell index if the position lies on the board
    pub fn to_index(&self, board_size: usize) -> Option<CellIndex> {
        let size = board_size as i64;
        if (0..size).contains(&self.row) && (0..size).contains(&self.col) {
            Some((self.row * size + self.col) as usize)
        } else {
            None
        }
    }

    pub fn manhattan(&self, other: &Self) -> u64 {
        self.row.abs_diff(other.row) + self.col.abs_diff(other.col)
    }
}
