//! Range geometry on the square board
//!
//! Reach is queen-style: straight lines in the eight compass directions, up to
//! `range` steps. Occupancy is ignored; callers filter for it.

use crate::battle::character::Character;
use crate::core::types::{CellIndex, GridPos};

/// Row/column offsets of the eight directions
pub const DIRECTIONS: [(i64, i64); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// Every cell reachable from `position` within `range` steps, ascending by index
///
/// The origin is never included and every returned cell lies on the board.
pub fn enumerate_reachable(position: CellIndex, range: usize, board_size: usize) -> Vec<CellIndex> {
    if board_size == 0 || position >= board_size * board_size {
        return Vec::new();
    }

    let origin = GridPos::from_index(position, board_size);
    let mut cells = Vec::with_capacity(DIRECTIONS.len() * range);

    for (dr, dc) in DIRECTIONS {
        for step in 1..=range as i64 {
            let candidate = GridPos::new(origin.row + dr * step, origin.col + dc * step);
            match candidate.to_index(board_size) {
                Some(index) => cells.push(index),
                // Walking further in this direction stays off the board
                None => break,
            }
        }
    }

    cells.sort_unstable();
    cells
}

/// Cells a character could move to from `position`, ignoring occupancy
pub fn move_cells(character: &Character, position: CellIndex, board_size: usize) -> Vec<CellIndex> {
    enumerate_reachable(position, character.move_range(), board_size)
}

/// Cells a character could attack from `position`
pub fn attack_cells(character: &Character, position: CellIndex, board_size: usize) -> Vec<CellIndex> {
    enumerate_reachable(position, character.attack_range(), board_size)
}

/// Manhattan distance between two cells
pub fn manhattan_distance(a: CellIndex, b: CellIndex, board_size: usize) -> u64 {
    GridPos::from_index(a, board_size).manhattan(&GridPos::from_index(b, board_size))
}

/// Every cell in the given columns, row by row
pub fn column_positions(board_size: usize, columns: &[usize]) -> Vec<CellIndex> {
    (0..board_size)
        .flat_map(|row| {
            columns
                .iter()
                .filter(move |&&col| col < board_size)
                .map(move |&col| row * board_size + col)
        })
        .collect()
}
