//! The board: positioned characters on a square grid
//!
//! Characters are kept in insertion order (squad creation order). The computer
//! AI breaks ties by this order, so it is part of observable behavior.

use crate::battle::character::Character;
use crate::core::error::ValidationError;
use crate::core::types::{CellIndex, Faction};

/// A character bound to one board cell
#[derive(Debug, Clone, PartialEq)]
pub struct PositionedCharacter {
    pub character: Character,
    pub position: CellIndex,
}

impl PositionedCharacter {
    pub fn new(character: Character, position: CellIndex) -> Self {
        Self {
            character,
            position,
        }
    }

    pub fn faction(&self) -> Faction {
        self.character.faction()
    }
}

/// All characters on a square board, at most one per cell
#[derive(Debug, Clone, PartialEq)]
pub struct Board {
    size: usize,
    positions: Vec<PositionedCharacter>,
}

impl Board {
    /// Create an empty board
    pub fn new(size: usize) -> Self {
        Self {
            size,
            positions: Vec::new(),
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn cell_count(&self) -> usize {
        self.size * self.size
    }

    /// Check if a cell index lies on the board
    pub fn in_bounds(&self, cell: CellIndex) -> bool {
        cell < self.cell_count()
    }

    pub fn positions(&self) -> &[PositionedCharacter] {
        &self.positions
    }

    pub fn get(&self, cell: CellIndex) -> Option<&PositionedCharacter> {
        self.positions.iter().find(|p| p.position == cell)
    }

    pub fn get_mut(&mut self, cell: CellIndex) -> Option<&mut PositionedCharacter> {
        self.positions.iter_mut().find(|p| p.position == cell)
    }

    pub fn is_occupied(&self, cell: CellIndex) -> bool {
        self.get(cell).is_some()
    }

    /// Faction of whoever stands on `cell`
    pub fn faction_at(&self, cell: CellIndex) -> Option<Faction> {
        self.get(cell).map(PositionedCharacter::faction)
    }

    /// Place a character on an empty cell
    pub fn place(&mut self, positioned: PositionedCharacter) -> Result<(), ValidationError> {
        if !self.in_bounds(positioned.position) {
            return Err(ValidationError::OutsideBoard(positioned.position));
        }
        if self.is_occupied(positioned.position) {
            return Err(ValidationError::CellOccupied(positioned.position));
        }
        self.positions.push(positioned);
        Ok(())
    }

    /// Move the character on `from` to the empty cell `to`
    pub fn relocate(&mut self, from: CellIndex, to: CellIndex) -> Result<(), ValidationError> {
        if !self.in_bounds(to) {
            return Err(ValidationError::OutsideBoard(to));
        }
        if self.is_occupied(to) {
            return Err(ValidationError::CellOccupied(to));
        }
        let positioned = self.get_mut(from).ok_or(ValidationError::EmptyCell(from))?;
        positioned.position = to;
        Ok(())
    }

    /// Remove and return every character whose health has dropped to zero or below
    pub fn remove_defeated(&mut self) -> Vec<PositionedCharacter> {
        let (alive, defeated): (Vec<_>, Vec<_>) = self
            .positions
            .drain(..)
            .partition(|p| p.character.is_alive());
        self.positions = alive;
        defeated
    }

    /// Characters of one faction, in board order
    pub fn members(&self, faction: Faction) -> impl Iterator<Item = &PositionedCharacter> {
        self.positions.iter().filter(move |p| p.faction() == faction)
    }

    pub fn count(&self, faction: Faction) -> usize {
        self.members(faction).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::archetype::Archetype;

    fn board_with_two() -> Board {
        let mut board = Board::new(8);
        board
            .place(PositionedCharacter::new(Character::new(Archetype::Swordsman, 1), 0))
            .unwrap();
        board
            .place(PositionedCharacter::new(Character::new(Archetype::Daemon, 1), 7))
            .unwrap();
        board
    }

    #[test]
    fn test_place_and_lookup() {
        let board = board_with_two();
        assert_eq!(board.positions().len(), 2);
        assert_eq!(board.faction_at(0), Some(Faction::Player));
        assert_eq!(board.faction_at(7), Some(Faction::Computer));
        assert_eq!(board.faction_at(1), None);
        assert_eq!(board.count(Faction::Player), 1);
    }

    #[test]
    fn test_one_character_per_cell() {
        let mut board = board_with_two();
        let err = board
            .place(PositionedCharacter::new(Character::new(Archetype::Bowman, 1), 0))
            .unwrap_err();
        assert_eq!(err, ValidationError::CellOccupied(0));
        assert_eq!(board.positions().len(), 2);
    }

    #[test]
    fn test_place_outside_board() {
        let mut board = Board::new(4);
        let err = board
            .place(PositionedCharacter::new(Character::new(Archetype::Bowman, 1), 16))
            .unwrap_err();
        assert_eq!(err, ValidationError::OutsideBoard(16));
    }

    #[test]
    fn test_relocate() {
        let mut board = board_with_two();
        board.relocate(0, 9).unwrap();
        assert!(board.get(0).is_none());
        assert_eq!(board.faction_at(9), Some(Faction::Player));

        assert_eq!(board.relocate(9, 7), Err(ValidationError::CellOccupied(7)));
        assert_eq!(board.relocate(3, 4), Err(ValidationError::EmptyCell(3)));
    }

    #[test]
    fn test_remove_defeated_keeps_order() {
        let mut board = board_with_two();
        board
            .place(PositionedCharacter::new(Character::new(Archetype::Magician, 1), 8))
            .unwrap();
        board.get_mut(7).unwrap().character.take_damage(100.0);

        let defeated = board.remove_defeated();
        assert_eq!(defeated.len(), 1);
        assert_eq!(defeated[0].position, 7);
        let remaining: Vec<_> = board.positions().iter().map(|p| p.position).collect();
        assert_eq!(remaining, vec![0, 8]);
    }
}
