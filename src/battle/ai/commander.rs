//! Greedy commander - the built-in computer opponent
//!
//! Attacks the weakest reachable player character if it can; otherwise moves
//! the one character that ends up closest to any player character.
//! Ties go to whoever comes first in board order.

use tracing::debug;

use crate::battle::ai::{AiAction, TacticsAI};
use crate::battle::board::Board;
use crate::battle::geometry::{attack_cells, manhattan_distance, move_cells};
use crate::core::types::Faction;

/// Greedy single-action opponent
#[derive(Debug, Clone, Copy, Default)]
pub struct GreedyCommander;

impl GreedyCommander {
    pub fn new() -> Self {
        Self
    }

    /// Lowest-health player character within any computer character's attack range
    fn find_attack(&self, board: &Board) -> Option<AiAction> {
        let size = board.size();
        let mut best: Option<(f64, AiAction)> = None;

        for attacker in board.members(Faction::Computer) {
            let reachable = attack_cells(&attacker.character, attacker.position, size);
            for target in board.members(Faction::Player) {
                if !reachable.contains(&target.position) {
                    continue;
                }
                let health = target.character.health();
                if best.map_or(true, |(lowest, _)| health < lowest) {
                    best = Some((
                        health,
                        AiAction::Attack {
                            attacker: attacker.position,
                            target: target.position,
                        },
                    ));
                }
            }
        }

        best.map(|(_, action)| action)
    }

    /// Free cell that brings some computer character closest to some player character
    fn find_move(&self, board: &Board) -> Option<AiAction> {
        let size = board.size();
        let mut best: Option<(u64, AiAction)> = None;

        for mover in board.members(Faction::Computer) {
            let destinations: Vec<_> = move_cells(&mover.character, mover.position, size)
                .into_iter()
                .filter(|&cell| !board.is_occupied(cell))
                .collect();

            for target in board.members(Faction::Player) {
                for &destination in &destinations {
                    let distance = manhattan_distance(destination, target.position, size);
                    if best.map_or(true, |(closest, _)| distance < closest) {
                        best = Some((
                            distance,
                            AiAction::Move {
                                from: mover.position,
                                to: destination,
                            },
                        ));
                    }
                }
            }
        }

        best.map(|(_, action)| action)
    }
}

impl TacticsAI for GreedyCommander {
    fn decide(&mut self, board: &Board) -> Option<AiAction> {
        if board.count(Faction::Computer) == 0 || board.count(Faction::Player) == 0 {
            return None;
        }

        let action = self.find_attack(board).or_else(|| self.find_move(board));
        debug!(?action, "Computer decision");
        action
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::archetype::Archetype;
    use crate::battle::board::PositionedCharacter;
    use crate::battle::character::Character;

    fn place(board: &mut Board, archetype: Archetype, cell: usize) {
        board
            .place(PositionedCharacter::new(Character::new(archetype, 1), cell))
            .unwrap();
    }

    #[test]
    fn test_no_action_without_opponents() {
        let mut board = Board::new(8);
        place(&mut board, Archetype::Undead, 7);
        assert_eq!(GreedyCommander::new().decide(&board), None);
    }

    #[test]
    fn test_attacks_weakest_in_range() {
        let mut board = Board::new(8);
        // Undead at row 1 col 1 with attack range 1
        place(&mut board, Archetype::Undead, 9);
        place(&mut board, Archetype::Swordsman, 0);
        place(&mut board, Archetype::Bowman, 10);
        board.get_mut(10).unwrap().character.set_health(40.0);

        let action = GreedyCommander::new().decide(&board);
        assert_eq!(
            action,
            Some(AiAction::Attack {
                attacker: 9,
                target: 10
            })
        );
    }

    #[test]
    fn test_attack_tie_goes_to_first_found() {
        let mut board = Board::new(8);
        place(&mut board, Archetype::Undead, 9);
        place(&mut board, Archetype::Bowman, 10);
        place(&mut board, Archetype::Swordsman, 0);

        let action = GreedyCommander::new().decide(&board);
        assert_eq!(
            action,
            Some(AiAction::Attack {
                attacker: 9,
                target: 10
            })
        );
    }

    #[test]
    fn test_attack_preferred_over_move() {
        let mut board = Board::new(8);
        // Daemon has attack range 4 along queen lines
        place(&mut board, Archetype::Daemon, 7);
        place(&mut board, Archetype::Swordsman, 3);

        let action = GreedyCommander::new().decide(&board);
        assert_eq!(action, Some(AiAction::Attack { attacker: 7, target: 3 }));
    }

    #[test]
    fn test_moves_closest_when_nothing_in_range() {
        let mut board = Board::new(8);
        // Vampire at row 0 col 7, moves 2; swordsman at row 0 col 0
        place(&mut board, Archetype::Vampire, 7);
        place(&mut board, Archetype::Swordsman, 0);

        let action = GreedyCommander::new().decide(&board);
        // Cell 5 (row 0 col 5) is distance 5 from cell 0, the best reachable
        assert_eq!(action, Some(AiAction::Move { from: 7, to: 5 }));
    }

    #[test]
    fn test_move_skips_occupied_cells() {
        let mut board = Board::new(8);
        place(&mut board, Archetype::Vampire, 7);
        place(&mut board, Archetype::Daemon, 5);
        place(&mut board, Archetype::Swordsman, 0);
        // The vampire cannot step onto the daemon's cell; the daemon's step to 4 is closest
        let action = GreedyCommander::new().decide(&board);
        assert_eq!(action, Some(AiAction::Move { from: 5, to: 4 }));
    }

    #[test]
    fn test_move_tie_goes_to_first_mover() {
        // Undead move 4: from row 0 col 5 to cell 1, or from row 5 col 0 to
        // cell 8, both one step from the swordsman at cell 0
        let mut board = Board::new(8);
        place(&mut board, Archetype::Undead, 5);
        place(&mut board, Archetype::Undead, 40);
        place(&mut board, Archetype::Swordsman, 0);
        let action = GreedyCommander::new().decide(&board);
        assert_eq!(action, Some(AiAction::Move { from: 5, to: 1 }));

        let mut board = Board::new(8);
        place(&mut board, Archetype::Undead, 40);
        place(&mut board, Archetype::Undead, 5);
        place(&mut board, Archetype::Swordsman, 0);
        let action = GreedyCommander::new().decide(&board);
        assert_eq!(action, Some(AiAction::Move { from: 40, to: 8 }));
    }
}
