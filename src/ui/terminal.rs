//! Plain-text renderer for the command-line game

use std::collections::HashMap;

use crate::battle::archetype::Archetype;
use crate::battle::board::PositionedCharacter;
use crate::battle::character::HealthLevel;
use crate::core::types::CellIndex;
use crate::ui::{CellTint, CursorKind, DamageSignal, GamePlay};

/// Renderer that prints the board to stdout
#[derive(Debug, Default)]
pub struct TerminalGamePlay {
    board_size: usize,
    level: u8,
    cells: HashMap<CellIndex, (char, u32, HealthLevel)>,
    highlights: HashMap<CellIndex, CellTint>,
}

impl TerminalGamePlay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Board as text: one row per line, `.` for empty cells
    pub fn render(&self) -> String {
        let mut out = format!("Level {}\n", self.level);
        out.push_str("     ");
        for col in 0..self.board_size {
            out.push_str(&format!("{:>6}", col));
        }
        out.push('\n');

        for row in 0..self.board_size {
            out.push_str(&format!("{:>4} ", row * self.board_size));
            for col in 0..self.board_size {
                let cell = row * self.board_size + col;
                let marker = match self.highlights.get(&cell) {
                    Some(CellTint::Yellow) => '*',
                    Some(CellTint::Green) => '+',
                    Some(CellTint::Red) => '!',
                    None => ' ',
                };
                match self.cells.get(&cell) {
                    Some((symbol, health, band)) => {
                        let bar = match band {
                            HealthLevel::Critical => '_',
                            HealthLevel::Normal => '~',
                            HealthLevel::High => ' ',
                        };
                        out.push_str(&format!("{:>1}{}{:>3}{}", marker, symbol, health, bar))
                    }
                    None => out.push_str(&format!("{:>1}  .  ", marker)),
                }
            }
            out.push('\n');
        }
        out
    }
}

/// Upper case for the player's side, lower case for the computer's
fn symbol(archetype: Archetype) -> char {
    match archetype {
        Archetype::Swordsman => 'S',
        Archetype::Bowman => 'B',
        Archetype::Magician => 'M',
        Archetype::Vampire => 'v',
        Archetype::Undead => 'u',
        Archetype::Daemon => 'd',
    }
}

impl GamePlay for TerminalGamePlay {
    fn draw_board(&mut self, board_size: usize, level: u8) {
        self.board_size = board_size;
        self.level = level;
        self.cells.clear();
        self.highlights.clear();
    }

    fn redraw_positions(&mut self, positions: &[PositionedCharacter]) {
        self.cells = positions
            .iter()
            .map(|p| {
                (
                    p.position,
                    (
                        symbol(p.character.archetype()),
                        p.character.display_health(),
                        p.character.health_level(),
                    ),
                )
            })
            .collect();
        println!("{}", self.render());
    }

    fn select_cell(&mut self, cell: CellIndex, tint: CellTint) {
        self.highlights.insert(cell, tint);
    }

    fn deselect_cell(&mut self, cell: CellIndex) {
        self.highlights.remove(&cell);
    }

    fn set_cursor(&mut self, _cursor: CursorKind) {}

    fn show_tooltip(&mut self, cell: CellIndex, text: &str) {
        println!("  [{}] {}", cell, text);
    }

    fn hide_tooltip(&mut self, _cell: CellIndex) {}

    fn show_damage(&mut self, cell: CellIndex, damage: f64) -> DamageSignal {
        println!("  -{:.1} at cell {}", damage, cell);
        DamageSignal::immediate()
    }

    fn show_message(&mut self, message: &str) {
        println!("{}", message);
    }

    fn show_error(&mut self, message: &str) {
        println!("! {}", message);
    }
}
