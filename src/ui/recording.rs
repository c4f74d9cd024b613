//! Headless renderer that records every call
//!
//! Used by tests and by tools that drive the engine without a screen.

use crate::battle::board::PositionedCharacter;
use crate::core::types::CellIndex;
use crate::ui::{CellTint, CursorKind, DamageAck, DamageSignal, GamePlay};

/// One recorded renderer call
#[derive(Debug, Clone, PartialEq)]
pub enum RenderCall {
    DrawBoard { board_size: usize, level: u8 },
    Redraw { count: usize },
    Select { cell: CellIndex, tint: CellTint },
    Deselect { cell: CellIndex },
    Cursor(CursorKind),
    ShowTooltip { cell: CellIndex, text: String },
    HideTooltip { cell: CellIndex },
    Damage { cell: CellIndex, damage: f64 },
    Message(String),
    Error(String),
}

/// Renderer that keeps a log instead of drawing
#[derive(Debug, Default)]
pub struct RecordingGamePlay {
    pub calls: Vec<RenderCall>,
    /// When set, damage signals stay pending until acked via `pending_acks`
    pub deferred_damage: bool,
    pub pending_acks: Vec<DamageAck>,
}

impl RecordingGamePlay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Renderer whose damage animations wait for explicit acks
    pub fn with_deferred_damage() -> Self {
        Self {
            deferred_damage: true,
            ..Self::default()
        }
    }

    pub fn messages(&self) -> Vec<&str> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                RenderCall::Message(message) => Some(message.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn errors(&self) -> Vec<&str> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                RenderCall::Error(message) => Some(message.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Cells currently highlighted, with their tint
    pub fn selected_cells(&self) -> Vec<(CellIndex, CellTint)> {
        let mut selected: Vec<(CellIndex, CellTint)> = Vec::new();
        for call in &self.calls {
            match call {
                RenderCall::Select { cell, tint } => {
                    selected.retain(|(c, _)| c != cell);
                    selected.push((*cell, *tint));
                }
                RenderCall::Deselect { cell } => selected.retain(|(c, _)| c != cell),
                _ => {}
            }
        }
        selected
    }

    pub fn last_cursor(&self) -> Option<CursorKind> {
        self.calls.iter().rev().find_map(|call| match call {
            RenderCall::Cursor(kind) => Some(*kind),
            _ => None,
        })
    }

    /// Complete every outstanding damage animation
    pub fn ack_all(&mut self) {
        for ack in self.pending_acks.drain(..) {
            ack.complete();
        }
    }
}

impl GamePlay for RecordingGamePlay {
    fn draw_board(&mut self, board_size: usize, level: u8) {
        self.calls.push(RenderCall::DrawBoard { board_size, level });
    }

    fn redraw_positions(&mut self, positions: &[PositionedCharacter]) {
        self.calls.push(RenderCall::Redraw {
            count: positions.len(),
        });
    }

    fn select_cell(&mut self, cell: CellIndex, tint: CellTint) {
        self.calls.push(RenderCall::Select { cell, tint });
    }

    fn deselect_cell(&mut self, cell: CellIndex) {
        self.calls.push(RenderCall::Deselect { cell });
    }

    fn set_cursor(&mut self, cursor: CursorKind) {
        self.calls.push(RenderCall::Cursor(cursor));
    }

    fn show_tooltip(&mut self, cell: CellIndex, text: &str) {
        self.calls.push(RenderCall::ShowTooltip {
            cell,
            text: text.to_string(),
        });
    }

    fn hide_tooltip(&mut self, cell: CellIndex) {
        self.calls.push(RenderCall::HideTooltip { cell });
    }

    fn show_damage(&mut self, cell: CellIndex, damage: f64) -> DamageSignal {
        self.calls.push(RenderCall::Damage { cell, damage });
        if self.deferred_damage {
            let (ack, signal) = DamageSignal::pending();
            self.pending_acks.push(ack);
            signal
        } else {
            DamageSignal::immediate()
        }
    }

    fn show_message(&mut self, message: &str) {
        self.calls.push(RenderCall::Message(message.to_string()));
    }

    fn show_error(&mut self, message: &str) {
        self.calls.push(RenderCall::Error(message.to_string()));
    }
}
