//! UI module - the render collaborator contract
//!
//! The engine talks to whatever draws the board only through [`GamePlay`].
//! Input flows the other way as [`crate::session::Command`]s.

pub mod recording;
pub mod terminal;

pub use recording::{RecordingGamePlay, RenderCall};
pub use terminal::TerminalGamePlay;

use tokio::sync::oneshot;

use crate::battle::board::PositionedCharacter;
use crate::core::types::CellIndex;

/// Cursor shape over a cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CursorKind {
    #[default]
    Auto,
    Pointer,
    Crosshair,
    NotAllowed,
}

/// Highlight color for a selected or hinted cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellTint {
    Yellow, // Selected character
    Green,  // Legal move
    Red,    // Legal attack target
}

/// Completion signal for a damage animation
///
/// Board changes that follow an attack wait for this signal. A renderer
/// without animations returns [`DamageSignal::immediate`].
#[derive(Debug)]
pub struct DamageSignal {
    receiver: Option<oneshot::Receiver<()>>,
}

/// Sender half of a [`DamageSignal`]
#[derive(Debug)]
pub struct DamageAck {
    sender: oneshot::Sender<()>,
}

impl DamageSignal {
    /// Signal that is already complete
    pub fn immediate() -> Self {
        Self { receiver: None }
    }

    /// Signal that completes when the returned ack fires (or is dropped)
    pub fn pending() -> (DamageAck, Self) {
        let (sender, receiver) = oneshot::channel();
        (
            DamageAck { sender },
            Self {
                receiver: Some(receiver),
            },
        )
    }

    pub fn is_complete(&self) -> bool {
        self.receiver.is_none()
    }

    /// Wait for the animation to finish. Cancel-safe.
    pub async fn wait(&mut self) {
        if let Some(receiver) = self.receiver.as_mut() {
            // A dropped ack counts as completion
            let _ = receiver.await;
        }
        self.receiver = None;
    }
}

impl DamageAck {
    pub fn complete(self) {
        let _ = self.sender.send(());
    }
}

/// Everything the engine asks of a renderer
pub trait GamePlay {
    /// Draw an empty board for a level
    fn draw_board(&mut self, board_size: usize, level: u8);

    /// Draw the full set of characters
    fn redraw_positions(&mut self, positions: &[PositionedCharacter]);

    fn select_cell(&mut self, cell: CellIndex, tint: CellTint);

    fn deselect_cell(&mut self, cell: CellIndex);

    fn set_cursor(&mut self, cursor: CursorKind);

    fn show_tooltip(&mut self, cell: CellIndex, text: &str);

    fn hide_tooltip(&mut self, cell: CellIndex);

    /// Animate damage on a cell and return its completion signal
    fn show_damage(&mut self, cell: CellIndex, damage: f64) -> DamageSignal;

    fn show_message(&mut self, message: &str);

    fn show_error(&mut self, message: &str);
}
