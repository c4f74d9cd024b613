//! Retro Tactics - turn-based squad battles on a square board

pub mod battle;
pub mod core;
pub mod persistence;
pub mod session;
pub mod ui;

pub use crate::battle::{GameController, Step};
pub use crate::core::{GameConfig, Result, TacticsError, ValidationError};
pub use crate::session::{Command, Session};
