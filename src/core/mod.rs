pub mod config;
pub mod error;
pub mod types;

pub use config::GameConfig;
pub use error::{Result, TacticsError, ValidationError};
pub use types::{CellIndex, Faction, GridPos, Turn};
