//! Save/load of the full game state
//!
//! Features:
//! - JSON snapshot with recomputed character stats
//! - In-memory and file-backed stores
//! - Atomic file writes (temp file, then rename)

pub mod snapshot;
pub mod store;

pub use snapshot::{CharacterSave, PositionSave, Snapshot};
pub use store::{FileStore, MemoryStore, StateStore};
