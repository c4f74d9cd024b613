use thiserror::Error;

/// Reason a player action was rejected. Rejections never mutate state.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Not your turn")]
    NotYourTurn,

    #[error("Game over")]
    GameOver,

    #[error("Cell {0} is outside the board")]
    OutsideBoard(usize),

    #[error("No character at cell {0}")]
    EmptyCell(usize),

    #[error("Character at cell {0} is not yours")]
    NotFriendly(usize),

    #[error("Select a character first")]
    NoSelection,

    #[error("Cell {0} is out of movement range")]
    MoveOutOfRange(usize),

    #[error("Cell {0} is occupied")]
    CellOccupied(usize),

    #[error("Character at cell {0} is not an enemy")]
    NotAnEnemy(usize),

    #[error("Cell {0} is out of attack range")]
    AttackOutOfRange(usize),
}

#[derive(Error, Debug)]
pub enum TacticsError {
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Invalid archetype: {0}")]
    InvalidArchetype(String),

    #[error("Requested {requested} unique cells but only {available} are available")]
    OutOfRange { requested: usize, available: usize },

    #[error("Board error: {0}")]
    Board(#[from] ValidationError),

    #[error("No archetypes allowed for squad generation")]
    EmptyRoster,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, TacticsError>;
