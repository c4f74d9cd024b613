//! Snapshot format: the whole game state as one JSON record
//!
//! Dedicated serde structs decouple the saved format from engine types.
//! Attack and defence are written out but recomputed on load from archetype
//! and level; health is the only character field taken as saved.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::battle::archetype::Archetype;
use crate::battle::board::PositionedCharacter;
use crate::battle::character::Character;
use crate::battle::constants::{MAX_HEALTH, MAX_LEVEL, MIN_LEVEL, SPAWN_BAND_WIDTH};
use crate::battle::state::GameState;
use crate::core::error::{Result, TacticsError};
use crate::core::types::{CellIndex, Faction, Turn};

/// Saved game state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub current_turn: Option<Turn>,
    pub selected_character_index: Option<CellIndex>,
    pub level: u8,
    pub score: u64,
    pub max_score: u64,
    pub positions: Vec<PositionSave>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionSave {
    pub position: CellIndex,
    pub character: CharacterSave,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CharacterSave {
    /// Archetype name; kept as text so unknown names surface as InvalidArchetype
    #[serde(rename = "type")]
    pub kind: String,
    pub level: u8,
    pub attack: u32,
    pub defence: u32,
    pub health: f64,
}

impl CharacterSave {
    fn from_character(character: &Character) -> Self {
        Self {
            kind: character.archetype().name().to_string(),
            level: character.level(),
            attack: character.attack(),
            defence: character.defence(),
            health: character.health(),
        }
    }

    fn to_character(&self) -> Result<Character> {
        let archetype: Archetype = self.kind.parse()?;

        if !(MIN_LEVEL..=MAX_LEVEL).contains(&self.level) {
            return Err(TacticsError::Storage(format!(
                "character level {} outside {}..={}",
                self.level, MIN_LEVEL, MAX_LEVEL
            )));
        }
        if !self.health.is_finite() || self.health <= 0.0 || self.health > MAX_HEALTH {
            return Err(TacticsError::Storage(format!(
                "character health {} outside (0, {}]",
                self.health, MAX_HEALTH
            )));
        }

        let mut character = Character::new(archetype, self.level);
        character.set_health(self.health);
        Ok(character)
    }
}

impl Snapshot {
    /// Capture the full state
    pub fn capture(state: &GameState) -> Self {
        Self {
            current_turn: state.current_turn,
            selected_character_index: state.selected,
            level: state.level,
            score: state.score,
            max_score: state.max_score,
            positions: state
                .positions()
                .iter()
                .map(|p| PositionSave {
                    position: p.position,
                    character: CharacterSave::from_character(&p.character),
                })
                .collect(),
        }
    }

    /// Rebuild a game state on a board of `board_size`
    pub fn restore(&self, board_size: usize) -> Result<GameState> {
        if !(MIN_LEVEL..=MAX_LEVEL).contains(&self.level) {
            return Err(TacticsError::Storage(format!(
                "game level {} outside {}..={}",
                self.level, MIN_LEVEL, MAX_LEVEL
            )));
        }

        let mut state = GameState::new(board_size);
        state.current_turn = self.current_turn;
        state.level = self.level;
        state.score = self.score;
        state.max_score = self.max_score;

        for entry in &self.positions {
            let character = entry.character.to_character()?;
            state
                .board
                .place(PositionedCharacter::new(character, entry.position))
                .map_err(|e| TacticsError::Storage(format!("bad position: {}", e)))?;
        }

        // Clearing a level redeploys every player plus one more enemy into a band
        let band = SPAWN_BAND_WIDTH * board_size;
        let players = state.board.count(Faction::Player);
        if players + 1 > band {
            return Err(TacticsError::Storage(format!(
                "{} player characters leave no room for the next enemy squad in {} spawn cells",
                players, band
            )));
        }

        state.selected = self.selected_character_index;
        if state.selected.is_some() && state.selected_friendly().is_none() {
            warn!(
                selected = ?self.selected_character_index,
                "Saved selection does not point at a player character, clearing it"
            );
            state.selected = None;
        }

        Ok(state)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parse a stored payload; malformed payloads are storage errors
    pub fn from_json(payload: &str) -> Result<Self> {
        serde_json::from_str(payload).map_err(|e| TacticsError::Storage(format!("Invalid state: {}", e)))
    }
}
