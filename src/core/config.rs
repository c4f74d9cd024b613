//! Game configuration
//!
//! Values are loaded from `data/tactics.toml` when present; every field has a
//! default so partial files are accepted.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::battle::archetype::Archetype;
use crate::battle::constants::MIN_BOARD_SIZE;
use crate::core::error::{Result, TacticsError};
use crate::core::types::Faction;

/// Configuration for a game session
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Width (and height) of the square board in cells
    pub board_size: usize,

    /// Size of each side's squad at the start of a new game
    ///
    /// The computer squad grows to `survivors + 1` on every level advance,
    /// so the spawn bands must hold `team_size + 1` characters.
    pub team_size: usize,

    /// Simulated "thinking" pause before the computer acts
    pub thinking_delay_ms: u64,

    /// Seed for squad generation; `None` draws from OS entropy
    pub seed: Option<u64>,

    /// Archetypes the player's starting squad is drawn from
    pub player_archetypes: Vec<Archetype>,

    /// Archetypes computer squads are drawn from
    pub computer_archetypes: Vec<Archetype>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            board_size: 8,
            team_size: 2,
            thinking_delay_ms: 500,
            seed: None,
            player_archetypes: vec![Archetype::Swordsman, Archetype::Bowman],
            computer_archetypes: vec![Archetype::Vampire, Archetype::Undead, Archetype::Daemon],
        }
    }
}

impl GameConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    pub fn thinking_delay(&self) -> Duration {
        Duration::from_millis(self.thinking_delay_ms)
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        if self.board_size < MIN_BOARD_SIZE {
            return Err(TacticsError::Config(format!(
                "board_size ({}) must be at least {}",
                self.board_size, MIN_BOARD_SIZE
            )));
        }

        if self.team_size == 0 {
            return Err(TacticsError::Config("team_size must be positive".into()));
        }

        // Two spawn columns per side; the largest computer squad is team_size + 1
        let band_capacity = self.board_size * 2;
        if self.team_size + 1 > band_capacity {
            return Err(TacticsError::Config(format!(
                "team_size ({}) does not fit in two columns of a {}x{} board",
                self.team_size, self.board_size, self.board_size
            )));
        }

        check_roster(&self.player_archetypes, Faction::Player, "player_archetypes")?;
        check_roster(&self.computer_archetypes, Faction::Computer, "computer_archetypes")?;

        Ok(())
    }
}

fn check_roster(roster: &[Archetype], faction: Faction, field: &str) -> Result<()> {
    if roster.is_empty() {
        return Err(TacticsError::Config(format!("{} must not be empty", field)));
    }
    if let Some(wrong) = roster.iter().find(|a| a.faction() != faction) {
        return Err(TacticsError::Config(format!(
            "{} contains {} which belongs to the {:?} faction",
            field,
            wrong.name(),
            wrong.faction()
        )));
    }
    Ok(())
}

/// Default location of the config file
pub fn default_config_path() -> PathBuf {
    PathBuf::from("data/tactics.toml")
}

/// Parse and validate a config from TOML text
pub fn parse_config(contents: &str) -> Result<GameConfig> {
    let config: GameConfig = toml::from_str(contents)
        .map_err(|e| TacticsError::Config(format!("Failed to parse config TOML: {}", e)))?;
    config.validate()?;
    Ok(config)
}

/// Load config from a TOML file
pub fn load_config(path: &Path) -> Result<GameConfig> {
    let contents = fs::read_to_string(path)
        .map_err(|e| TacticsError::Config(format!("Failed to read config file {:?}: {}", path, e)))?;
    parse_config(&contents)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = GameConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.board_size, 8);
        assert_eq!(config.team_size, 2);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config = parse_config("board_size = 10\nseed = 7\n").unwrap();
        assert_eq!(config.board_size, 10);
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.team_size, 2);
        assert_eq!(config.player_archetypes.len(), 2);
    }

    #[test]
    fn test_archetype_lists_from_toml() {
        let config = parse_config(
            r#"
            player_archetypes = ["magician"]
            computer_archetypes = ["daemon", "undead"]
            "#,
        )
        .unwrap();
        assert_eq!(config.player_archetypes, vec![Archetype::Magician]);
        assert_eq!(config.computer_archetypes, vec![Archetype::Daemon, Archetype::Undead]);
    }

    #[test]
    fn test_rejects_tiny_board() {
        let config = GameConfig {
            board_size: 2,
            ..GameConfig::default()
        };
        assert!(matches!(config.validate(), Err(TacticsError::Config(_))));
    }

    #[test]
    fn test_rejects_oversized_team() {
        let config = GameConfig {
            board_size: 4,
            team_size: 8,
            ..GameConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_wrong_faction_roster() {
        let config = GameConfig {
            player_archetypes: vec![Archetype::Vampire],
            ..GameConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_unknown_archetype_name() {
        assert!(parse_config("player_archetypes = [\"knight\"]").is_err());
    }

    #[test]
    fn test_load_shipped_config() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join(default_config_path());
        let config = load_config(&path).expect("Should load shipped config");
        assert_eq!(config.board_size, 8);
    }
}
