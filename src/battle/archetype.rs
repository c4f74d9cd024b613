//! Character archetypes and their base properties
//!
//! The archetype set is closed: every character is built from one of these
//! six kinds, so there is no generic character to instantiate.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::error::TacticsError;
use crate::core::types::Faction;

/// Kind of character
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Archetype {
    // Player faction
    Swordsman, // Close combat, long stride
    Bowman,    // Balanced
    Magician,  // Long range, sturdy

    // Computer faction
    Vampire,
    Undead,
    Daemon,
}

/// Level-1 properties for an archetype
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArchetypeProperties {
    pub attack: u32,
    pub defence: u32,
    pub move_range: usize,
    pub attack_range: usize,
}

impl Archetype {
    /// All archetypes in declaration order
    pub fn all() -> [Archetype; 6] {
        [
            Archetype::Swordsman,
            Archetype::Bowman,
            Archetype::Magician,
            Archetype::Vampire,
            Archetype::Undead,
            Archetype::Daemon,
        ]
    }

    pub fn faction(&self) -> Faction {
        match self {
            Archetype::Swordsman | Archetype::Bowman | Archetype::Magician => Faction::Player,
            Archetype::Vampire | Archetype::Undead | Archetype::Daemon => Faction::Computer,
        }
    }

    /// Get base properties for this archetype
    pub fn base_properties(&self) -> ArchetypeProperties {
        match self {
            Archetype::Swordsman | Archetype::Undead => ArchetypeProperties {
                attack: 40,
                defence: 10,
                move_range: 4,
                attack_range: 1,
            },

            Archetype::Bowman | Archetype::Vampire => ArchetypeProperties {
                attack: 25,
                defence: 25,
                move_range: 2,
                attack_range: 2,
            },

            Archetype::Magician => ArchetypeProperties {
                attack: 10,
                defence: 40,
                move_range: 1,
                attack_range: 4,
            },

            Archetype::Daemon => ArchetypeProperties {
                attack: 10,
                defence: 10,
                move_range: 1,
                attack_range: 4,
            },
        }
    }

    /// Name used in snapshots
    pub fn name(&self) -> &'static str {
        match self {
            Archetype::Swordsman => "swordsman",
            Archetype::Bowman => "bowman",
            Archetype::Magician => "magician",
            Archetype::Vampire => "vampire",
            Archetype::Undead => "undead",
            Archetype::Daemon => "daemon",
        }
    }
}

impl fmt::Display for Archetype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Archetype {
    type Err = TacticsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Archetype::all()
            .into_iter()
            .find(|a| a.name() == s)
            .ok_or_else(|| TacticsError::InvalidArchetype(s.to_string()))
    }
}
