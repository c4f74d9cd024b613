//! Characters: archetype stats plus level and health
//!
//! A character can only be created from an archetype and a level. Creating at
//! level `L` is the same as creating at level 1 and leveling up `L - 1` times.

use serde::{Deserialize, Serialize};

use crate::battle::archetype::Archetype;
use crate::battle::constants::{
    BASE_HEALTH, HEALTH_CRITICAL_BELOW, HEALTH_NORMAL_BELOW, LEVEL_UP_GROWTH_BASE, LEVEL_UP_HEAL,
    MAX_HEALTH, MAX_LEVEL, MIN_LEVEL,
};
use crate::core::types::Faction;

/// Health bar band for display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthLevel {
    Critical,
    Normal,
    High,
}

impl HealthLevel {
    pub fn from_health(health: f64) -> Self {
        if health < HEALTH_CRITICAL_BELOW {
            HealthLevel::Critical
        } else if health < HEALTH_NORMAL_BELOW {
            HealthLevel::Normal
        } else {
            HealthLevel::High
        }
    }
}

/// A single fighter
#[derive(Debug, Clone, PartialEq)]
pub struct Character {
    archetype: Archetype,
    level: u8,
    attack: u32,
    defence: u32,
    /// Real-valued: damage is fractional
    health: f64,
}

impl Character {
    /// Create a character at `level` (clamped to 1..=4)
    pub fn new(archetype: Archetype, level: u8) -> Self {
        let base = archetype.base_properties();
        let mut character = Self {
            archetype,
            level: MIN_LEVEL,
            attack: base.attack,
            defence: base.defence,
            health: BASE_HEALTH,
        };

        let target = level.clamp(MIN_LEVEL, MAX_LEVEL);
        while character.level < target {
            character.level_up();
        }
        character
    }

    /// Apply one leveling step. Returns false (and changes nothing) at the cap.
    ///
    /// Attack and defence grow by `(80 + health)%` of their current value,
    /// using health from before the heal, and never shrink.
    pub fn level_up(&mut self) -> bool {
        if self.level >= MAX_LEVEL {
            return false;
        }

        let health = self.health;
        self.attack = grown_stat(self.attack, health);
        self.defence = grown_stat(self.defence, health);
        self.health = (health + LEVEL_UP_HEAL).min(MAX_HEALTH);
        self.level += 1;
        true
    }

    pub fn archetype(&self) -> Archetype {
        self.archetype
    }

    pub fn faction(&self) -> Faction {
        self.archetype.faction()
    }

    pub fn level(&self) -> u8 {
        self.level
    }

    pub fn attack(&self) -> u32 {
        self.attack
    }

    pub fn defence(&self) -> u32 {
        self.defence
    }

    pub fn health(&self) -> f64 {
        self.health
    }

    pub fn move_range(&self) -> usize {
        self.archetype.base_properties().move_range
    }

    pub fn attack_range(&self) -> usize {
        self.archetype.base_properties().attack_range
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0.0
    }

    /// Overwrite health, e.g. when restoring a saved battle
    pub fn set_health(&mut self, health: f64) {
        self.health = health;
    }

    /// Subtract damage from health. Health may drop below zero.
    pub fn take_damage(&mut self, damage: f64) {
        self.health -= damage;
    }

    /// Health as shown to the player: clamped to 0..=100, rounded up
    pub fn display_health(&self) -> u32 {
        self.health.clamp(0.0, MAX_HEALTH).ceil() as u32
    }

    pub fn health_level(&self) -> HealthLevel {
        HealthLevel::from_health(self.health)
    }

    /// Hover tooltip: medal level, swords attack, shield defence, heart health
    pub fn tooltip(&self) -> String {
        format!(
            "\u{1F396}{} \u{2694}{} \u{1F6E1}{} \u{2764}{}",
            self.level,
            self.attack,
            self.defence,
            self.display_health()
        )
    }
}

fn grown_stat(stat: u32, health: f64) -> u32 {
    let grown = (f64::from(stat) * (LEVEL_UP_GROWTH_BASE + health) / 100.0).floor();
    // Negative health can make `grown` negative; the max keeps the stat
    if grown <= f64::from(stat) {
        stat
    } else {
        grown as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_one_uses_base_stats() {
        let swordsman = Character::new(Archetype::Swordsman, 1);
        assert_eq!(swordsman.level(), 1);
        assert_eq!(swordsman.attack(), 40);
        assert_eq!(swordsman.defence(), 10);
        assert_eq!(swordsman.health(), 100.0);
        assert_eq!(swordsman.move_range(), 4);
        assert_eq!(swordsman.attack_range(), 1);
    }

    #[test]
    fn test_construction_levels_multiply_by_1_8() {
        // 40 -> 72 -> 129 -> 232, 10 -> 18 -> 32 -> 57
        let level4 = Character::new(Archetype::Undead, 4);
        assert_eq!(level4.level(), 4);
        assert_eq!(level4.attack(), 232);
        assert_eq!(level4.defence(), 57);
        assert_eq!(level4.health(), 100.0);

        let level2 = Character::new(Archetype::Bowman, 2);
        assert_eq!(level2.attack(), 45);
        assert_eq!(level2.defence(), 45);
    }

    #[test]
    fn test_level_is_clamped() {
        assert_eq!(Character::new(Archetype::Daemon, 0).level(), 1);
        assert_eq!(Character::new(Archetype::Daemon, 9).level(), 4);
    }

    #[test]
    fn test_level_up_uses_health_before_heal() {
        let mut magician = Character::new(Archetype::Magician, 1);
        magician.set_health(50.0);
        assert!(magician.level_up());

        // 10 * 130 / 100 = 13, 40 * 130 / 100 = 52
        assert_eq!(magician.attack(), 13);
        assert_eq!(magician.defence(), 52);
        assert_eq!(magician.health(), 100.0);
        assert_eq!(magician.level(), 2);
    }

    #[test]
    fn test_level_up_never_lowers_stats() {
        let mut bowman = Character::new(Archetype::Bowman, 1);
        bowman.set_health(1.0);
        assert!(bowman.level_up());

        // 25 * 81 / 100 = 20.25 -> guarded back to 25
        assert_eq!(bowman.attack(), 25);
        assert_eq!(bowman.defence(), 25);
        assert_eq!(bowman.health(), 81.0);
    }

    #[test]
    fn test_level_up_at_cap_is_noop() {
        let mut vampire = Character::new(Archetype::Vampire, 4);
        let before = vampire.clone();
        assert!(!vampire.level_up());
        assert_eq!(vampire, before);
    }

    #[test]
    fn test_damage_and_death() {
        let mut daemon = Character::new(Archetype::Daemon, 1);
        daemon.take_damage(30.0);
        assert_eq!(daemon.health(), 70.0);
        assert!(daemon.is_alive());

        daemon.take_damage(70.0);
        assert!(!daemon.is_alive());
        assert_eq!(daemon.display_health(), 0);
    }

    #[test]
    fn test_display_health_rounds_up() {
        let mut undead = Character::new(Archetype::Undead, 1);
        undead.set_health(0.5);
        assert_eq!(undead.display_health(), 1);
    }

    #[test]
    fn test_health_levels() {
        assert_eq!(HealthLevel::from_health(10.0), HealthLevel::Critical);
        assert_eq!(HealthLevel::from_health(15.0), HealthLevel::Normal);
        assert_eq!(HealthLevel::from_health(49.9), HealthLevel::Normal);
        assert_eq!(HealthLevel::from_health(50.0), HealthLevel::High);
    }

    #[test]
    fn test_tooltip_format() {
        let magician = Character::new(Archetype::Magician, 1);
        assert_eq!(magician.tooltip(), "\u{1F396}1 \u{2694}10 \u{1F6E1}40 \u{2764}100");
    }
}
