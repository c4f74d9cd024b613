//! Combat resolution: damage, health mutation, scoring
//!
//! Resolution is split in two phases. `strike` mutates health right away;
//! removing the defeated (`Board::remove_defeated`) waits until the damage has
//! been shown.

use crate::battle::board::Board;
use crate::battle::character::Character;
use crate::battle::constants::MIN_DAMAGE_FRACTION;
use crate::core::error::ValidationError;
use crate::core::types::{CellIndex, Faction};

/// Result of the immediate phase of an attack
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Strike {
    pub attacker: CellIndex,
    pub target: CellIndex,
    pub attacker_faction: Faction,
    pub damage: f64,
    /// Points earned by the attacker's side
    pub score: u64,
    /// Target health reached zero or below
    pub lethal: bool,
}

/// Damage dealt by `attacker` to `target`
///
/// `attack - defence`, but never less than 10% of attack. Deterministic.
pub fn calculate_damage(attacker: &Character, target: &Character) -> f64 {
    let attack = f64::from(attacker.attack());
    let defence = f64::from(target.defence());
    (attack - defence).max(attack * MIN_DAMAGE_FRACTION)
}

/// Points scored for dealing `damage`: only the player scores
pub fn score_for(faction: Faction, damage: f64) -> u64 {
    match faction {
        Faction::Player => damage.floor() as u64,
        Faction::Computer => 0,
    }
}

/// Apply an attack's damage on the board. Defeated targets stay on the board.
pub fn strike(
    board: &mut Board,
    attacker_at: CellIndex,
    target_at: CellIndex,
) -> Result<Strike, ValidationError> {
    let attacker = board
        .get(attacker_at)
        .ok_or(ValidationError::EmptyCell(attacker_at))?
        .character
        .clone();
    let target = board
        .get_mut(target_at)
        .ok_or(ValidationError::EmptyCell(target_at))?;

    let damage = calculate_damage(&attacker, &target.character);
    target.character.take_damage(damage);

    Ok(Strike {
        attacker: attacker_at,
        target: target_at,
        attacker_faction: attacker.faction(),
        damage,
        score: score_for(attacker.faction(), damage),
        lethal: !target.character.is_alive(),
    })
}
