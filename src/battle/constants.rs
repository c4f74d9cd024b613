//! Battle constants - all tunable values in one place

// Levels
pub const MIN_LEVEL: u8 = 1;
pub const MAX_LEVEL: u8 = 4;

// Health
pub const BASE_HEALTH: f64 = 100.0;
pub const MAX_HEALTH: f64 = 100.0;
pub const LEVEL_UP_HEAL: f64 = 80.0;

/// Stat growth on level-up is `stat * (LEVEL_UP_GROWTH_BASE + health) / 100`
pub const LEVEL_UP_GROWTH_BASE: f64 = 80.0;

// Combat: damage never drops below this fraction of the attacker's attack
pub const MIN_DAMAGE_FRACTION: f64 = 0.1;

// Health bar thresholds
pub const HEALTH_CRITICAL_BELOW: f64 = 15.0;
pub const HEALTH_NORMAL_BELOW: f64 = 50.0;

// Board
pub const MIN_BOARD_SIZE: usize = 4;
pub const SPAWN_BAND_WIDTH: usize = 2;
