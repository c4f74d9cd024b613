//! Squad generation: random team composition and spawn placement

use rand::seq::SliceRandom;
use rand::Rng;

use crate::battle::archetype::Archetype;
use crate::battle::character::Character;
use crate::battle::constants::{MAX_LEVEL, MIN_LEVEL, SPAWN_BAND_WIDTH};
use crate::battle::geometry::column_positions;
use crate::core::error::{Result, TacticsError};
use crate::core::types::{CellIndex, Faction};

/// An ordered group of characters, in creation order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Team {
    pub characters: Vec<Character>,
}

impl Team {
    pub fn new(characters: Vec<Character>) -> Self {
        Self { characters }
    }

    pub fn len(&self) -> usize {
        self.characters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.characters.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Character> {
        self.characters.iter()
    }
}

impl IntoIterator for Team {
    type Item = Character;
    type IntoIter = std::vec::IntoIter<Character>;

    fn into_iter(self) -> Self::IntoIter {
        self.characters.into_iter()
    }
}

/// Draw one (archetype, level) pair; level is uniform in `1..=max_level`
pub fn draw<R: Rng + ?Sized>(
    rng: &mut R,
    allowed: &[Archetype],
    max_level: u8,
) -> Result<(Archetype, u8)> {
    let archetype = *allowed.choose(rng).ok_or(TacticsError::EmptyRoster)?;
    let level = rng.gen_range(MIN_LEVEL..=max_level.clamp(MIN_LEVEL, MAX_LEVEL));
    Ok((archetype, level))
}

/// Endless stream of random characters
///
/// Each call to `next` draws a fresh pair; take as many as needed.
pub fn character_stream<'a, R: Rng + ?Sized>(
    rng: &'a mut R,
    allowed: &'a [Archetype],
    max_level: u8,
) -> Result<impl Iterator<Item = Character> + 'a> {
    if allowed.is_empty() {
        return Err(TacticsError::EmptyRoster);
    }
    // `draw` only fails on an empty roster, ruled out above
    Ok(std::iter::repeat_with(move || draw(&mut *rng, allowed, max_level))
        .map_while(|drawn| drawn.ok())
        .map(|(archetype, level)| Character::new(archetype, level)))
}

/// Build a team of `count` random characters
pub fn generate_team<R: Rng + ?Sized>(
    rng: &mut R,
    allowed: &[Archetype],
    max_level: u8,
    count: usize,
) -> Result<Team> {
    let characters = character_stream(rng, allowed, max_level)?.take(count).collect();
    Ok(Team::new(characters))
}

/// Pick `count` distinct cells from `available`
pub fn pick_unique<R: Rng + ?Sized>(
    rng: &mut R,
    available: &[CellIndex],
    count: usize,
) -> Result<Vec<CellIndex>> {
    if count > available.len() {
        return Err(TacticsError::OutOfRange {
            requested: count,
            available: available.len(),
        });
    }

    let mut cells = available.to_vec();
    let (picked, _) = cells.partial_shuffle(rng, count);
    Ok(picked.to_vec())
}

/// Columns a faction spawns in: two leftmost for the player, two rightmost for the computer
pub fn spawn_columns(faction: Faction, board_size: usize) -> Vec<usize> {
    match faction {
        Faction::Player => (0..SPAWN_BAND_WIDTH).collect(),
        Faction::Computer => (board_size.saturating_sub(SPAWN_BAND_WIDTH)..board_size).collect(),
    }
}

/// Random distinct spawn cells for `count` characters of a faction
pub fn spawn_positions<R: Rng + ?Sized>(
    rng: &mut R,
    faction: Faction,
    board_size: usize,
    count: usize,
) -> Result<Vec<CellIndex>> {
    let band = column_positions(board_size, &spawn_columns(faction, board_size));
    pick_unique(rng, &band, count)
}
