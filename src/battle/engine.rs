//! Turn engine - the game's state machine
//!
//! Player turn -> (damage shown) -> computer turn -> (thinking) -> player turn,
//! until one squad is gone. Deferred work is handed back to the caller as a
//! [`Step`]; the caller resumes the engine with `complete_damage` or
//! `computer_turn` once the wait is over.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info, warn};

use crate::battle::ai::{AiAction, GreedyCommander, TacticsAI};
use crate::battle::board::{Board, PositionedCharacter};
use crate::battle::character::Character;
use crate::battle::constants::{MAX_LEVEL, MIN_LEVEL};
use crate::battle::geometry::{attack_cells, move_cells};
use crate::battle::resolution::strike;
use crate::battle::squad::{generate_team, spawn_positions, Team};
use crate::battle::state::GameState;
use crate::core::config::GameConfig;
use crate::core::error::{Result, TacticsError, ValidationError};
use crate::core::types::{CellIndex, Faction, Turn};
use crate::persistence::snapshot::Snapshot;
use crate::persistence::store::StateStore;
use crate::ui::{CellTint, CursorKind, DamageSignal, GamePlay};

/// Identifies one scheduled computer turn; stale tickets are ignored
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThinkTicket(u64);

/// What the engine is waiting for after an operation
#[derive(Debug)]
pub enum Step {
    /// Nothing deferred
    Idle,
    /// Call `complete_damage` once the signal fires
    AwaitDamage(DamageSignal),
    /// Call `computer_turn` with the ticket after the thinking delay
    Think(ThinkTicket),
}

impl Step {
    pub fn is_idle(&self) -> bool {
        matches!(self, Step::Idle)
    }
}

/// Hover feedback for a cell
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CellHint {
    pub cursor: CursorKind,
    pub tint: Option<CellTint>,
    pub tooltip: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LevelCheck {
    Continue,
    LevelAdvanced,
    Finished,
}

/// Attack whose damage is applied but whose aftermath is not
#[derive(Debug, Clone, Copy)]
struct PendingDamage {
    by: Turn,
    target: CellIndex,
}

/// Owns the game state and is its only mutator
pub struct GameController<G: GamePlay, S: StateStore> {
    config: GameConfig,
    state: GameState,
    gameplay: G,
    store: S,
    ai: Box<dyn TacticsAI + Send>,
    rng: ChaCha8Rng,
    /// Set for the whole computer turn, thinking delay included
    busy: bool,
    pending_damage: Option<PendingDamage>,
    /// Explicit save requested while an attack was still resolving
    save_after_damage: bool,
    think_generation: u64,
}

impl<G: GamePlay, S: StateStore> GameController<G, S> {
    /// Create a controller; call `start` to begin playing
    pub fn new(config: GameConfig, gameplay: G, store: S) -> Result<Self> {
        config.validate()?;
        let rng = match config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };

        Ok(Self {
            state: GameState::new(config.board_size),
            config,
            gameplay,
            store,
            ai: Box::new(GreedyCommander::new()),
            rng,
            busy: false,
            pending_damage: None,
            save_after_damage: false,
            think_generation: 0,
        })
    }

    /// Replace the computer opponent
    pub fn with_ai(mut self, ai: impl TacticsAI + Send + 'static) -> Self {
        self.ai = Box::new(ai);
        self
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn gameplay(&self) -> &G {
        &self.gameplay
    }

    pub fn gameplay_mut(&mut self) -> &mut G {
        &mut self.gameplay
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    /// True while a computer turn is in flight
    pub fn is_busy(&self) -> bool {
        self.busy
    }

    pub fn has_pending_damage(&self) -> bool {
        self.pending_damage.is_some()
    }

    // === LIFECYCLE ===

    /// Resume the saved game if there is a valid one, otherwise start fresh
    pub fn start(&mut self) -> Result<Step> {
        match self.store.load() {
            Ok(Some(snapshot)) => match snapshot.restore(self.config.board_size) {
                Ok(state) => {
                    info!(level = state.level, score = state.score, "Resuming saved game");
                    return Ok(self.adopt_loaded(state));
                }
                Err(e) => self.report_load_failure(&e),
            },
            Ok(None) => {}
            Err(e) => self.report_load_failure(&e),
        }
        self.new_game()
    }

    /// Start over at level 1. The best score carries over.
    pub fn new_game(&mut self) -> Result<Step> {
        let mut state = GameState::new(self.config.board_size);
        state.max_score = self.state.max_score.max(self.state.score);

        let team_size = self.config.team_size;
        let players = generate_team(
            &mut self.rng,
            &self.config.player_archetypes,
            MIN_LEVEL,
            team_size,
        )?;
        let enemies = generate_team(
            &mut self.rng,
            &self.config.computer_archetypes,
            MIN_LEVEL,
            team_size,
        )?;
        deploy(&mut self.rng, &mut state.board, players, Faction::Player)?;
        deploy(&mut self.rng, &mut state.board, enemies, Faction::Computer)?;

        info!(max_score = state.max_score, "New game");
        let step = self.set_state(state);
        self.persist();
        Ok(step)
    }

    /// Replace the whole state, dropping any in-flight turn
    ///
    /// A state whose turn belongs to the computer schedules a fresh computer turn.
    pub fn set_state(&mut self, state: GameState) -> Step {
        self.state = state;
        self.busy = false;
        self.pending_damage = None;
        self.save_after_damage = false;
        self.think_generation += 1;

        self.gameplay
            .draw_board(self.state.board.size(), self.state.level);
        self.gameplay.redraw_positions(self.state.positions());
        if let Some(cell) = self.state.selected {
            self.gameplay.select_cell(cell, CellTint::Yellow);
        }

        match self.state.current_turn {
            Some(Turn::Player) => Step::Idle,
            Some(Turn::Computer) => self.enter_computer_turn(),
            None => {
                let message = format!("Game over. Final score: {}", self.state.score);
                self.gameplay.show_message(&message);
                Step::Idle
            }
        }
    }

    /// Install a restored state. A computer turn cut off by the save cannot be
    /// resumed, so the move goes to the player.
    fn adopt_loaded(&mut self, mut state: GameState) -> Step {
        if state.current_turn == Some(Turn::Computer) {
            debug!("Saved during the computer turn, handing the move to the player");
            state.current_turn = Some(Turn::Player);
        }
        self.set_state(state)
    }

    /// Render the board again without changing anything
    pub fn redraw(&mut self) {
        self.gameplay.redraw_positions(self.state.positions());
    }

    /// Write the current state to the store
    ///
    /// During an attack the board still holds its casualties and the turn has
    /// not moved on, so the save waits until the attack resolves.
    pub fn save_game(&mut self) -> Result<()> {
        if self.pending_damage.is_some() {
            debug!("Save requested mid-attack, deferring until damage resolves");
            self.save_after_damage = true;
            return Ok(());
        }
        match self.store.save(&Snapshot::capture(&self.state)) {
            Ok(()) => {
                info!(level = self.state.level, score = self.state.score, "Game saved");
                self.gameplay.show_message("Game saved");
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "Save failed");
                self.gameplay.show_error(&format!("Failed to save game: {}", e));
                Err(e)
            }
        }
    }

    /// Replace the state with the stored one
    ///
    /// Returns `None` when nothing is stored (state untouched). A corrupt or
    /// unreadable snapshot is reported and a fresh game is started instead.
    pub fn load_game(&mut self) -> Result<Option<Step>> {
        match self.store.load() {
            Ok(None) => {
                self.gameplay.show_message("No saved game");
                Ok(None)
            }
            Ok(Some(snapshot)) => match snapshot.restore(self.config.board_size) {
                Ok(state) => {
                    info!(level = state.level, score = state.score, "Game loaded");
                    self.gameplay.show_message("Game loaded");
                    Ok(Some(self.adopt_loaded(state)))
                }
                Err(e) => {
                    self.report_load_failure(&e);
                    self.new_game().map(Some)
                }
            },
            Err(e) => {
                self.report_load_failure(&e);
                self.new_game().map(Some)
            }
        }
    }

    // === PLAYER ACTIONS ===

    /// Select a player character
    pub fn select_character(&mut self, cell: CellIndex) -> std::result::Result<(), ValidationError> {
        self.check_can_act()?;
        self.check_bounds(cell)?;
        self.friendly_at(cell)?;

        if let Some(previous) = self.state.selected.take() {
            self.gameplay.deselect_cell(previous);
        }
        self.gameplay.select_cell(cell, CellTint::Yellow);
        self.state.selected = Some(cell);
        debug!(cell, "Selected character");
        Ok(())
    }

    /// Move a player character to an empty cell in its move range
    pub fn move_character(
        &mut self,
        from: CellIndex,
        to: CellIndex,
    ) -> std::result::Result<Step, ValidationError> {
        self.check_can_act()?;
        self.check_bounds(from)?;
        self.check_bounds(to)?;
        let mover = self.friendly_at(from)?;

        if self.state.board.is_occupied(to) {
            return Err(ValidationError::CellOccupied(to));
        }
        if !move_cells(&mover.character, from, self.state.board.size()).contains(&to) {
            return Err(ValidationError::MoveOutOfRange(to));
        }

        self.state.board.relocate(from, to)?;
        debug!(from, to, "Player moved");

        self.clear_selection();
        self.gameplay.redraw_positions(self.state.positions());
        let step = self.enter_computer_turn();
        self.persist();
        Ok(step)
    }

    /// Attack an enemy in range. Health changes now; the rest waits for `complete_damage`.
    pub fn attack_character(
        &mut self,
        attacker_at: CellIndex,
        target_at: CellIndex,
    ) -> std::result::Result<Step, ValidationError> {
        self.check_can_act()?;
        self.check_bounds(attacker_at)?;
        self.check_bounds(target_at)?;
        let attacker = self.friendly_at(attacker_at)?;

        match self.state.board.faction_at(target_at) {
            None => return Err(ValidationError::EmptyCell(target_at)),
            Some(Faction::Player) => return Err(ValidationError::NotAnEnemy(target_at)),
            Some(Faction::Computer) => {}
        }
        if !attack_cells(&attacker.character, attacker_at, self.state.board.size())
            .contains(&target_at)
        {
            return Err(ValidationError::AttackOutOfRange(target_at));
        }

        self.begin_strike(attacker_at, target_at, Turn::Player)
    }

    /// Click on a cell: select, move or attack depending on what is there
    pub fn click_cell(&mut self, cell: CellIndex) -> std::result::Result<Step, ValidationError> {
        self.check_can_act()?;
        self.check_bounds(cell)?;

        match self.state.board.faction_at(cell) {
            Some(Faction::Player) => {
                self.select_character(cell)?;
                Ok(Step::Idle)
            }
            Some(Faction::Computer) => {
                let selected = self
                    .state
                    .selected_friendly()
                    .ok_or(ValidationError::NotFriendly(cell))?;
                self.attack_character(selected, cell)
            }
            None => {
                let selected = self
                    .state
                    .selected_friendly()
                    .ok_or(ValidationError::NoSelection)?;
                self.move_character(selected, cell)
            }
        }
    }

    /// Show a rejected action to the player
    pub fn report_rejection(&mut self, error: &ValidationError) {
        debug!(%error, "Action rejected");
        self.gameplay.show_error(&error.to_string());
    }

    // === HOVER ===

    /// Feedback for hovering `cell`, without touching the renderer
    pub fn hint_for(&self, cell: CellIndex) -> CellHint {
        let board = &self.state.board;
        if !board.in_bounds(cell) {
            return CellHint::default();
        }

        let tooltip = board.get(cell).map(|p| p.character.tooltip());
        if self.check_can_act().is_err() {
            return CellHint {
                cursor: CursorKind::NotAllowed,
                tint: None,
                tooltip,
            };
        }

        let occupant = board.faction_at(cell);
        let selected = self
            .state
            .selected_friendly()
            .and_then(|at| board.get(at));
        let size = board.size();
        let (cursor, tint) = match (occupant, selected) {
            (Some(Faction::Player), _) => (CursorKind::Pointer, None),
            (None, None) => (CursorKind::Auto, None),
            (Some(Faction::Computer), None) => (CursorKind::NotAllowed, None),
            (None, Some(p)) if move_cells(&p.character, p.position, size).contains(&cell) => {
                (CursorKind::Pointer, Some(CellTint::Green))
            }
            (Some(Faction::Computer), Some(p))
                if attack_cells(&p.character, p.position, size).contains(&cell) =>
            {
                (CursorKind::Crosshair, Some(CellTint::Red))
            }
            _ => (CursorKind::NotAllowed, None),
        };

        CellHint {
            cursor,
            tint,
            tooltip,
        }
    }

    /// Pointer entered a cell
    pub fn enter_cell(&mut self, cell: CellIndex) -> CellHint {
        let hint = self.hint_for(cell);
        if let Some(text) = &hint.tooltip {
            self.gameplay.show_tooltip(cell, text);
        }
        self.gameplay.set_cursor(hint.cursor);
        if let Some(tint) = hint.tint {
            self.gameplay.select_cell(cell, tint);
        }
        hint
    }

    /// Pointer left a cell
    pub fn leave_cell(&mut self, cell: CellIndex) {
        self.gameplay.hide_tooltip(cell);
        self.gameplay.set_cursor(CursorKind::Auto);
        if self.state.selected != Some(cell) {
            self.gameplay.deselect_cell(cell);
        }
    }

    // === DEFERRED PHASES ===

    /// Second phase of an attack: remove the defeated and move the game on
    pub fn complete_damage(&mut self) -> Result<Step> {
        let Some(pending) = self.pending_damage.take() else {
            warn!("Damage completion with no attack pending");
            return Ok(Step::Idle);
        };

        for fallen in self.state.board.remove_defeated() {
            info!(
                cell = fallen.position,
                archetype = %fallen.character.archetype(),
                "Character defeated"
            );
        }
        debug!(by = ?pending.by, target = pending.target, "Damage resolved");

        self.clear_selection();
        self.gameplay.redraw_positions(self.state.positions());

        let step = match self.check_level_and_game_over()? {
            LevelCheck::Finished | LevelCheck::LevelAdvanced => Step::Idle,
            LevelCheck::Continue => match pending.by {
                Turn::Player => self.enter_computer_turn(),
                Turn::Computer => {
                    self.leave_computer_turn();
                    Step::Idle
                }
            },
        };
        if std::mem::take(&mut self.save_after_damage) {
            // Failures are already shown to the player
            let _ = self.save_game();
        } else {
            self.persist();
        }
        Ok(step)
    }

    /// Run the computer's move for a scheduled turn
    pub fn computer_turn(&mut self, ticket: ThinkTicket) -> Result<Step> {
        if ticket.0 != self.think_generation
            || self.state.current_turn != Some(Turn::Computer)
            || self.pending_damage.is_some()
        {
            warn!(?ticket, "Ignoring stale computer turn");
            return Ok(Step::Idle);
        }
        // Each ticket runs at most once
        self.think_generation += 1;

        match self.ai.decide(&self.state.board) {
            Some(AiAction::Attack { attacker, target }) => {
                match self.begin_strike(attacker, target, Turn::Computer) {
                    Ok(step) => return Ok(step),
                    Err(e) => warn!(error = %e, "Computer attack was invalid"),
                }
            }
            Some(AiAction::Move { from, to }) => match self.state.board.relocate(from, to) {
                Ok(()) => {
                    debug!(from, to, "Computer moved");
                    self.gameplay.redraw_positions(self.state.positions());
                }
                Err(e) => warn!(error = %e, "Computer move was invalid"),
            },
            None => debug!("Computer has no action"),
        }

        self.leave_computer_turn();
        self.persist();
        Ok(Step::Idle)
    }

    // === INTERNALS ===

    fn check_can_act(&self) -> std::result::Result<(), ValidationError> {
        match self.state.current_turn {
            None => Err(ValidationError::GameOver),
            Some(Turn::Player) if !self.busy && self.pending_damage.is_none() => Ok(()),
            Some(_) => Err(ValidationError::NotYourTurn),
        }
    }

    fn check_bounds(&self, cell: CellIndex) -> std::result::Result<(), ValidationError> {
        if self.state.board.in_bounds(cell) {
            Ok(())
        } else {
            Err(ValidationError::OutsideBoard(cell))
        }
    }

    fn friendly_at(&self, cell: CellIndex) -> std::result::Result<&PositionedCharacter, ValidationError> {
        let positioned = self
            .state
            .board
            .get(cell)
            .ok_or(ValidationError::EmptyCell(cell))?;
        if positioned.faction() != Faction::Player {
            return Err(ValidationError::NotFriendly(cell));
        }
        Ok(positioned)
    }

    fn begin_strike(
        &mut self,
        attacker_at: CellIndex,
        target_at: CellIndex,
        by: Turn,
    ) -> std::result::Result<Step, ValidationError> {
        let result = strike(&mut self.state.board, attacker_at, target_at)?;
        self.state.score += result.score;
        debug!(
            attacker = attacker_at,
            target = target_at,
            damage = result.damage,
            lethal = result.lethal,
            "Attack"
        );

        let signal = self.gameplay.show_damage(target_at, result.damage);
        self.pending_damage = Some(PendingDamage {
            by,
            target: target_at,
        });
        Ok(Step::AwaitDamage(signal))
    }

    fn clear_selection(&mut self) {
        if let Some(cell) = self.state.selected.take() {
            self.gameplay.deselect_cell(cell);
        }
    }

    fn enter_computer_turn(&mut self) -> Step {
        self.state.current_turn = Some(Turn::Computer);
        self.busy = true;
        self.think_generation += 1;
        Step::Think(ThinkTicket(self.think_generation))
    }

    fn leave_computer_turn(&mut self) {
        self.state.current_turn = Some(Turn::Player);
        self.busy = false;
    }

    fn check_level_and_game_over(&mut self) -> Result<LevelCheck> {
        if self.state.board.count(Faction::Computer) == 0 {
            if self.state.level >= MAX_LEVEL {
                self.finish("Victory!");
                return Ok(LevelCheck::Finished);
            }
            self.advance_level()?;
            return Ok(LevelCheck::LevelAdvanced);
        }

        if self.state.board.count(Faction::Player) == 0 {
            self.finish("Defeat.");
            return Ok(LevelCheck::Finished);
        }

        Ok(LevelCheck::Continue)
    }

    fn finish(&mut self, headline: &str) {
        self.state.current_turn = None;
        self.state.selected = None;
        self.busy = false;
        self.state.record_max_score();
        info!(
            score = self.state.score,
            max_score = self.state.max_score,
            "Game over"
        );
        let message = format!("{} Final score: {}", headline, self.state.score);
        self.gameplay.show_message(&message);
    }

    /// Level up the survivors and face a new, larger computer squad
    ///
    /// The next board is built aside and only swapped in once both squads
    /// are placed, so a failure leaves the state as it was.
    fn advance_level(&mut self) -> Result<()> {
        let level = self.state.level + 1;

        let survivors: Vec<Character> = self
            .state
            .board
            .members(Faction::Player)
            .map(|p| {
                let mut character = p.character.clone();
                character.level_up();
                character
            })
            .collect();
        let enemies = generate_team(
            &mut self.rng,
            &self.config.computer_archetypes,
            level,
            survivors.len() + 1,
        )?;

        let mut board = Board::new(self.state.board.size());
        deploy(&mut self.rng, &mut board, Team::new(survivors), Faction::Player)?;
        deploy(&mut self.rng, &mut board, enemies, Faction::Computer)?;

        self.state.board = board;
        self.state.level = level;
        self.state.record_max_score();
        self.state.selected = None;
        self.state.current_turn = Some(Turn::Player);
        self.busy = false;

        info!(
            level = self.state.level,
            score = self.state.score,
            enemies = self.state.board.count(Faction::Computer),
            "Level advanced"
        );
        self.gameplay
            .draw_board(self.state.board.size(), self.state.level);
        self.gameplay.redraw_positions(self.state.positions());
        let message = format!("Level {}", self.state.level);
        self.gameplay.show_message(&message);
        Ok(())
    }

    fn persist(&mut self) {
        if let Err(e) = self.store.save(&Snapshot::capture(&self.state)) {
            warn!(error = %e, "Autosave failed");
            self.gameplay
                .show_error(&format!("Failed to save game: {}", e));
        }
    }

    fn report_load_failure(&mut self, error: &TacticsError) {
        warn!(error = %error, "Could not load saved game, starting a new one");
        self.gameplay
            .show_error(&format!("Could not load saved game: {}", error));
    }
}

/// Place a team in its faction's spawn band
fn deploy<R: Rng + ?Sized>(rng: &mut R, board: &mut Board, team: Team, faction: Faction) -> Result<()> {
    let cells = spawn_positions(rng, faction, board.size(), team.len())?;
    for (character, cell) in team.into_iter().zip(cells) {
        board.place(PositionedCharacter::new(character, cell))?;
    }
    Ok(())
}
