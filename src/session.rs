//! Async session - one task that owns the controller
//!
//! Commands arrive over an mpsc channel. The thinking delay and damage
//! acknowledgments are awaited in the same `select!` loop, so every state
//! transition happens on this task and nothing resolves out of order.

use std::pin::Pin;

use tokio::sync::mpsc;
use tokio::time::{sleep, Sleep};
use tracing::{debug, info};

use crate::battle::engine::{GameController, Step, ThinkTicket};
use crate::core::error::{Result, ValidationError};
use crate::core::types::CellIndex;
use crate::persistence::store::StateStore;
use crate::ui::{DamageSignal, GamePlay};

/// Input for a running session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Click(CellIndex),
    Enter(CellIndex),
    Leave(CellIndex),
    Select(CellIndex),
    Move { from: CellIndex, to: CellIndex },
    Attack { attacker: CellIndex, target: CellIndex },
    NewGame,
    SaveGame,
    LoadGame,
    /// Render the current board again
    Redraw,
}

/// Work the session is waiting on
enum Deferred {
    Idle,
    Damage(DamageSignal),
    Think {
        ticket: ThinkTicket,
        timer: Pin<Box<Sleep>>,
    },
}

impl Deferred {
    fn is_pending(&self) -> bool {
        !matches!(self, Deferred::Idle)
    }

    /// Resolves when the deferred work may resume. Cancel-safe.
    async fn ready(&mut self) {
        match self {
            Deferred::Idle => std::future::pending().await,
            Deferred::Damage(signal) => signal.wait().await,
            Deferred::Think { timer, .. } => timer.as_mut().await,
        }
    }
}

enum Event {
    Command(Option<Command>),
    Ready,
}

/// Drives a [`GameController`] until its command channel closes
pub struct Session<G: GamePlay, S: StateStore> {
    controller: GameController<G, S>,
    deferred: Deferred,
}

impl<G: GamePlay, S: StateStore> Session<G, S> {
    pub fn new(controller: GameController<G, S>) -> Self {
        Self {
            controller,
            deferred: Deferred::Idle,
        }
    }

    /// Start the game and process commands
    ///
    /// When the channel closes, outstanding deferred work is finished before
    /// the controller is handed back.
    pub async fn run(mut self, mut commands: mpsc::Receiver<Command>) -> Result<GameController<G, S>> {
        let step = self.controller.start()?;
        self.schedule(step);

        loop {
            let event = tokio::select! {
                command = commands.recv() => Event::Command(command),
                () = self.deferred.ready(), if self.deferred.is_pending() => Event::Ready,
            };

            match event {
                Event::Command(Some(command)) => self.handle(command)?,
                Event::Command(None) => break,
                Event::Ready => self.resume()?,
            }
        }

        while self.deferred.is_pending() {
            self.deferred.ready().await;
            self.resume()?;
        }
        info!("Session closed");
        Ok(self.controller)
    }

    fn handle(&mut self, command: Command) -> Result<()> {
        debug!(?command, "Command");
        match command {
            Command::Click(cell) => {
                let result = self.controller.click_cell(cell);
                self.apply(result);
            }
            Command::Enter(cell) => {
                self.controller.enter_cell(cell);
            }
            Command::Leave(cell) => self.controller.leave_cell(cell),
            Command::Select(cell) => {
                if let Err(e) = self.controller.select_character(cell) {
                    self.controller.report_rejection(&e);
                }
            }
            Command::Move { from, to } => {
                let result = self.controller.move_character(from, to);
                self.apply(result);
            }
            Command::Attack { attacker, target } => {
                let result = self.controller.attack_character(attacker, target);
                self.apply(result);
            }
            Command::NewGame => {
                let step = self.controller.new_game()?;
                self.schedule(step);
            }
            Command::SaveGame => {
                // Failures are already shown to the player
                let _ = self.controller.save_game();
            }
            Command::LoadGame => {
                if let Some(step) = self.controller.load_game()? {
                    self.schedule(step);
                }
            }
            Command::Redraw => self.controller.redraw(),
        }
        Ok(())
    }

    fn apply(&mut self, result: std::result::Result<Step, ValidationError>) {
        match result {
            Ok(step) if step.is_idle() => {}
            Ok(step) => self.schedule(step),
            Err(e) => self.controller.report_rejection(&e),
        }
    }

    /// Replace whatever was pending with `step`
    fn schedule(&mut self, step: Step) {
        self.deferred = match step {
            Step::Idle => Deferred::Idle,
            Step::AwaitDamage(signal) => Deferred::Damage(signal),
            Step::Think(ticket) => Deferred::Think {
                ticket,
                timer: Box::pin(sleep(self.controller.config().thinking_delay())),
            },
        };
    }

    fn resume(&mut self) -> Result<()> {
        let step = match std::mem::replace(&mut self.deferred, Deferred::Idle) {
            Deferred::Idle => return Ok(()),
            Deferred::Damage(_) => self.controller.complete_damage()?,
            Deferred::Think { ticket, .. } => self.controller.computer_turn(ticket)?,
        };
        self.schedule(step);
        Ok(())
    }
}
