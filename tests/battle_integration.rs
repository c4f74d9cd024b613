//! Battle integration tests - full turns through the public API

use retro_tactics::battle::*;
use retro_tactics::core::types::{CellIndex, Faction, Turn};
use retro_tactics::core::{GameConfig, ValidationError};
use retro_tactics::persistence::{FileStore, MemoryStore, StateStore};
use retro_tactics::ui::RecordingGamePlay;

fn seeded_config(seed: u64) -> GameConfig {
    GameConfig {
        seed: Some(seed),
        thinking_delay_ms: 0,
        ..GameConfig::default()
    }
}

fn new_controller() -> GameController<RecordingGamePlay, MemoryStore> {
    GameController::new(seeded_config(42), RecordingGamePlay::new(), MemoryStore::new()).unwrap()
}

fn board_state(characters: &[(Archetype, u8, CellIndex)]) -> GameState {
    let mut state = GameState::new(8);
    for &(archetype, level, cell) in characters {
        state
            .board
            .place(PositionedCharacter::new(Character::new(archetype, level), cell))
            .unwrap();
    }
    state
}

/// Run deferred steps until the engine is idle again
fn settle(game: &mut GameController<RecordingGamePlay, MemoryStore>, mut step: Step) {
    loop {
        step = match step {
            Step::Idle => return,
            Step::AwaitDamage(_) => game.complete_damage().unwrap(),
            Step::Think(ticket) => game.computer_turn(ticket).unwrap(),
        };
    }
}

#[test]
fn test_fresh_game_setup() {
    let mut game = new_controller();
    let step = game.start().unwrap();
    assert!(step.is_idle());

    let state = game.state();
    assert_eq!(state.level, 1);
    assert_eq!(state.score, 0);
    assert_eq!(state.max_score, 0);
    assert_eq!(state.current_turn, Some(Turn::Player));
    assert_eq!(state.selected, None);

    let players: Vec<_> = state.board.members(Faction::Player).collect();
    let enemies: Vec<_> = state.board.members(Faction::Computer).collect();
    assert_eq!(players.len(), 2);
    assert_eq!(enemies.len(), 2);
    for p in players {
        assert_eq!(p.character.level(), 1);
        assert!(matches!(p.position % 8, 0 | 1));
    }
    for e in enemies {
        assert_eq!(e.character.level(), 1);
        assert!(matches!(e.position % 8, 6 | 7));
    }

    let saved = game.store().load().unwrap().unwrap();
    assert_eq!(saved.current_turn, Some(Turn::Player));
    assert_eq!(saved.positions.len(), 4);
}

#[test]
fn test_swordsman_strikes_daemon_and_computer_replies() {
    let mut game = new_controller();
    game.set_state(board_state(&[
        (Archetype::Swordsman, 1, 0),
        (Archetype::Daemon, 1, 1),
        (Archetype::Undead, 1, 63),
    ]));

    let step = game.attack_character(0, 1).unwrap();
    assert_eq!(game.state().board.get(1).unwrap().character.health(), 70.0);
    assert_eq!(game.state().score, 30);
    settle(&mut game, step);

    // Daemon at 1 reaches the swordsman for the minimum 1 damage
    assert_eq!(game.state().board.get(0).unwrap().character.health(), 99.0);
    assert_eq!(game.state().current_turn, Some(Turn::Player));
    assert_eq!(game.state().score, 30);

    let saved = game.store().load().unwrap().unwrap();
    assert_eq!(saved.score, 30);
    assert_eq!(saved.current_turn, Some(Turn::Player));
}

#[test]
fn test_magician_damage_floor() {
    let mut game = new_controller();
    game.set_state(board_state(&[
        (Archetype::Magician, 1, 0),
        (Archetype::Vampire, 1, 4),
        (Archetype::Vampire, 1, 63),
    ]));

    // attack 10 vs defence 25: floored at 10% of attack
    game.attack_character(0, 4).unwrap();
    assert_eq!(game.state().board.get(4).unwrap().character.health(), 99.0);
    assert_eq!(game.state().score, 1);
}

#[test]
fn test_clearing_the_level_advances() {
    let mut game = new_controller();
    let mut state = board_state(&[
        (Archetype::Bowman, 1, 0),
        (Archetype::Swordsman, 1, 9),
        (Archetype::Vampire, 1, 10),
    ]);
    state.board.get_mut(0).unwrap().character.set_health(60.0);
    state.board.get_mut(10).unwrap().character.set_health(5.0);
    state.score = 12;
    game.set_state(state);

    let step = game.click_cell(9).unwrap();
    assert!(step.is_idle());
    let step = game.click_cell(10).unwrap();
    settle(&mut game, step);

    let state = game.state();
    assert_eq!(state.level, 2);
    assert_eq!(state.current_turn, Some(Turn::Player));
    assert_eq!(state.score, 27);
    assert_eq!(state.max_score, 27);

    // Survivors level up in board order: bowman healed from 60 to 100
    let players: Vec<_> = state.board.members(Faction::Player).collect();
    assert_eq!(players.len(), 2);
    assert_eq!(players[0].character.archetype(), Archetype::Bowman);
    assert_eq!(players[0].character.level(), 2);
    assert_eq!(players[0].character.health(), 100.0);
    assert_eq!(players[0].character.attack(), 35);

    // One more enemy than survivors, at most the new level
    let enemies: Vec<_> = state.board.members(Faction::Computer).collect();
    assert_eq!(enemies.len(), 3);
    assert!(enemies.iter().all(|e| e.character.level() <= 2));
    assert!(enemies.iter().all(|e| e.position % 8 >= 6));
}

#[test]
fn test_losing_the_squad_ends_the_game() {
    let mut game = new_controller();
    let mut state = board_state(&[(Archetype::Bowman, 1, 0), (Archetype::Undead, 1, 1)]);
    state.board.get_mut(0).unwrap().character.set_health(10.0);
    state.score = 90;
    state.max_score = 50;
    state.current_turn = Some(Turn::Computer);
    let step = game.set_state(state);
    settle(&mut game, step);

    let state = game.state();
    assert!(state.is_finished());
    assert_eq!(state.board.count(Faction::Player), 0);
    assert_eq!(state.max_score, 90);
    assert_eq!(game.click_cell(1).unwrap_err(), ValidationError::GameOver);

    let saved = game.store().load().unwrap().unwrap();
    assert_eq!(saved.current_turn, None);

    game.new_game().unwrap();
    assert_eq!(game.state().score, 0);
    assert_eq!(game.state().max_score, 90);
    assert_eq!(game.state().current_turn, Some(Turn::Player));
}

#[test]
fn test_load_during_computer_turn_unblocks_input() {
    let mut game = new_controller();
    game.set_state(board_state(&[
        (Archetype::Swordsman, 1, 0),
        (Archetype::Vampire, 1, 63),
    ]));

    let stale = game.move_character(0, 4).unwrap();
    assert!(game.is_busy());
    assert_eq!(game.select_character(4), Err(ValidationError::NotYourTurn));

    // The autosave holds the moved swordsman and the computer's turn
    let step = game.load_game().unwrap().unwrap();
    assert!(step.is_idle());
    assert!(!game.is_busy());
    assert_eq!(game.state().current_turn, Some(Turn::Player));
    assert!(game.select_character(4).is_ok());

    // The thinking step scheduled before the load does nothing
    settle(&mut game, stale);
    assert_eq!(game.state().board.faction_at(63), Some(Faction::Computer));
    assert_eq!(game.state().selected, Some(4));
}

#[test]
fn test_file_store_resumes_between_sessions() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("save.json");

    let mut first = GameController::new(
        seeded_config(5),
        RecordingGamePlay::new(),
        FileStore::new(&path),
    )
    .unwrap();
    first.start().unwrap();
    let expected = first.state().clone();
    drop(first);

    let mut second = GameController::new(
        seeded_config(99),
        RecordingGamePlay::new(),
        FileStore::new(&path),
    )
    .unwrap();
    second.start().unwrap();
    assert_eq!(second.state(), &expected);
    assert!(second.gameplay().errors().is_empty());
}

#[test]
fn test_corrupt_save_file_starts_fresh() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("save.json");
    std::fs::write(&path, r#"{"currentTurn":"player","positions":"#).unwrap();

    let mut game = GameController::new(
        seeded_config(8),
        RecordingGamePlay::new(),
        FileStore::new(&path),
    )
    .unwrap();
    game.start().unwrap();

    assert_eq!(game.state().board.positions().len(), 4);
    assert_eq!(game.gameplay().errors().len(), 1);
    // The fresh game replaced the corrupt file
    assert!(FileStore::new(&path).load().unwrap().is_some());
}
