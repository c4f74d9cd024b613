//! Retro Tactics - Entry Point
//!
//! Reads commands from stdin, forwards them to the game session and prints a
//! text board after every change.

use std::io::{self, BufRead};
use std::path::PathBuf;

use clap::Parser;
use tokio::runtime::Runtime;
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

use retro_tactics::core::config::{default_config_path, load_config};
use retro_tactics::core::types::CellIndex;
use retro_tactics::persistence::FileStore;
use retro_tactics::ui::TerminalGamePlay;
use retro_tactics::{Command, GameConfig, GameController, Result, Session};

#[derive(Parser, Debug)]
#[command(name = "retro-tactics")]
#[command(about = "Turn-based squad battles on a square board")]
struct Args {
    /// Config file (TOML); defaults to data/tactics.toml when present
    #[arg(long)]
    config: Option<PathBuf>,

    /// Where the game is saved after every turn
    #[arg(long, default_value = "retro-tactics-save.json")]
    save: PathBuf,

    /// Seed for squad generation
    #[arg(long)]
    seed: Option<u64>,

    /// Log filter, e.g. "retro_tactics=debug" (overrides RUST_LOG)
    #[arg(long)]
    log: Option<String>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let filter = match &args.log {
        Some(directives) => EnvFilter::new(directives),
        None => EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("retro_tactics=info")),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => {
            let path = default_config_path();
            if path.exists() {
                load_config(&path)?
            } else {
                GameConfig::default()
            }
        }
    };
    if args.seed.is_some() {
        config.seed = args.seed;
    }

    tracing::info!(save = %args.save.display(), "Retro Tactics starting...");

    let controller = GameController::new(config, TerminalGamePlay::new(), FileStore::new(&args.save))?;
    let rt = Runtime::new()?;
    let (tx, rx) = mpsc::channel(16);
    let session = rt.spawn(Session::new(controller).run(rx));

    print_help();
    for line in io::stdin().lock().lines() {
        let line = line?;
        let input = line.trim();

        if input.is_empty() {
            continue;
        }
        if input == "quit" || input == "q" {
            break;
        }
        if input == "help" {
            print_help();
            continue;
        }

        match parse_command(input) {
            Some(command) => {
                if tx.blocking_send(command).is_err() {
                    // Session ended on an error; the join below reports it
                    break;
                }
            }
            None => println!("Unknown command. Type 'help' for the list."),
        }
    }

    drop(tx);
    let controller = rt.block_on(session).map_err(io::Error::from)??;

    let state = controller.state();
    println!(
        "\nGoodbye! Score: {}, best: {}",
        state.score,
        state.max_score.max(state.score)
    );
    Ok(())
}

fn print_help() {
    println!("\n=== RETRO TACTICS ===");
    println!("Cells are numbered row by row from 0.");
    println!();
    println!("Commands:");
    println!("  click <cell> / c   - Select, move or attack, depending on the cell");
    println!("  select <cell>      - Select one of your characters");
    println!("  move <from> <to>   - Move a character");
    println!("  attack <from> <to> - Attack an enemy");
    println!("  board / b          - Show the board");
    println!("  new                - Start a new game");
    println!("  save / load        - Save or load the game");
    println!("  quit / q           - Exit");
    println!();
}

/// Parse one input line into a session command
fn parse_command(input: &str) -> Option<Command> {
    let mut parts = input.split_whitespace();
    let verb = parts.next()?;
    let cells: Vec<CellIndex> = parts
        .map(str::parse)
        .collect::<std::result::Result<_, _>>()
        .ok()?;

    match (verb, cells.as_slice()) {
        ("click" | "c", &[cell]) => Some(Command::Click(cell)),
        ("select", &[cell]) => Some(Command::Select(cell)),
        ("move" | "m", &[from, to]) => Some(Command::Move { from, to }),
        ("attack" | "a", &[attacker, target]) => Some(Command::Attack { attacker, target }),
        ("board" | "b", []) => Some(Command::Redraw),
        ("new", []) => Some(Command::NewGame),
        ("save", []) => Some(Command::SaveGame),
        ("load", []) => Some(Command::LoadGame),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_commands() {
        assert_eq!(parse_command("click 12"), Some(Command::Click(12)));
        assert_eq!(parse_command("m 0 4"), Some(Command::Move { from: 0, to: 4 }));
        assert_eq!(
            parse_command("attack 8 9"),
            Some(Command::Attack {
                attacker: 8,
                target: 9
            })
        );
        assert_eq!(parse_command("board"), Some(Command::Redraw));
        assert_eq!(parse_command("load"), Some(Command::LoadGame));
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert_eq!(parse_command("move 3"), None);
        assert_eq!(parse_command("click x"), None);
        assert_eq!(parse_command("new 1"), None);
        assert_eq!(parse_command("dance"), None);
    }
}
