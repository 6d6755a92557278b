use std::path::PathBuf;

use clap::{Parser, Subcommand};
use corkboard::config::BoardConfig;
use corkboard::doc::{Color, Snapshot};
use corkboard::engine::{Action, EditError, Engine};
use corkboard::geometry::{Point, Size};
use corkboard::persist::{self, FileStore, PersistError};
use tracing::info;
use uuid::Uuid;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("{op} refused: {source}")]
    Rejected {
        op: &'static str,
        #[source]
        source: EditError,
    },
    #[error("{op} had no effect")]
    NoEffect { op: &'static str },
    #[error("storage failed: {0}")]
    Persist(#[from] PersistError),
    #[error("invalid JSON output: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Parser, Debug)]
#[command(name = "corkboard", about = "Inspect and edit a corkboard stored on disk")]
struct Cli {
    /// Directory holding the board file.
    #[arg(long, env = "CORKBOARD_DATA_DIR", default_value = ".corkboard")]
    data_dir: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the stored board as JSON.
    Show,
    /// Replace the stored board with an empty one, or the starter layout.
    Init {
        #[arg(long, default_value_t = false)]
        template: bool,
    },
    #[command(flatten)]
    Edit(EditCommand),
}

#[derive(Subcommand, Debug)]
enum EditCommand {
    /// Add a sticky note; prints its id.
    Note {
        #[arg(long, allow_hyphen_values = true, value_parser = finite)]
        x: f64,
        #[arg(long, allow_hyphen_values = true, value_parser = finite)]
        y: f64,
        #[arg(long)]
        color: Option<Color>,
    },
    /// Add a frame; prints its id.
    Frame {
        #[arg(long, allow_hyphen_values = true, value_parser = finite)]
        x: f64,
        #[arg(long, allow_hyphen_values = true, value_parser = finite)]
        y: f64,
        #[arg(long)]
        color: Option<Color>,
    },
    /// Connect two notes; prints the connection id.
    Connect { start: Uuid, end: Uuid },
    /// Move a note or frame. `--with-contents` carries a frame's notes.
    Move {
        id: Uuid,
        #[arg(long, allow_hyphen_values = true, value_parser = finite)]
        x: f64,
        #[arg(long, allow_hyphen_values = true, value_parser = finite)]
        y: f64,
        #[arg(long, default_value_t = false)]
        with_contents: bool,
    },
    Resize {
        id: Uuid,
        #[arg(long, value_parser = finite)]
        width: f64,
        #[arg(long, value_parser = finite)]
        height: f64,
    },
    Color { id: Uuid, color: Color },
    /// Set a note's text.
    Text { id: Uuid, text: String },
    /// Set a frame's title.
    Title { id: Uuid, title: String },
    Delete { id: Uuid },
    /// List the notes currently inside a frame.
    Members { frame: Uuid },
}

fn main() -> Result<(), CliError> {
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let cli = Cli::parse();
    let config = BoardConfig::from_env();
    let mut store = FileStore::new(&cli.data_dir);

    match cli.command {
        Command::Show => {
            let engine = Engine::open(config, Box::new(store));
            print_snapshot(engine.snapshot())
        }
        Command::Init { template } => {
            let snapshot = if template { Snapshot::starter(config.color_mode) } else { Snapshot::new() };
            persist::save_snapshot(&mut store, &config.storage_key, &snapshot)?;
            info!(dir = %cli.data_dir.display(), template, "board initialized");
            print_snapshot(&snapshot)
        }
        Command::Edit(edit) => run_edit(Engine::open(config, Box::new(store)), edit),
    }
}

fn run_edit(mut engine: Engine, command: EditCommand) -> Result<(), CliError> {
    let active = engine.ui.active_color.clone();
    match command {
        EditCommand::Note { x, y, color } => {
            let action = engine.add_note(Point::new(x, y), color.unwrap_or(active));
            expect_commit("add note", action)?;
            print_selection(&engine);
            Ok(())
        }
        EditCommand::Frame { x, y, color } => {
            let action = engine.add_frame(Point::new(x, y), color.unwrap_or(active));
            expect_commit("add frame", action)?;
            print_selection(&engine);
            Ok(())
        }
        EditCommand::Connect { start, end } => {
            expect_commit("connect", engine.connect(start, end))?;
            if let Some(conn) = engine.snapshot().connections.last() {
                println!("{}", conn.id);
            }
            Ok(())
        }
        EditCommand::Move { id, x, y, with_contents } => {
            let position = Point::new(x, y);
            let action = if with_contents {
                engine.move_frame_with_contents(id, position)
            } else {
                engine.move_entity(id, position)
            };
            expect_commit("move", action)
        }
        EditCommand::Resize { id, width, height } => expect_commit("resize", engine.resize_entity(id, Size::new(width, height))),
        EditCommand::Color { id, color } => expect_commit("color", engine.change_color(id, color)),
        EditCommand::Text { id, text } => expect_commit("text", engine.edit_note_text(id, text)),
        EditCommand::Title { id, title } => expect_commit("title", engine.rename_frame(id, title)),
        EditCommand::Delete { id } => expect_commit("delete", engine.delete(id)),
        EditCommand::Members { frame } => {
            for id in engine.notes_in_frame(&frame) {
                println!("{id}");
            }
            Ok(())
        }
    }
}

fn expect_commit(op: &'static str, action: Action) -> Result<(), CliError> {
    match action {
        Action::Committed { .. } => Ok(()),
        Action::Rejected(source) => Err(CliError::Rejected { op, source }),
        _ => Err(CliError::NoEffect { op }),
    }
}

/// Coordinates and sizes must be finite numbers.
fn finite(raw: &str) -> Result<f64, String> {
    let value: f64 = raw.parse().map_err(|e| format!("{e}"))?;
    if value.is_finite() { Ok(value) } else { Err(format!("{raw} is not a finite number")) }
}

fn print_selection(engine: &Engine) {
    if let Some(id) = engine.selection() {
        println!("{id}");
    }
}

fn print_snapshot(snapshot: &Snapshot) -> Result<(), CliError> {
    let rendered = serde_json::to_string_pretty(snapshot)?;
    println!("{rendered}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coordinates_must_be_finite() {
        for bad in ["NaN", "inf", "-inf"] {
            let parsed = Cli::try_parse_from(["corkboard", "note", "--x", bad, "--y", "0"]);
            assert!(parsed.is_err(), "{bad} should be refused");
        }
        assert!(Cli::try_parse_from(["corkboard", "note", "--x", "-12.5", "--y", "0"]).is_ok());
    }

    #[test]
    fn sizes_must_be_finite() {
        let id = Uuid::new_v4().to_string();
        let parsed = Cli::try_parse_from(["corkboard", "resize", id.as_str(), "--width", "NaN", "--height", "200"]);
        assert!(parsed.is_err());
    }
}
