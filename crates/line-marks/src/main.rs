use std::cell::Cell;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use anyhow::{Context, Result};
use clap::Parser;
use line_marks_config::{MarksConfig, MarksStateStore};
use line_marks_core::{
    display_path, line_preview, EditDescription, MarkStore, Position, Selection, TextRange,
};

mod cli;

use cli::{Cli, Command};

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_path = cli.config.clone().unwrap_or_else(MarksConfig::config_path);
    let config = MarksConfig::load_or_create(&config_path);

    // Initialize logging
    let default_level = if config.debug { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .init();

    let state_path = cli.state.clone().unwrap_or_else(|| config.state_path());
    tracing::debug!("Using state database {}", state_path.display());
    let state = MarksStateStore::open(&state_path)?;
    let mut store = MarkStore::from_snapshot(state.load_snapshot()?);

    let dirty = Rc::new(Cell::new(false));
    let flag = Rc::clone(&dirty);
    let _changes = store.subscribe(move |event| {
        tracing::debug!("bookmarks changed: {event:?}");
        flag.set(true);
    });

    run(cli.command, &mut store, &config)?;

    if dirty.get() {
        state
            .save_snapshot(&store.snapshot())
            .context("Failed to save bookmarks")?;
    }
    Ok(())
}

/// Store keys are absolute paths so that every working directory agrees.
fn file_key(file: &Path) -> Result<PathBuf> {
    std::path::absolute(file).with_context(|| format!("Invalid file path: {}", file.display()))
}

fn run(command: Command, store: &mut MarkStore, config: &MarksConfig) -> Result<()> {
    match command {
        Command::Toggle { file, lines, span } => {
            let path = file_key(&file)?;
            let selections: Vec<Selection> = match span {
                Some((from, to)) => {
                    vec![Selection::new(Position::new(from, 0), Position::new(to, 0))]
                }
                None => lines.into_iter().map(Selection::cursor).collect(),
            };
            store.toggle_selections(&path, &selections);
            print_file(store, &path, config);
        }
        Command::Remove { file, lines } => {
            let path = file_key(&file)?;
            if !store.remove_lines(&path, &lines) {
                println!("No bookmarks removed.");
            }
        }
        Command::List { file } => match file {
            Some(file) => print_file(store, &file_key(&file)?, config),
            None => print_all(store, config),
        },
        Command::Next { file, line } => {
            let target = store.next(&file_key(&file)?, line);
            print_target(target, config);
        }
        Command::Prev { file, line } => {
            let target = store.prev(&file_key(&file)?, line);
            print_target(target, config);
        }
        Command::Note { file, line, text } => {
            let path = file_key(&file)?;
            match text {
                Some(text) => store.set_note(&path, line, &text)?,
                None => match store.note(&path, line) {
                    Some(note) => println!("{note}"),
                    None => println!("No note on line {}.", line + 1),
                },
            }
        }
        Command::Clear { file } => {
            let path = file_key(&file)?;
            if !store.clear_file(&path) {
                println!("No bookmarks in {}.", path.display());
            }
        }
        Command::ClearAll => store.clear_all(),
        Command::Edit {
            file,
            start,
            end,
            text,
        } => {
            let path = file_key(&file)?;
            let range = TextRange::new(start, end.unwrap_or(start))?;
            store.apply_edits(&path, &[EditDescription::new(range, text)]);
            print_file(store, &path, config);
        }
    }
    Ok(())
}

fn print_target(line: usize, config: &MarksConfig) {
    let reveal = if config.align_top_on_navigation {
        "top"
    } else {
        "center"
    };
    println!("{} {reveal}", line + 1);
}

fn print_all(store: &MarkStore, config: &MarksConfig) {
    for (path, _) in store.files() {
        print_file(store, path, config);
    }
    println!(
        "{} bookmark(s) in {} file(s)",
        store.total_count(),
        store.file_count()
    );
}

fn print_file(store: &MarkStore, path: &Path, config: &MarksConfig) {
    println!("{}", display_path(path, &config.workspace_roots));
    let lines = store.lines(path);
    if lines.is_empty() {
        println!("  (no bookmarks)");
        return;
    }
    let text = match std::fs::read_to_string(path) {
        Ok(text) => Some(text),
        Err(e) => {
            tracing::warn!("Failed to read {} for previews: {e}", path.display());
            None
        }
    };
    for line in lines {
        let preview = text
            .as_deref()
            .and_then(|t| line_preview(t, line, config.preview_max_chars))
            .unwrap_or_default();
        match store.note(path, line) {
            Some(note) => println!("  Line {}: {preview} ({note})", line + 1),
            None => println!("  Line {}: {preview}", line + 1),
        }
    }
}
