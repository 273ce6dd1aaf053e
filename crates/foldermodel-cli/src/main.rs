//! foldermodel — headless driver for the folder model.
//!
//! Watches the configured folders, prints the initial listing and then one
//! JSON line per model event on stdout. Commands typed on stdin (see
//! [`input`]) drive selection and reconfiguration. Logs go to stderr or to
//! the configured log file.
//!
//! ```text
//! foldermodel [--config PATH] [DIR...]
//! ```

mod input;
mod watcher;

use std::io::BufRead;
use std::path::PathBuf;
use std::sync::mpsc;
use std::time::Duration;

use anyhow::Context;
use foldermodel_core::{role_names, Config, FolderModel, LogConfig, MimeGuessClassifier};
use tracing_subscriber::EnvFilter;

use crate::input::{parse_command, InputCommand};
use crate::watcher::{dispatch, NotifyWatcher, WatchMessage};

/// Messages delivered to the main loop.
enum Message {
    Watch(WatchMessage),
    Input(String),
}

/// Command-line arguments.
#[derive(Debug, Default, PartialEq)]
struct Args {
    config: Option<PathBuf>,
    folders: Vec<PathBuf>,
}

fn parse_args<I: IntoIterator<Item = String>>(args: I) -> anyhow::Result<Args> {
    let mut parsed = Args::default();
    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-c" | "--config" => {
                let path = args.next().context("--config needs a path")?;
                parsed.config = Some(PathBuf::from(path));
            }
            _ => parsed.folders.push(PathBuf::from(arg)),
        }
    }
    Ok(parsed)
}

fn init_tracing(log: &LogConfig) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&log.level))
        .context("invalid log level")?;

    match &log.file {
        Some(path) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("failed to open log file {}", path.display()))?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(std::sync::Mutex::new(file))
                .init();
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
    Ok(())
}

/// Prints one JSON object per row, with every role.
fn print_listing(model: &FolderModel) {
    for row in 0..model.count() {
        let mut object = serde_json::Map::new();
        object.insert("row".to_string(), row.into());
        for (_, name) in role_names() {
            if let Some(value) = model.get(row, name) {
                object.insert(
                    name.to_string(),
                    serde_json::to_value(value).unwrap_or_default(),
                );
            }
        }
        println!("{}", serde_json::Value::Object(object));
    }
}

/// Applies one stdin command. Returns `false` when the loop should stop.
fn handle_input(model: &mut FolderModel, line: &str) -> bool {
    let command = match parse_command(line) {
        Ok(Some(command)) => command,
        Ok(None) => return true,
        Err(e) => {
            eprintln!("{e}");
            return true;
        }
    };

    match command {
        InputCommand::List => print_listing(model),
        InputCommand::Toggle(row) => model.toggle_selected(row),
        InputCommand::SelectAll => model.select_all(),
        InputCommand::Clear => model.clear_selection(),
        InputCommand::Single(on) => model.set_single_selection_only(on),
        InputCommand::Filters(filters) => model.set_type_filters(filters),
        InputCommand::Folders(folders) => model.set_folders(folders),
        InputCommand::Quit => return false,
    }
    true
}

fn main() -> anyhow::Result<()> {
    let args = parse_args(std::env::args().skip(1))?;

    let mut config = match &args.config {
        Some(path) => Config::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => Config::default(),
    };
    if !args.folders.is_empty() {
        config.model.folders = args.folders;
    }

    init_tracing(&config.log)?;

    let (tx, rx) = mpsc::channel::<Message>();

    let watch_tx = tx.clone();
    let watcher = NotifyWatcher::new(
        Duration::from_millis(config.watcher.debounce_ms),
        move |msg| {
            let _ = watch_tx.send(Message::Watch(msg));
        },
    )?;

    let input_tx = tx;
    std::thread::spawn(move || {
        for line in std::io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            if input_tx.send(Message::Input(line)).is_err() {
                break;
            }
        }
    });

    let mut model = FolderModel::new(watcher, MimeGuessClassifier);
    model.apply_config(&config.model);
    tracing::info!(
        "watching {} folder(s), {} file(s) listed",
        model.folders().len(),
        model.count()
    );
    print_listing(&model);
    model.subscribe_all(|event| println!("{}", event.to_json()));

    // The watcher keeps its sender alive, so this only ends on `quit`.
    while let Ok(message) = rx.recv() {
        match message {
            Message::Watch(WatchMessage::Changed(paths)) => dispatch(&mut model, &paths),
            Message::Watch(WatchMessage::Error(e)) => tracing::warn!("Watch error: {e}"),
            Message::Input(line) => {
                if !handle_input(&mut model, &line) {
                    break;
                }
            }
        }
    }

    Ok(())
}
