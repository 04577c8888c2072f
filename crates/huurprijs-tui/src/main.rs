use std::fs::{self, OpenOptions};
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::Result;
use huurprijs_core::Config;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod app;
mod handler;
mod tui;
mod ui;

use app::App;
use tui::{EventHandler, Tui};

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let config = Config::load().unwrap_or_else(|err| {
        tracing::warn!(error = %err, "falling back to default config");
        Config::new()
    });
    let mut app = App::new(&config)?;
    tracing::info!(service_url = %app.client.base_url(), "starting");

    tui::install_panic_hook();
    let mut terminal = tui::init()?;
    let mut events = EventHandler::new();

    let result = run(&mut terminal, &mut app, &mut events).await;

    tui::restore()?;
    result
}

async fn run(terminal: &mut Tui, app: &mut App, events: &mut EventHandler) -> Result<()> {
    let tx = events.sender();
    handler::spawn_health_check(app, &tx);

    while !app.should_quit {
        terminal.draw(|frame| ui::render(app, frame))?;

        match events.next().await {
            Some(event) => handler::handle_event(app, event, &tx),
            None => break,
        }
    }

    Ok(())
}

/// Log to a file; the terminal belongs to the UI.
fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let Some((log_path, file)) = open_log_file() else {
        // No writable location: run without logs rather than corrupt the screen
        return;
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
        .with(env_filter)
        .init();

    tracing::info!(path = %log_path.display(), "logging initialized");
}

fn open_log_file() -> Option<(PathBuf, fs::File)> {
    for candidate in Config::log_file_candidates() {
        if let Some(parent) = candidate.parent() {
            if fs::create_dir_all(parent).is_err() {
                continue;
            }
        }

        if let Ok(file) = OpenOptions::new().create(true).append(true).open(&candidate) {
            return Some((candidate, file));
        }
    }

    None
}
