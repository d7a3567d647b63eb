// folio - a terminal portfolio front page
// Theme and palette switching over a live particle backdrop

mod app;
mod color;
mod dom;
mod effect;
mod notify;
mod orchestrator;
mod palette;
mod storage;
mod theme;
mod timer;
mod ui;

use anyhow::{Context, Result};
use app::config::{resolve_state_dir, Cli, FRAME_INTERVAL, LOG_ENV, LOG_FILE, STATE_DIR_ENV};
use app::{event::handle_key_event, AppState};
use clap::Parser;
use crossterm::{
    event::{self, DisableFocusChange, EnableFocusChange, Event, KeyEventKind},
    execute,
    terminal::{self, disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use orchestrator::Viewport;
use ratatui::{backend::CrosstermBackend, Terminal};
use std::fs::OpenOptions;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Instant;
use storage::{FileStorage, MemoryStorage, Storage};
use theme::SystemPreference;
use tracing_subscriber::EnvFilter;

/// Log to a file in the state directory; the terminal belongs to the UI
fn init_logging(state_dir: &Path) -> Result<()> {
    std::fs::create_dir_all(state_dir)
        .with_context(|| format!("creating state directory {}", state_dir.display()))?;
    let path = state_dir.join(LOG_FILE);
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("opening log file {}", path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn open_storage(state_dir: &Path) -> Box<dyn Storage> {
    match FileStorage::open(state_dir) {
        Ok(storage) => {
            tracing::debug!(path = %storage.path().display(), "Preferences loaded");
            Box::new(storage)
        }
        Err(e) => {
            tracing::warn!(error = %e, "Preferences unavailable, keeping them in memory");
            Box::new(MemoryStorage::new())
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let state_dir = resolve_state_dir(cli.state_dir.clone(), std::env::var(STATE_DIR_ENV).ok());

    if let Err(e) = init_logging(&state_dir) {
        eprintln!("Logging disabled: {:#}", e);
    }
    tracing::info!(state_dir = %state_dir.display(), "Starting folio");

    let storage = open_storage(&state_dir);
    let system = SystemPreference::detect();
    let (cols, rows) = terminal::size()?;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableFocusChange)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run app
    let res = run_app(&mut terminal, &cli, storage, system, state_dir, Viewport { cols, rows });

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), DisableFocusChange, LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        tracing::error!(error = %err, "Exited with error");
        println!("Error: {:?}", err);
    }
    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    cli: &Cli,
    storage: Box<dyn Storage>,
    system: SystemPreference,
    state_dir: PathBuf,
    viewport: Viewport,
) -> Result<()> {
    let mut app = AppState::new(cli, storage, system, state_dir, viewport, Instant::now());
    loop {
        app.on_tick(Instant::now());
        terminal.draw(|f| ui::draw(f, &app))?;

        if !app.running {
            return Ok(());
        }

        if event::poll(FRAME_INTERVAL)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    handle_key_event(&mut app, key, Instant::now());
                }
                Event::Resize(cols, rows) => app.on_resize(cols, rows, Instant::now()),
                Event::FocusGained => {
                    app.on_focus_gained(SystemPreference::detect());
                }
                _ => {}
            }
        }
    }
}
