//! `intake`: terminal UI for capturing and managing client submissions.
//!
//! # Usage
//!
//! ```
//! intake
//! intake --store ~/.local/share/intake/intake.db
//! intake --config ~/.config/intake/intake.toml --log-file /tmp/intake.log
//! ```

mod app;
mod settings;
mod ui;

use std::{
  fs::OpenOptions,
  io,
  path::{Path, PathBuf},
  sync::Mutex,
  time::Duration,
};

use anyhow::{Context, Result};
use app::App;
use clap::Parser;
use crossterm::{
  event::{self, Event, KeyEventKind},
  execute,
  terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use intake_core::{slot::Slot, store::RecordStore};
use intake_store_sqlite::SqliteSlot;
use ratatui::{Terminal, backend::CrosstermBackend};
use settings::{Settings, expand_tilde};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "intake", about = "Terminal UI for client intake submissions")]
struct Args {
  /// Path to a TOML config file.
  #[arg(short, long, value_name = "FILE")]
  config: Option<PathBuf>,

  /// SQLite file holding submissions (default: intake.db).
  #[arg(long, value_name = "FILE", env = "INTAKE_STORE")]
  store: Option<PathBuf>,

  /// File to append log output to (default: intake.log).
  #[arg(long, value_name = "FILE")]
  log_file: Option<PathBuf>,
}

// ─── Entry point ──────────────────────────────────────────────────────────────

fn main() -> Result<()> {
  let args = Args::parse();

  // CLI flags override the config file and environment.
  let mut settings = Settings::load(args.config.as_deref())?;
  if let Some(store) = args.store {
    settings.store_path = expand_tilde(&store);
  }
  if let Some(log_file) = args.log_file {
    settings.log_file = expand_tilde(&log_file);
  }

  init_tracing(&settings.log_file)?;
  tracing::info!(store = %settings.store_path.display(), key = %settings.slot_key, "starting");

  let slot = SqliteSlot::open(&settings.store_path).with_context(|| {
    format!("opening store at {}", settings.store_path.display())
  })?;
  let store = RecordStore::open(slot, settings.slot_key.clone());
  tracing::info!(records = store.len(), "store loaded");

  let mut app = App::new(store, settings.rules.clone());

  // Set up the terminal.
  enable_raw_mode().context("enabling raw mode")?;
  let mut stdout = io::stdout();
  execute!(stdout, EnterAlternateScreen).context("entering alternate screen")?;
  let backend = CrosstermBackend::new(stdout);
  let mut terminal = Terminal::new(backend).context("creating terminal")?;

  let run_result = run_event_loop(&mut terminal, &mut app);

  // Restore terminal regardless of result.
  disable_raw_mode().ok();
  execute!(terminal.backend_mut(), LeaveAlternateScreen).ok();
  terminal.show_cursor().ok();

  tracing::info!("exiting");
  run_result
}

/// Log to `path`; the terminal belongs to the UI.
fn init_tracing(path: &Path) -> Result<()> {
  let file = OpenOptions::new()
    .create(true)
    .append(true)
    .open(path)
    .with_context(|| format!("opening log file {}", path.display()))?;

  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .with_writer(Mutex::new(file))
    .with_ansi(false)
    .init();
  Ok(())
}

// ─── Event loop ───────────────────────────────────────────────────────────────

fn run_event_loop<S: Slot>(
  terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
  app: &mut App<S>,
) -> Result<()> {
  loop {
    terminal.draw(|f| ui::draw(f, app)).context("drawing frame")?;

    if !event::poll(Duration::from_millis(250)).context("polling events")? {
      continue;
    }
    match event::read().context("reading event")? {
      // Windows reports releases too.
      Event::Key(key) if key.kind == KeyEventKind::Press => {
        if !app.handle_key(key) {
          break;
        }
      }
      Event::Resize(_, _) => {
        // Terminal will redraw on next iteration.
      }
      _ => {}
    }
  }

  Ok(())
}
