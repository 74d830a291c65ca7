//! caseboard - TV deadline board
//!
//! Full-screen terminal board that buckets open cases by due-date urgency
//! and pages through them on a timer.

mod app;
mod ui;

use std::io;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use caseboard_core::{source, Config};
use clap::Parser;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use crate::app::App;

#[derive(Parser)]
#[command(name = "caseboard")]
#[command(about = "TV deadline board for the case tracker")]
#[command(version)]
struct Args {
    /// Read cases from this cases.json instead of the configured store
    #[arg(short, long)]
    store: Option<PathBuf>,

    /// Read cases from the case store API at this base URL
    #[arg(short, long)]
    url: Option<String>,

    /// Cases per page
    #[arg(long)]
    page_size: Option<usize>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Load configuration
    let config = Config::load().context("failed to load configuration")?;

    // Initialize logging (to file, not stdout since we have a TUI)
    let _log_guard =
        caseboard_core::logging::init(&config.logging).context("failed to initialize logging")?;

    tracing::info!("caseboard starting up");

    let source = source::open(args.store, args.url.as_deref(), &config)
        .context("failed to open case source")?;

    let page_size = args.page_size.unwrap_or(config.board.page_size).max(1);
    let mut app = App::new(source, config.board.clone(), page_size);
    tracing::info!(source = %app.source_name(), page_size, "Reading cases");
    app.refresh();

    // Setup terminal
    enable_raw_mode().context("failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).context("failed to enter alternate screen")?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("failed to create terminal")?;

    // Run the main loop
    let result = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode().context("failed to disable raw mode")?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .context("failed to leave alternate screen")?;
    terminal.show_cursor().context("failed to show cursor")?;

    tracing::info!("caseboard shutting down");

    if let Err(e) = &result {
        tracing::error!(error = %e, "Board loop failed");
        eprintln!(
            "See {} for details.",
            caseboard_core::logging::log_file_path().display()
        );
    }

    result
}

/// Run the main application loop.
fn run_app(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> Result<()> {
    loop {
        // Refresh and page advance run off the same clock
        app.tick(Instant::now());

        terminal.draw(|frame| ui::render(frame, app))?;

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.handle_key(key);
                }
            }
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}
