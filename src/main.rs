use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::info;
use tracing_subscriber::EnvFilter;

use romme_block::config::{AppConfig, LogConfig};
use romme_block::store::SessionStore;
use romme_block::ui::App;

/// Keep score for a Rommé game at the table.
#[derive(Parser)]
#[command(name = "romme-block", about = "Terminal score pad for Rommé")]
struct Cli {
    /// Path to TOML configuration file
    #[arg(long, default_value = "romme.toml")]
    config: PathBuf,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = AppConfig::load_or_default(&cli.config)
        .with_context(|| format!("loading config from {}", cli.config.display()))?;
    init_logging(&config.log)?;

    let store = SessionStore::new(&config.store.path);
    let session = store.load_or_default();
    info!(
        path = %store.path().display(),
        players = session.players.len(),
        "session loaded"
    );

    // Setup terminal
    enable_raw_mode().context("enabling raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).context("entering alternate screen")?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("creating terminal")?;

    let mut app = App::new(session, store, config.ui.clone(), StdRng::from_os_rng());
    let res = app.run(&mut terminal);

    // Restore terminal state; always runs, even on error
    let _ = disable_raw_mode();
    let _ = execute!(terminal.backend_mut(), LeaveAlternateScreen);
    let _ = terminal.show_cursor();

    info!("shutdown");
    res.context("running app")
}

/// Logs go to a file so the TUI keeps the terminal to itself.
fn init_logging(config: &LogConfig) -> Result<()> {
    let file = std::fs::File::create(&config.file)
        .with_context(|| format!("opening log file {}", config.file.display()))?;
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::sync::Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}
