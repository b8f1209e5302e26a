//! `todoterm`: terminal task list backed by a remote todo collection.
//!
//! Loads the configured user's tasks from the API and keeps them in sync
//! as they are added, toggled, renamed and deleted. Configuration via CLI
//! flags, environment variables, or config file
//! (`~/.config/todoterm/config.toml`).
//!
//! ```bash
//! # Against a local todoterm-server
//! cargo run --bin todoterm -- --user-id 1
//!
//! # Or via environment variables
//! TODOTERM_API_URL=http://127.0.0.1:3000/ TODOTERM_USER_ID=1 cargo run --bin todoterm
//! ```

use std::io;
use std::path::Path;
use std::sync::Arc;

use clap::Parser;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing_appender::non_blocking::WorkerGuard;

use todoterm::app::App;
use todoterm::config::{CliArgs, ClientConfig};
use todoterm::gateway::http::HttpGateway;
use todoterm::sync::SyncController;
use todoterm::ui;

type Tui = Terminal<CrosstermBackend<io::Stdout>>;

#[tokio::main]
async fn main() -> io::Result<()> {
    let cli = CliArgs::parse();

    // Load and resolve configuration (CLI args > env > config file > defaults).
    let config = match ClientConfig::load(&cli) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error loading configuration: {e}");
            std::process::exit(1);
        }
    };

    // Initialize logging before terminal setup (logs go to file, not stdout).
    let _log_guard = init_logging(&cli.log_level, cli.log_file.as_deref());

    tracing::info!("todoterm starting");

    // Build the gateway before touching the terminal so setup errors print cleanly.
    let gateway = match config.to_gateway_config() {
        Some(gateway_config) => {
            let gateway = HttpGateway::new(&gateway_config).map_err(io::Error::other)?;
            Some((gateway, gateway_config.user_id))
        }
        None => {
            tracing::warn!("no user id configured, showing setup view");
            None
        }
    };

    // Set up terminal.
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run the app.
    let result = match gateway {
        Some((gateway, user_id)) => {
            let controller = SyncController::new(Arc::new(gateway), user_id, config.error_display);
            run_app(&mut terminal, App::new(controller), &config)
        }
        None => run_setup_warning(&mut terminal, &config),
    };

    // Restore terminal.
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    tracing::info!("todoterm exiting");
    result
}

/// Initialize file-based logging.
///
/// Logs are written to a file (never stdout, since ratatui owns the terminal).
/// Returns a [`WorkerGuard`] that must be held until shutdown to ensure all
/// buffered log entries are flushed.
fn init_logging(level: &str, file_path: Option<&Path>) -> Option<WorkerGuard> {
    let default_path = std::env::temp_dir().join("todoterm.log");
    let log_path = file_path.unwrap_or(&default_path);

    let log_dir = log_path.parent()?;
    let file_name = log_path.file_name()?.to_str()?;

    let file_appender = tracing_appender::rolling::never(log_dir, file_name);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_env_filter(env_filter)
        .with_ansi(false)
        .init();

    Some(guard)
}

/// Main application loop.
///
/// Gateway requests run on the tokio runtime in the background; each
/// iteration applies whatever has settled, draws, and handles at most one
/// key press.
fn run_app(
    terminal: &mut Tui,
    mut app: App<HttpGateway>,
    client_config: &ClientConfig,
) -> io::Result<()> {
    app.controller.load();

    loop {
        // Step 1: Apply settled requests and expired notices (non-blocking).
        app.tick();

        // Step 2: Draw the UI frame.
        terminal.draw(|frame| ui::draw(frame, &app))?;

        // Step 3: Poll for terminal input events.
        if event::poll(client_config.poll_timeout)?
            && let Event::Key(key) = event::read()?
        {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            app.handle_key_event(key);
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

/// Loop for the setup view shown when no user id is configured.
fn run_setup_warning(terminal: &mut Tui, client_config: &ClientConfig) -> io::Result<()> {
    loop {
        terminal.draw(ui::draw_setup_warning)?;

        if event::poll(client_config.poll_timeout)?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            match (key.code, key.modifiers) {
                (KeyCode::Char('c'), KeyModifiers::CONTROL) | (KeyCode::Esc | KeyCode::Char('q'), _) => {
                    return Ok(());
                }
                _ => {}
            }
        }
    }
}
