//! `NotionDeck`, a terminal client for a Notion-backed item list.
//!
//! Talks to the `notiondeck-proxy` REST routes. Configuration via CLI
//! flags, environment variables, or config file
//! (`~/.config/notiondeck/config.toml`).
//!
//! ```bash
//! cargo run --bin notiondeck
//!
//! # Point at another proxy
//! cargo run --bin notiondeck -- --api-url http://10.0.0.5:3001/api
//! NOTIONDECK_API=http://10.0.0.5:3001/api cargo run --bin notiondeck
//! ```

use std::io;
use std::path::Path;
use std::time::Instant;

use clap::Parser;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use tokio::sync::mpsc;
use tracing_appender::non_blocking::WorkerGuard;

use notiondeck::api::HttpItemsApi;
use notiondeck::app::App;
use notiondeck::config::{CliArgs, ClientConfig};
use notiondeck::net::{self, NetCommand, NetEvent};
use notiondeck::ui;

#[tokio::main]
async fn main() -> io::Result<()> {
    let cli = CliArgs::parse();

    let config = match ClientConfig::load(&cli) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    let api = match HttpItemsApi::new(&config.api_url) {
        Ok(api) => api,
        Err(e) => {
            eprintln!("Error: {}: {e}", config.api_url);
            std::process::exit(1);
        }
    };

    // Initialize logging before terminal setup (logs go to file, not stdout).
    let _log_guard = init_logging(&cli.log_level, cli.log_file.as_deref());

    tracing::info!(api_url = %config.api_url, "notiondeck starting");

    let (cmd_tx, evt_rx) = net::spawn_net(api, &config.to_net_config());

    // Set up terminal.
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &cmd_tx, evt_rx, &config);

    // Restore terminal.
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    tracing::info!("notiondeck exiting");
    result
}

/// Initialize file-based logging.
///
/// Logs are written to a file (never stdout, since ratatui owns the terminal).
/// Returns a [`WorkerGuard`] that must be held until shutdown to ensure all
/// buffered log entries are flushed.
fn init_logging(level: &str, file_path: Option<&Path>) -> Option<WorkerGuard> {
    let default_path = std::env::temp_dir().join("notiondeck.log");
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
/// Runs on the main thread and blocks on terminal polling; network work
/// runs on the runtime's worker threads.
fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    cmd_tx: &mpsc::Sender<NetCommand>,
    mut evt_rx: mpsc::Receiver<NetEvent>,
    config: &ClientConfig,
) -> io::Result<()> {
    let mut app = App::new(config.notice_ttl);

    if let Some(cmd) = app.request_load() {
        dispatch(&mut app, cmd_tx, cmd);
    }

    loop {
        let now = Instant::now();

        // Step 1: Draw the UI frame.
        terminal.draw(|frame| ui::draw(frame, &app, now))?;

        // Step 2: Drain all pending NetEvents (non-blocking).
        while let Ok(event) = evt_rx.try_recv() {
            app.apply(event, Instant::now());
        }

        // Step 3: Expire notices.
        app.tick(Instant::now());

        // Step 4: Poll for terminal input events.
        if event::poll(config.poll_timeout)?
            && let Event::Key(key) = event::read()?
        {
            if key.kind != KeyEventKind::Press {
                continue;
            }

            if let Some(cmd) = app.handle_key_event(key, Instant::now()) {
                dispatch(&mut app, cmd_tx, cmd);
            }
        }

        if app.should_quit {
            let _ = cmd_tx.try_send(NetCommand::Shutdown);
            return Ok(());
        }
    }
}

/// Hand a command to the net task, reporting failure as a notice.
fn dispatch(app: &mut App, tx: &mpsc::Sender<NetCommand>, cmd: NetCommand) {
    match tx.try_send(cmd) {
        Ok(()) => {}
        Err(mpsc::error::TrySendError::Full(cmd)) => {
            tracing::warn!(command = ?cmd, "net channel full");
            app.undeliverable(cmd, "Network busy, try again", Instant::now());
        }
        Err(mpsc::error::TrySendError::Closed(cmd)) => {
            tracing::error!(command = ?cmd, "net task stopped");
            app.undeliverable(cmd, "Network task stopped", Instant::now());
        }
    }
}
