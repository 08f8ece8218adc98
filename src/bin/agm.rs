//! AGM TUI - terminal dashboard for agent sessions behind an HTTP gateway
//!
//! This binary connects to a gateway (directly or through a local relay),
//! polls the session list, and renders an htop-style dashboard.
//!
//! # Usage
//!
//! ```text
//! agm --gateway-url http://localhost:8080 --token SECRET   # first run
//! agm                                                      # uses saved credentials
//! agm --working-mins 2 --waiting-mins 10                   # custom thresholds
//! ```

use std::fs::{self, OpenOptions};
use std::io::{self, Stdout};
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::Duration;

use anyhow::{bail, Result};
use clap::Parser;
use crossterm::{
    event::{self, Event as CrosstermEvent},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;

use agm_core::ActivityThresholds;
use agm_gateway::{GatewayClient, GatewayConfig};
use agm_tui::app::App;
use agm_tui::client::{Poller, PollerConfig};
use agm_tui::credentials::Credentials;
use agm_tui::error::{Result as TuiResult, TuiError};
use agm_tui::input::{handle_key_event, Action, ClientCommand, Event};
use agm_tui::ui;

// ============================================================================
// CLI Arguments
// ============================================================================

/// AGM TUI - monitor agent sessions behind an HTTP gateway
#[derive(Parser, Debug)]
#[command(name = "agm")]
#[command(about = "Monitor agent gateway sessions in real-time")]
#[command(version)]
struct Args {
    /// Gateway (or relay) base URL; saved after the first successful connect
    #[arg(long)]
    gateway_url: Option<String>,

    /// Bearer token for the gateway API; saved alongside the URL
    #[arg(long)]
    token: Option<String>,

    /// Minutes of silence before a session stops counting as working
    #[arg(long, default_value_t = 5)]
    working_mins: i64,

    /// Minutes of silence before a session counts as waiting
    #[arg(long, default_value_t = 15)]
    waiting_mins: i64,
}

// ============================================================================
// Credential Resolution
// ============================================================================

/// Resolves credentials from flags and the saved file.
///
/// Flags override saved values field by field, so `--token` alone can
/// rotate a token without repeating the URL. No usable combination is a
/// configuration error, fatal at startup.
fn resolve_credentials(args: &Args, saved: Option<Credentials>) -> TuiResult<Credentials> {
    let base_url = args
        .gateway_url
        .clone()
        .or_else(|| saved.as_ref().map(|c| c.base_url.clone()));
    let token = args
        .token
        .clone()
        .or_else(|| saved.as_ref().map(|c| c.token.clone()));

    match (base_url, token) {
        (Some(base_url), Some(token)) => Ok(Credentials::new(base_url, token)),
        _ => Err(TuiError::MissingCredentials(
            "run with --gateway-url <URL> --token <TOKEN> for the first connection".to_string(),
        )),
    }
}

// ============================================================================
// Terminal Setup / Cleanup
// ============================================================================

fn setup_terminal() -> TuiResult<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode().map_err(|e| TuiError::TerminalInit(e.to_string()))?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).map_err(|e| TuiError::TerminalInit(e.to_string()))?;

    let backend = CrosstermBackend::new(stdout);
    Terminal::new(backend).map_err(|e| TuiError::TerminalInit(e.to_string()))
}

fn cleanup_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> TuiResult<()> {
    disable_raw_mode().map_err(|e| TuiError::TerminalCleanup(e.to_string()))?;

    execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .map_err(|e| TuiError::TerminalCleanup(e.to_string()))?;

    terminal
        .show_cursor()
        .map_err(|e| TuiError::TerminalCleanup(e.to_string()))?;

    Ok(())
}

// ============================================================================
// Keyboard Input Task
// ============================================================================

fn spawn_keyboard_task(
    event_tx: mpsc::UnboundedSender<Event>,
    cancel_token: CancellationToken,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            if cancel_token.is_cancelled() {
                debug!("Keyboard task shutting down");
                break;
            }

            let poll_result = tokio::task::spawn_blocking(|| {
                if event::poll(Duration::from_millis(50)).unwrap_or(false) {
                    event::read().ok()
                } else {
                    None
                }
            })
            .await;

            match poll_result {
                Ok(Some(CrosstermEvent::Key(key))) => {
                    if event_tx.send(Event::Key(key)).is_err() {
                        debug!("Event channel closed, keyboard task exiting");
                        break;
                    }
                }
                Ok(Some(CrosstermEvent::Resize(width, height))) => {
                    if event_tx.send(Event::Resize(width, height)).is_err() {
                        break;
                    }
                }
                Ok(Some(_)) => {}
                Ok(None) => {}
                Err(e) => {
                    error!(error = %e, "Keyboard polling task panicked");
                    break;
                }
            }
        }
    })
}

// ============================================================================
// Main Event Loop
// ============================================================================

async fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    app: &mut App,
    event_rx: &mut mpsc::UnboundedReceiver<Event>,
    command_tx: &mpsc::UnboundedSender<ClientCommand>,
    cancel_token: &CancellationToken,
    credentials: &Credentials,
    credentials_path: Option<&PathBuf>,
) -> Result<()> {
    let tick_rate = Duration::from_millis(100);
    let mut credentials_saved = false;

    loop {
        app.tick();
        terminal.draw(|frame| ui::render(frame, app))?;

        let event = tokio::time::timeout(tick_rate, event_rx.recv()).await;

        match event {
            Ok(Some(received_event)) => match received_event {
                Event::Key(key) => {
                    let action = handle_key_event(key, app);
                    match action {
                        Action::Quit => {
                            info!("User requested quit");
                            cancel_token.cancel();
                            break;
                        }
                        Action::Refresh => {
                            debug!("User requested refresh");
                            if command_tx.send(ClientCommand::RefreshNow).is_err() {
                                warn!("Failed to send refresh command - poller may have exited");
                            }
                        }
                        Action::Reconnect => {
                            info!("User requested reconnect");
                            if command_tx.send(ClientCommand::Reconnect).is_err() {
                                warn!("Failed to send reconnect command - poller may have exited");
                            }
                        }
                        Action::None => {}
                    }
                }
                Event::Resize(_width, _height) => {
                    debug!("Terminal resized");
                }
                Event::SessionsFetched(sessions) => {
                    debug!(count = sessions.len(), "Received session list");
                    app.apply_poll(sessions);

                    // Persist working credentials once, on the first
                    // successful poll
                    if !credentials_saved {
                        if let Some(path) = credentials_path {
                            match credentials.save(path) {
                                Ok(()) => debug!(path = %path.display(), "Credentials saved"),
                                Err(e) => warn!(error = %e, "Failed to save credentials"),
                            }
                        }
                        credentials_saved = true;
                    }
                }
                Event::PollFailed(reason) => {
                    warn!(reason = %reason, "Poll failed");
                    app.poll_failed(reason);
                }
                Event::ConnectFailed(reason) => {
                    warn!(reason = %reason, "Connection failed");
                    app.poll_failed(reason);
                }
            },
            Ok(None) => {
                warn!("Event channel closed");
                break;
            }
            Err(_) => {}
        }

        if app.should_quit {
            cancel_token.cancel();
            break;
        }

        if cancel_token.is_cancelled() {
            break;
        }
    }

    Ok(())
}

// ============================================================================
// Logging Setup
// ============================================================================

fn get_log_dir() -> Option<PathBuf> {
    if let Ok(xdg_state) = std::env::var("XDG_STATE_HOME") {
        return Some(PathBuf::from(xdg_state).join("agm"));
    }
    std::env::var("HOME")
        .ok()
        .map(|home| PathBuf::from(home).join(".local/state/agm"))
}

fn create_log_file() -> Option<std::fs::File> {
    let log_dir = get_log_dir()?;

    if let Err(e) = fs::create_dir_all(&log_dir) {
        eprintln!("Warning: Failed to create log directory {log_dir:?}: {e}");
        return None;
    }

    let log_path = log_dir.join("tui.log");

    match OpenOptions::new().create(true).append(true).open(&log_path) {
        Ok(file) => Some(file),
        Err(e) => {
            eprintln!("Warning: Failed to open log file {log_path:?}: {e}");
            None
        }
    }
}

// ============================================================================
// Main Entry Point
// ============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Log to a file: stdout belongs to the TUI
    let log_file = create_log_file();

    if let Some(file) = log_file {
        let writer = Mutex::new(file);

        let filter = EnvFilter::from_default_env().add_directive(
            "agm=info".parse().unwrap_or_else(|_| {
                tracing_subscriber::filter::Directive::from(tracing::Level::INFO)
            }),
        );

        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(writer)
            .with_ansi(false)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::new("off"))
            .init();
    }

    info!("AGM TUI starting...");

    let credentials_path = Credentials::default_path();
    let saved = match credentials_path.as_ref() {
        Some(path) => Credentials::load(path).unwrap_or_else(|e| {
            warn!(error = %e, "Ignoring unreadable credentials file");
            None
        }),
        None => None,
    };

    let credentials = resolve_credentials(&args, saved)?;

    if args.working_mins <= 0 || args.waiting_mins <= args.working_mins {
        bail!("Thresholds must satisfy 0 < working-mins < waiting-mins");
    }
    let thresholds = ActivityThresholds::from_minutes(args.working_mins, args.waiting_mins);

    let gateway_client = GatewayClient::new(GatewayConfig::new(
        &credentials.base_url,
        &credentials.token,
    ))?;

    let (event_tx, mut event_rx) = mpsc::unbounded_channel::<Event>();
    let (command_tx, command_rx) = mpsc::unbounded_channel::<ClientCommand>();
    let cancel_token = CancellationToken::new();

    let mut terminal = match setup_terminal() {
        Ok(t) => t,
        Err(e) => {
            error!(error = %e, "Failed to initialize terminal");
            return Err(e.into());
        }
    };

    let mut app = App::new(thresholds);

    let poller = Poller::new(
        gateway_client,
        PollerConfig::default(),
        event_tx.clone(),
        command_rx,
        cancel_token.clone(),
    );
    let poller_handle = tokio::spawn(async move {
        poller.run().await;
    });

    let keyboard_handle = spawn_keyboard_task(event_tx, cancel_token.clone());

    let result = run_event_loop(
        &mut terminal,
        &mut app,
        &mut event_rx,
        &command_tx,
        &cancel_token,
        &credentials,
        credentials_path.as_ref(),
    )
    .await;

    cancel_token.cancel();

    let _ = tokio::time::timeout(Duration::from_millis(100), poller_handle).await;
    let _ = tokio::time::timeout(Duration::from_millis(100), keyboard_handle).await;

    if let Err(e) = cleanup_terminal(&mut terminal) {
        error!(error = %e, "Failed to cleanup terminal");
    }

    info!("AGM TUI stopped");

    result
}

// ============================================================================
// Tests
// ============================================================================
