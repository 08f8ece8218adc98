//! Gateway poller for the AGM TUI.
//!
//! This module provides the `Poller`, which drives the dashboard's data:
//! - One initial fetch that decides Connected vs Disconnected
//! - A fixed-interval polling loop once connected
//! - Manual reconnect and refresh-now commands from the main loop
//!
//! A failed initial connect parks the poller until the user asks for a
//! reconnect; a failed poll after connecting keeps the loop running so
//! the dashboard degrades instead of dying.
//!
//! **Panic-Free Policy:** This module follows the project's panic-free guidelines.
//! No `.unwrap()`, `.expect()`, `panic!()`, `unreachable!()`, or `todo!()`.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use agm_gateway::GatewayClient;

use crate::input::{ClientCommand, Event};

// ============================================================================
// Configuration
// ============================================================================

/// Default interval between polls.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(10);

/// Configuration for the poller.
#[derive(Debug, Clone)]
pub struct PollerConfig {
    /// Time between successive polls once connected.
    pub interval: Duration,
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

// ============================================================================
// Poller
// ============================================================================

/// Polls the gateway for the session list and forwards results to the TUI.
///
/// # Lifecycle
///
/// 1. One initial fetch; success sends `SessionsFetched`, failure sends
///    `ConnectFailed` and the poller waits for a `Reconnect` command
/// 2. Once connected, fetches every `interval` (or on `RefreshNow`)
/// 3. Poll failures after connecting send `PollFailed` but keep polling
/// 4. Exits when cancelled or when either channel closes
pub struct Poller {
    /// Gateway API client.
    client: GatewayClient,

    /// Polling configuration.
    config: PollerConfig,

    /// Channel to send events to the TUI.
    event_tx: mpsc::UnboundedSender<Event>,

    /// Channel to receive commands from the TUI.
    command_rx: tokio::sync::Mutex<mpsc::UnboundedReceiver<ClientCommand>>,

    /// Cancellation token for graceful shutdown.
    cancel_token: CancellationToken,
}

impl Poller {
    /// Creates a new poller.
    #[must_use]
    pub fn new(
        client: GatewayClient,
        config: PollerConfig,
        event_tx: mpsc::UnboundedSender<Event>,
        command_rx: mpsc::UnboundedReceiver<ClientCommand>,
        cancel_token: CancellationToken,
    ) -> Self {
        Self {
            client,
            config,
            event_tx,
            command_rx: tokio::sync::Mutex::new(command_rx),
            cancel_token,
        }
    }

    /// Main loop: connect, then poll until cancelled.
    pub async fn run(&self) {
        info!(
            base_url = %self.client.base_url(),
            interval_secs = self.config.interval.as_secs(),
            "Poller starting"
        );

        loop {
            if self.cancel_token.is_cancelled() {
                info!("Poller shutting down (cancelled)");
                return;
            }

            // Initial fetch decides the connection outcome
            match self.client.fetch_sessions().await {
                Ok(sessions) => {
                    info!(count = sessions.len(), "Connected to gateway");
                    if self.event_tx.send(Event::SessionsFetched(sessions)).is_err() {
                        debug!("Event channel closed, poller exiting");
                        return;
                    }
                }
                Err(e) => {
                    warn!(error = %e, "Initial connection failed");
                    let _ = self.event_tx.send(Event::ConnectFailed(e.to_string()));

                    // Park until the user asks for a reconnect; there is
                    // no automatic retry out of Disconnected
                    if !self.wait_for_reconnect().await {
                        return;
                    }
                    continue;
                }
            }

            // Connected: poll on the interval until cancelled
            if !self.poll_loop().await {
                return;
            }
        }
    }

    /// Waits for a `Reconnect` command.
    ///
    /// Returns false when the poller should exit (cancelled or the
    /// command channel closed).
    async fn wait_for_reconnect(&self) -> bool {
        let mut command_rx = self.command_rx.lock().await;
        loop {
            tokio::select! {
                _ = self.cancel_token.cancelled() => {
                    debug!("Reconnect wait cancelled");
                    return false;
                }
                command = command_rx.recv() => {
                    match command {
                        Some(ClientCommand::Reconnect) => {
                            info!("Reconnect requested");
                            return true;
                        }
                        Some(ClientCommand::RefreshNow) => {
                            // Nothing to refresh while disconnected
                            debug!("Ignoring refresh while disconnected");
                        }
                        None => {
                            debug!("Command channel closed");
                            return false;
                        }
                    }
                }
            }
        }
    }

    /// The steady-state polling loop.
    ///
    /// Returns false when the poller should exit entirely. Never returns
    /// true in practice today (poll failures degrade but do not stop the
    /// loop), but the signature matches `wait_for_reconnect` for the
    /// caller's benefit.
    async fn poll_loop(&self) -> bool {
        let mut ticker = tokio::time::interval(self.config.interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        // The first tick completes immediately; consume it since the
        // connect fetch just happened
        ticker.tick().await;

        let mut command_rx = self.command_rx.lock().await;

        loop {
            tokio::select! {
                _ = self.cancel_token.cancelled() => {
                    debug!("Poll loop cancelled");
                    return false;
                }
                _ = ticker.tick() => {
                    if !self.poll_once().await {
                        return false;
                    }
                }
                command = command_rx.recv() => {
                    match command {
                        Some(ClientCommand::RefreshNow) | Some(ClientCommand::Reconnect) => {
                            debug!("Immediate poll requested");
                            if !self.poll_once().await {
                                return false;
                            }
                            ticker.reset();
                        }
                        None => {
                            debug!("Command channel closed");
                            return false;
                        }
                    }
                }
            }
        }
    }

    /// Runs one poll and forwards the outcome.
    ///
    /// Returns false only when the event channel is closed.
    async fn poll_once(&self) -> bool {
        match self.client.fetch_sessions().await {
            Ok(sessions) => {
                debug!(count = sessions.len(), "Poll succeeded");
                self.event_tx.send(Event::SessionsFetched(sessions)).is_ok()
            }
            Err(e) => {
                warn!(error = %e, "Poll failed");
                self.event_tx.send(Event::PollFailed(e.to_string())).is_ok()
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
