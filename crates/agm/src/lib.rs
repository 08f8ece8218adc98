//! AGM TUI - Library modules
//!
//! This library provides the dashboard components for monitoring agent
//! sessions behind an HTTP gateway.
//!
//! # Architecture
//!
//! The TUI uses an event-driven architecture with three main components:
//!
//! 1. **Keyboard Task**: Polls for keyboard input and sends events to the main loop
//! 2. **Poller Task**: Fetches the session list from the gateway on a fixed
//!    cadence and forwards results to the main loop
//! 3. **Main Event Loop**: Processes events, updates state, and renders the UI
//!
//! All tasks respect a shared `CancellationToken` for graceful shutdown.

pub mod app;
pub mod client;
pub mod credentials;
pub mod error;
pub mod input;
pub mod ui;

// Re-export commonly used types
pub use app::{App, ConnState};
pub use client::{Poller, PollerConfig};
pub use credentials::Credentials;
pub use error::{Result, TuiError};
