//! Keyboard input handling for the AGM TUI.
//!
//! This module provides event types and handlers for keyboard input,
//! terminal resizing, and poller results.
//!
//! All code follows the panic-free policy: no `.unwrap()`, `.expect()`,
//! `panic!()`, `unreachable!()`, `todo!()`, or direct indexing `[i]`.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use agm_core::SessionRecord;

use crate::app::App;

// ============================================================================
// Event Types
// ============================================================================

/// Events that the TUI can receive and process.
///
/// These events drive the main event loop and include both user input
/// and results from the gateway poller.
#[derive(Debug, Clone)]
pub enum Event {
    /// Keyboard input from the user.
    Key(KeyEvent),

    /// Terminal window resize event.
    Resize(u16, u16),

    /// A poll completed with a fresh session list.
    SessionsFetched(Vec<SessionRecord>),

    /// A poll failed after the connection was established.
    PollFailed(String),

    /// The initial connection attempt failed.
    ConnectFailed(String),
}

// ============================================================================
// Client Commands
// ============================================================================

/// Commands that can be sent to the poller from the main loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientCommand {
    /// Retry the initial connection after a failure.
    Reconnect,

    /// Poll now instead of waiting for the next interval tick.
    RefreshNow,
}

// ============================================================================
// Action Types
// ============================================================================

/// Actions that can result from user input.
///
/// These actions are returned by the input handler to signal what
/// the main loop should do in response to user input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// No action required.
    None,

    /// Quit the application.
    Quit,

    /// Request an immediate poll.
    Refresh,

    /// Retry the initial connection.
    Reconnect,
}

// ============================================================================
// Input Handler
// ============================================================================

/// Handles a keyboard event and updates application state accordingly.
///
/// Returns an `Action` indicating what the main loop should do in response.
///
/// # Key Bindings
///
/// | Key          | Action                                      |
/// |--------------|---------------------------------------------|
/// | `q`, `Q`     | Quit the application                        |
/// | `Esc`        | Quit the application                        |
/// | `Ctrl+C`     | Quit the application                        |
/// | `j`, `Down`  | Select the next session                     |
/// | `k`, `Up`    | Select the previous session                 |
/// | `r`, `R`     | Refresh now, or reconnect when disconnected |
#[must_use]
pub fn handle_key_event(key: KeyEvent, app: &mut App) -> Action {
    // Ctrl+C is an unconditional quit
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.quit();
        return Action::Quit;
    }

    match key.code {
        // Quit keys
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
            app.quit();
            Action::Quit
        }

        // Navigation: next session
        KeyCode::Char('j') | KeyCode::Down => {
            app.select_next();
            Action::None
        }

        // Navigation: previous session
        KeyCode::Char('k') | KeyCode::Up => {
            app.select_previous();
            Action::None
        }

        // Refresh doubles as the manual reconnect trigger: a dashboard
        // stuck in Disconnected never retries on its own
        KeyCode::Char('r') | KeyCode::Char('R') => {
            if app.is_disconnected() {
                app.begin_reconnect();
                Action::Reconnect
            } else {
                Action::Refresh
            }
        }

        // Unhandled keys
        _ => Action::None,
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use agm_core::SessionId;

    /// Creates a test KeyEvent with no modifiers.
    fn key_event(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn test_session(id: &str) -> SessionRecord {
        SessionRecord::new(SessionId::new(id))
    }

    // ------------------------------------------------------------------------
    // Quit key tests
    // ------------------------------------------------------------------------

    #[test]
    fn test_q_quits() {
        let mut app = App::default();
        let action = handle_key_event(key_event(KeyCode::Char('q')), &mut app);
        assert_eq!(action, Action::Quit);
        assert!(app.should_quit);
    }

    #[test]
    fn test_escape_quits() {
        let mut app = App::default();
        let action = handle_key_event(key_event(KeyCode::Esc), &mut app);
        assert_eq!(action, Action::Quit);
        assert!(app.should_quit);
    }

    #[test]
    fn test_ctrl_c_quits() {
        let mut app = App::default();
        let action = handle_key_event(
            KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL),
            &mut app,
        );
        assert_eq!(action, Action::Quit);
        assert!(app.should_quit);
    }

    // ------------------------------------------------------------------------
    // Navigation key tests
    // ------------------------------------------------------------------------

    #[test]
    fn test_j_selects_next() {
        let mut app = App::default();
        app.apply_poll(vec![test_session("agent:a"), test_session("agent:b")]);
        assert_eq!(app.selected_index, 0);

        let action = handle_key_event(key_event(KeyCode::Char('j')), &mut app);
        assert_eq!(action, Action::None);
        assert_eq!(app.selected_index, 1);
    }

    #[test]
    fn test_arrow_keys_navigate() {
        let mut app = App::default();
        app.apply_poll(vec![test_session("agent:a"), test_session("agent:b")]);

        handle_key_event(key_event(KeyCode::Down), &mut app);
        assert_eq!(app.selected_index, 1);

        handle_key_event(key_event(KeyCode::Up), &mut app);
        assert_eq!(app.selected_index, 0);
    }

    // ------------------------------------------------------------------------
    // Refresh / reconnect tests
    // ------------------------------------------------------------------------

    #[test]
    fn test_r_refreshes_when_connected() {
        let mut app = App::default();
        app.apply_poll(vec![test_session("agent:a")]);

        let action = handle_key_event(key_event(KeyCode::Char('r')), &mut app);
        assert_eq!(action, Action::Refresh);
    }

    #[test]
    fn test_r_reconnects_when_disconnected() {
        let mut app = App::default();
        app.poll_failed("connection refused");
        assert!(app.is_disconnected());

        let action = handle_key_event(key_event(KeyCode::Char('r')), &mut app);
        assert_eq!(action, Action::Reconnect);
        assert_eq!(app.state, crate::app::ConnState::Connecting);
    }

    #[test]
    fn test_uppercase_r_refreshes() {
        let mut app = App::default();
        let action = handle_key_event(key_event(KeyCode::Char('R')), &mut app);
        assert_eq!(action, Action::Refresh);
    }

    // ------------------------------------------------------------------------
    // Unhandled key tests
    // ------------------------------------------------------------------------

    #[test]
    fn test_unhandled_key_returns_none() {
        let mut app = App::default();
        let action = handle_key_event(key_event(KeyCode::Char('x')), &mut app);
        assert_eq!(action, Action::None);
        assert!(!app.should_quit);
    }

    // ------------------------------------------------------------------------
    // Event type tests
    // ------------------------------------------------------------------------

    #[test]
    fn test_event_sessions_fetched_variant() {
        let event = Event::SessionsFetched(vec![test_session("agent:a")]);
        match event {
            Event::SessionsFetched(sessions) => assert_eq!(sessions.len(), 1),
            _ => panic!("Expected SessionsFetched event"),
        }
    }

    #[test]
    fn test_event_failure_variants() {
        assert!(matches!(
            Event::PollFailed("timeout".to_string()),
            Event::PollFailed(_)
        ));
        assert!(matches!(
            Event::ConnectFailed("refused".to_string()),
            Event::ConnectFailed(_)
        ));
    }
}
