//! Error types for the AGM TUI.
//!
//! This module defines TUI-specific errors spanning terminal setup,
//! credential storage, and gateway communication.
//!
//! **Panic-Free Policy:** This module follows the project's panic-free guidelines.
//! No `.unwrap()`, `.expect()`, `panic!()`, `unreachable!()`, or `todo!()`.

use std::io;

use thiserror::Error;

// ============================================================================
// TUI Error Type
// ============================================================================

/// TUI application errors.
#[derive(Error, Debug)]
pub enum TuiError {
    /// Failed to initialize the terminal.
    ///
    /// Common causes: a non-TTY environment (pipes, scripts) or an
    /// unsupported terminal emulator.
    #[error("Failed to initialize terminal: {0}")]
    TerminalInit(String),

    /// Failed to restore the terminal to its original state on exit.
    /// Running `reset` can help recover a garbled terminal.
    #[error("Failed to restore terminal: {0}")]
    TerminalCleanup(String),

    /// No gateway credentials available.
    ///
    /// Raised when neither saved credentials nor the `--gateway-url` /
    /// `--token` flags provide a way to reach the gateway.
    #[error("No gateway credentials: {0}")]
    MissingCredentials(String),

    /// Gateway client error passthrough.
    #[error("Gateway error: {0}")]
    Gateway(#[from] agm_gateway::GatewayError),

    /// I/O error passthrough.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON parse error passthrough, typically from a corrupt
    /// credentials file.
    #[error("Failed to parse JSON: {0}")]
    ParseError(#[from] serde_json::Error),
}

// ============================================================================
// Result Type Alias
// ============================================================================

/// Convenience Result type alias for TUI operations.
pub type Result<T> = std::result::Result<T, TuiError>;

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_init_error_display() {
        let error = TuiError::TerminalInit("not a TTY".to_string());
        let display = format!("{error}");
        assert!(display.contains("Failed to initialize terminal"));
        assert!(display.contains("not a TTY"));
    }

    #[test]
    fn test_missing_credentials_display() {
        let error = TuiError::MissingCredentials("pass --gateway-url and --token".to_string());
        let display = format!("{error}");
        assert!(display.contains("No gateway credentials"));
        assert!(display.contains("--gateway-url"));
    }

    #[test]
    fn test_io_error_from_conversion() {
        let io_error = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let tui_error: TuiError = io_error.into();
        assert!(matches!(tui_error, TuiError::Io(_)));
    }

    #[test]
    fn test_parse_error_from_conversion() {
        let parse_result: std::result::Result<serde_json::Value, _> =
            serde_json::from_str("{ invalid json }");
        let json_error = match parse_result {
            Err(e) => e,
            Ok(_) => panic!("Expected parse failure"),
        };
        let tui_error: TuiError = json_error.into();
        assert!(matches!(tui_error, TuiError::ParseError(_)));
    }

    #[test]
    fn test_gateway_error_from_conversion() {
        let gateway_error = agm_gateway::GatewayError::Api { status: 503 };
        let tui_error: TuiError = gateway_error.into();
        assert!(matches!(tui_error, TuiError::Gateway(_)));
        assert!(format!("{tui_error}").contains("503"));
    }
}
