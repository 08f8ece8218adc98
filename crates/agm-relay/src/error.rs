//! Relay error types.

use std::net::SocketAddr;

use thiserror::Error;

/// Errors that can occur when running the relay.
#[derive(Debug, Error)]
pub enum RelayError {
    /// The configured port is already taken, most likely by another relay
    /// instance. Callers should treat this as fatal and exit rather than
    /// retrying on a different port.
    #[error("Port {port} is already in use (is another relay running?)")]
    PortInUse { port: u16 },

    /// Binding the listen address failed for a reason other than the port
    /// being taken.
    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        source: std::io::Error,
    },

    /// The HTTP server itself failed while serving.
    #[error("Relay server error: {0}")]
    Serve(#[from] std::io::Error),

    /// The outbound HTTP client could not be constructed.
    #[error("Failed to build upstream client: {0}")]
    Client(#[from] reqwest::Error),
}

/// Result type for relay operations.
pub type RelayResult<T> = Result<T, RelayError>;
