//! Gateway client error types.

use thiserror::Error;

/// Errors that can occur when talking to the gateway.
#[derive(Error, Debug)]
pub enum GatewayError {
    /// The gateway answered with a non-2xx status.
    ///
    /// The caller must keep the previously displayed session list and only
    /// flip the connectivity indicator; a failed poll never clears state.
    #[error("Gateway returned HTTP {status}")]
    Api { status: u16 },

    /// Transport-level failure (connection refused, timeout, DNS).
    #[error("Gateway request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The configured base URL could not be parsed into a request URL.
    #[error("Invalid gateway base URL: {0}")]
    InvalidBaseUrl(String),
}

impl GatewayError {
    /// Returns the HTTP status for API errors, if applicable.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status } => Some(*status),
            _ => None,
        }
    }
}

/// Result type for gateway operations.
pub type GatewayResult<T> = Result<T, GatewayError>;
