//! HTTP client for the gateway's tool-invocation endpoint.

use std::time::Duration;

use agm_core::SessionRecord;
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::{GatewayError, GatewayResult};
use crate::extract::extract_sessions;
use crate::invoke::{InvokeRequest, DEFAULT_MESSAGE_LIMIT, DEFAULT_SESSION_LIMIT};
use crate::parse::normalize_session;

/// Path of the tool-invocation endpoint, relative to the base URL.
///
/// When the base URL points at the local relay, the relay strips the
/// `/api` prefix before forwarding upstream.
pub const INVOKE_PATH: &str = "/api/tools/invoke";

// ============================================================================
// Configuration
// ============================================================================

/// Configuration for the gateway client.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Base URL of the gateway (or of the relay in front of it).
    pub base_url: String,

    /// Bearer token sent on every request.
    pub token: String,

    /// Page size for session listing.
    pub session_limit: u32,

    /// Per-session message preview count.
    pub message_limit: u32,

    /// Per-request timeout. The polling loop runs on a fixed cadence, so a
    /// hung request must never outlive the interval it was scheduled in.
    pub timeout: Duration,
}

impl GatewayConfig {
    /// Creates a config with default limits and timeout.
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            token: token.into(),
            session_limit: DEFAULT_SESSION_LIMIT,
            message_limit: DEFAULT_MESSAGE_LIMIT,
            timeout: Duration::from_secs(5),
        }
    }
}

// ============================================================================
// Gateway Client
// ============================================================================

/// Client for the gateway's tool-invocation API.
///
/// Stateless between calls; one instance is shared by the polling loop for
/// connection reuse.
#[derive(Debug, Clone)]
pub struct GatewayClient {
    config: GatewayConfig,
    http: reqwest::Client,
}

impl GatewayClient {
    /// Creates a new client from the given configuration.
    pub fn new(config: GatewayConfig) -> GatewayResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;
        Ok(Self { config, http })
    }

    /// Returns the configured base URL.
    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    /// Fetches and normalizes the current session list.
    ///
    /// Issues one POST to the tool-invocation endpoint. A non-2xx answer
    /// fails with [`GatewayError::Api`]; a 2xx body is run through the
    /// shape extractors and each raw session is normalized. Unknown body
    /// shapes yield an empty list rather than an error.
    pub async fn fetch_sessions(&self) -> GatewayResult<Vec<SessionRecord>> {
        let url = self.invoke_url()?;
        let request =
            InvokeRequest::list_sessions(self.config.session_limit, self.config.message_limit);

        let response = self
            .http
            .post(url)
            .bearer_auth(&self.config.token)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            warn!(status = status.as_u16(), "Gateway rejected session listing");
            return Err(GatewayError::Api {
                status: status.as_u16(),
            });
        }

        let body: Value = response.json().await?;
        let sessions: Vec<SessionRecord> = extract_sessions(&body)
            .iter()
            .map(normalize_session)
            .collect();

        debug!(count = sessions.len(), "Fetched session list");
        Ok(sessions)
    }

    /// Builds the full invocation URL from the base URL.
    fn invoke_url(&self) -> GatewayResult<String> {
        let base = self.config.base_url.trim_end_matches('/');
        if base.is_empty() {
            return Err(GatewayError::InvalidBaseUrl(
                self.config.base_url.clone(),
            ));
        }
        Ok(format!("{base}{INVOKE_PATH}"))
    }
}

// ============================================================================
// Tests
// ============================================================================
