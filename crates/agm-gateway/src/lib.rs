//! AGM Gateway - Wire protocol and client for the agent gateway
//!
//! This crate provides the tool-invocation request types, the defensive
//! response-shape extraction, raw-session normalization, and the HTTP
//! client used by the dashboard to poll the gateway (usually through the
//! local relay, which adds the CORS headers browsers need but which this
//! native client simply passes through).

pub mod client;
pub mod error;
pub mod extract;
pub mod invoke;
pub mod parse;

pub use client::{GatewayClient, GatewayConfig, INVOKE_PATH};
pub use error::{GatewayError, GatewayResult};
pub use extract::extract_sessions;
pub use invoke::InvokeRequest;
pub use parse::normalize_session;
