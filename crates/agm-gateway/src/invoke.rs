//! Tool-invocation request types for the gateway API.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Default page size for session listing.
pub const DEFAULT_SESSION_LIMIT: u32 = 20;

/// Default per-session message preview count.
pub const DEFAULT_MESSAGE_LIMIT: u32 = 1;

/// A gateway tool invocation.
///
/// The gateway exposes one generic POST endpoint that names the target tool
/// and its parameters in the body; the session listing used by the dashboard
/// is just one tool behind it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvokeRequest {
    /// Name of the tool to invoke.
    pub tool: String,

    /// Tool-specific parameters.
    pub parameters: Value,
}

impl InvokeRequest {
    /// Creates a new invocation for an arbitrary tool.
    pub fn new(tool: impl Into<String>, parameters: Value) -> Self {
        Self {
            tool: tool.into(),
            parameters,
        }
    }

    /// Creates the "list sessions" invocation.
    ///
    /// `limit` caps the number of sessions returned; `message_limit` caps
    /// the per-session message preview the gateway attaches.
    pub fn list_sessions(limit: u32, message_limit: u32) -> Self {
        Self::new(
            "sessions",
            json!({
                "action": "list",
                "limit": limit,
                "messageLimit": message_limit,
            }),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_sessions_body_shape() {
        let req = InvokeRequest::list_sessions(20, 1);
        let body = serde_json::to_value(&req).unwrap();

        assert_eq!(body["tool"], "sessions");
        assert_eq!(body["parameters"]["action"], "list");
        assert_eq!(body["parameters"]["limit"], 20);
        assert_eq!(body["parameters"]["messageLimit"], 1);
    }

    #[test]
    fn test_invoke_roundtrip() {
        let original = InvokeRequest::list_sessions(5, 2);
        let json = serde_json::to_string(&original).unwrap();
        let parsed: InvokeRequest = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed.tool, "sessions");
        assert_eq!(parsed.parameters["limit"], 5);
    }
}
