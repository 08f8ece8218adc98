//! Response-shape extraction for the session listing.
//!
//! The gateway has shipped the session array under several different
//! envelopes over time. Rather than scattering shape checks across call
//! sites, one ordered list of extractors is tried in sequence; the first
//! match wins. Unknown shapes and malformed embedded JSON degrade to an
//! empty list so one bad poll never kills the polling loop.

use serde_json::Value;
use tracing::{debug, warn};

/// Extracts the raw session array from a gateway response body.
///
/// Known shapes, tried in priority order:
/// 1. flat: `{ "sessions": [...] }`
/// 2. nested details: `{ "result": { "details": { "sessions": [...] } } }`
/// 3. text envelope: `{ "result": { "content": [ { "text": "<json>" } ] } }`
///    where `<json>` decodes to `{ "sessions": [...] }`
///
/// Returns an empty list when no shape matches. Never errors, never panics.
#[must_use]
pub fn extract_sessions(body: &Value) -> Vec<Value> {
    const EXTRACTORS: &[fn(&Value) -> Option<Vec<Value>>] =
        &[extract_flat, extract_details, extract_text_envelope];

    for extractor in EXTRACTORS {
        if let Some(sessions) = extractor(body) {
            return sessions;
        }
    }

    debug!("No known session shape in gateway response");
    Vec::new()
}

/// Shape 1: sessions array directly at the top level.
fn extract_flat(body: &Value) -> Option<Vec<Value>> {
    body.get("sessions")
        .and_then(Value::as_array)
        .map(|a| a.to_vec())
}

/// Shape 2: sessions array nested under `result.details`.
fn extract_details(body: &Value) -> Option<Vec<Value>> {
    body.get("result")
        .and_then(|r| r.get("details"))
        .and_then(|d| d.get("sessions"))
        .and_then(Value::as_array)
        .map(|a| a.to_vec())
}

/// Shape 3: JSON-encoded string inside `result.content[0].text`.
fn extract_text_envelope(body: &Value) -> Option<Vec<Value>> {
    let text = body
        .get("result")
        .and_then(|r| r.get("content"))
        .and_then(Value::as_array)
        .and_then(|c| c.first())
        .and_then(|entry| entry.get("text"))
        .and_then(Value::as_str)?;

    match serde_json::from_str::<Value>(text) {
        Ok(inner) => inner
            .get("sessions")
            .and_then(Value::as_array)
            .map(|a| a.to_vec()),
        Err(e) => {
            // Swallowed on purpose: a malformed envelope is a bad poll,
            // not a reason to stop polling.
            warn!(error = %e, "Failed to parse embedded session JSON");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_sessions() -> Value {
        json!([
            { "id": "agent:main", "lastActivity": "2024-06-01T12:00:00Z" },
            { "id": "agent:subagent:1" }
        ])
    }

    #[test]
    fn test_flat_shape() {
        let body = json!({ "sessions": sample_sessions() });
        assert_eq!(extract_sessions(&body).len(), 2);
    }

    #[test]
    fn test_details_shape() {
        let body = json!({ "result": { "details": { "sessions": sample_sessions() } } });
        assert_eq!(extract_sessions(&body).len(), 2);
    }

    #[test]
    fn test_text_envelope_shape() {
        let inner = json!({ "sessions": sample_sessions() }).to_string();
        let body = json!({ "result": { "content": [ { "text": inner } ] } });
        assert_eq!(extract_sessions(&body).len(), 2);
    }

    #[test]
    fn test_all_shapes_yield_identical_lists() {
        let flat = json!({ "sessions": sample_sessions() });
        let details = json!({ "result": { "details": { "sessions": sample_sessions() } } });
        let inner = json!({ "sessions": sample_sessions() }).to_string();
        let envelope = json!({ "result": { "content": [ { "text": inner } ] } });

        let from_flat = extract_sessions(&flat);
        assert_eq!(from_flat, extract_sessions(&details));
        assert_eq!(from_flat, extract_sessions(&envelope));
    }

    #[test]
    fn test_flat_wins_over_nested() {
        // Priority order: the flat field is authoritative when both exist
        let body = json!({
            "sessions": [ { "id": "flat" } ],
            "result": { "details": { "sessions": sample_sessions() } }
        });
        let sessions = extract_sessions(&body);
        assert_eq!(sessions.len(), 1);
        assert_eq!(sessions.first().and_then(|s| s["id"].as_str()), Some("flat"));
    }

    #[test]
    fn test_unknown_shape_is_empty() {
        assert!(extract_sessions(&json!({})).is_empty());
        assert!(extract_sessions(&json!({ "result": {} })).is_empty());
        assert!(extract_sessions(&json!({ "sessions": "not-an-array" })).is_empty());
    }

    #[test]
    fn test_malformed_inputs_never_panic() {
        for body in [
            json!(null),
            json!(42),
            json!("plain string"),
            json!([1, 2, 3]),
            json!({ "result": { "content": [] } }),
            json!({ "result": { "content": [ { "text": 7 } ] } }),
        ] {
            assert!(extract_sessions(&body).is_empty());
        }
    }

    #[test]
    fn test_broken_embedded_json_is_swallowed() {
        let body = json!({ "result": { "content": [ { "text": "{not json" } ] } });
        assert!(extract_sessions(&body).is_empty());
    }

    #[test]
    fn test_embedded_json_without_sessions_key() {
        let body = json!({ "result": { "content": [ { "text": "{\"ok\":true}" } ] } });
        assert!(extract_sessions(&body).is_empty());
    }
}
