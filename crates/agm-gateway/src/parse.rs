//! Normalizing raw gateway session objects.
//!
//! Raw sessions may carry any subset of the known fields, with token and
//! message counters either at the top level or nested under `stats`. The
//! mapping is pure and total: any JSON value produces a valid record, with
//! wrong-typed or missing fields degrading to defaults rather than erroring.

use agm_core::{session_uid, SessionRecord};
use chrono::{DateTime, Utc};
use serde_json::Value;

/// Maps a raw gateway session object to a normalized [`SessionRecord`].
///
/// Never fails; identity comes from [`session_uid`] and everything else
/// falls back to the record defaults.
#[must_use]
pub fn normalize_session(raw: &Value) -> SessionRecord {
    let mut record = SessionRecord::new(session_uid(raw));

    record.label = string_field(raw, "label");
    record.channel = string_field(raw, "channel");
    record.model = string_field(raw, "model");
    record.last_activity = timestamp_field(raw, "lastActivity")
        .or_else(|| timestamp_field(raw, "lastActivityAt"))
        .or_else(|| timestamp_field(raw, "updatedAt"));

    // Counters live under `stats` in newer gateway builds, at the top
    // level in older ones
    let stats = raw.get("stats").unwrap_or(raw);
    if let Some(total) = count_field(stats, "totalTokens") {
        record.total_tokens = total;
    }
    if let Some(context) = count_field(stats, "contextTokens") {
        record.context_tokens = context;
    }
    if let Some(messages) = count_field(stats, "messageCount") {
        record.message_count = messages;
    }

    record
}

/// Reads a non-empty string field.
fn string_field(raw: &Value, key: &str) -> Option<String> {
    raw.get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Reads an RFC 3339 timestamp field, or an epoch-milliseconds number.
fn timestamp_field(raw: &Value, key: &str) -> Option<DateTime<Utc>> {
    let value = raw.get(key)?;
    if let Some(text) = value.as_str() {
        return DateTime::parse_from_rfc3339(text)
            .ok()
            .map(|dt| dt.with_timezone(&Utc));
    }
    if let Some(millis) = value.as_i64() {
        return DateTime::from_timestamp_millis(millis);
    }
    None
}

/// Reads a non-negative integer counter, tolerating float encodings.
fn count_field(raw: &Value, key: &str) -> Option<u64> {
    let value = raw.get(key)?;
    if let Some(n) = value.as_u64() {
        return Some(n);
    }
    value.as_f64().filter(|f| *f >= 0.0).map(|f| f as u64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use agm_core::{SessionKind, DEFAULT_CONTEXT_TOKENS};
    use serde_json::json;

    #[test]
    fn test_full_session_object() {
        let raw = json!({
            "id": "agent:main",
            "label": "research",
            "channel": "telegram",
            "model": "opus-4",
            "lastActivity": "2024-06-01T12:00:00Z",
            "stats": {
                "totalTokens": 12345,
                "contextTokens": 200000,
                "messageCount": 42
            }
        });

        let record = normalize_session(&raw);
        assert_eq!(record.id.as_str(), "agent:main");
        assert_eq!(record.label.as_deref(), Some("research"));
        assert_eq!(record.channel.as_deref(), Some("telegram"));
        assert_eq!(record.model.as_deref(), Some("opus-4"));
        assert_eq!(record.kind, SessionKind::Main);
        assert_eq!(record.total_tokens, 12345);
        assert_eq!(record.context_tokens, 200000);
        assert_eq!(record.message_count, 42);
        assert!(record.last_activity.is_some());
    }

    #[test]
    fn test_top_level_counters() {
        // Older gateway builds report counters without the stats wrapper
        let raw = json!({ "id": "agent:main", "totalTokens": 7, "messageCount": 2 });
        let record = normalize_session(&raw);
        assert_eq!(record.total_tokens, 7);
        assert_eq!(record.message_count, 2);
    }

    #[test]
    fn test_empty_object_yields_defaults() {
        let record = normalize_session(&json!({}));
        assert_eq!(record.total_tokens, 0);
        assert_eq!(record.context_tokens, DEFAULT_CONTEXT_TOKENS);
        assert_eq!(record.message_count, 0);
        assert_eq!(record.kind, SessionKind::Main);
        assert!(record.label.is_none());
        assert!(record.last_activity.is_none());
    }

    #[test]
    fn test_wrong_typed_fields_degrade_to_defaults() {
        let raw = json!({
            "id": "agent:main",
            "label": 42,
            "lastActivity": true,
            "stats": { "totalTokens": "lots", "messageCount": -3 }
        });

        let record = normalize_session(&raw);
        assert!(record.label.is_none());
        assert!(record.last_activity.is_none());
        assert_eq!(record.total_tokens, 0);
        assert_eq!(record.message_count, 0);
    }

    #[test]
    fn test_never_panics_on_non_objects() {
        for raw in [json!(null), json!("x"), json!([]), json!(3.14)] {
            let record = normalize_session(&raw);
            assert!(!record.id.as_str().is_empty());
        }
    }

    #[test]
    fn test_kind_derived_from_uid() {
        let raw = json!({ "sessionId": "agent:subagent:7" });
        assert_eq!(normalize_session(&raw).kind, SessionKind::Subagent);

        let raw = json!({ "key": "agent:isolated:2" });
        assert_eq!(normalize_session(&raw).kind, SessionKind::Isolated);
    }

    #[test]
    fn test_epoch_millis_timestamp() {
        let raw = json!({ "id": "agent:main", "lastActivity": 1717243200000_i64 });
        let record = normalize_session(&raw);
        assert!(record.last_activity.is_some());
    }

    #[test]
    fn test_unparseable_timestamp_is_none() {
        let raw = json!({ "id": "agent:main", "lastActivity": "yesterday-ish" });
        assert!(normalize_session(&raw).last_activity.is_none());
    }

    #[test]
    fn test_alternate_timestamp_keys() {
        let raw = json!({ "id": "a", "lastActivityAt": "2024-06-01T12:00:00Z" });
        assert!(normalize_session(&raw).last_activity.is_some());

        let raw = json!({ "id": "a", "updatedAt": "2024-06-01T12:00:00Z" });
        assert!(normalize_session(&raw).last_activity.is_some());
    }
}
