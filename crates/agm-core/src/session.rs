//! Session domain entities and value objects.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

// ============================================================================
// Type-Safe Identifiers
// ============================================================================

/// Unique identifier for a gateway session.
///
/// Wraps whatever identity string the gateway reports (e.g.
/// "agent:main:telegram" or a UUID). Derived via [`session_uid`] when the
/// gateway does not provide an explicit id. Must be stable across polls for
/// the same logical session so the UI can diff poll results incrementally.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    /// Creates a new SessionId from a string.
    ///
    /// Note: This does not validate the format. The gateway provides
    /// the identity, so we trust its shape.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the underlying string reference.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns a shortened display form (first 10 characters).
    ///
    /// Useful for compact TUI display.
    #[must_use]
    pub fn short(&self) -> &str {
        self.0.get(..10).unwrap_or(&self.0)
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for SessionId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for SessionId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl AsRef<str> for SessionId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// ============================================================================
// Identity Derivation
// ============================================================================

/// Derives a best-effort unique identity for a raw gateway session object.
///
/// The gateway is not consistent about which field carries identity, so a
/// fixed fallback chain is applied:
///
/// 1. explicit `sessionId`
/// 2. generic `id`
/// 3. `key`
/// 4. composite `channel:label`
/// 5. timestamp fallback (unique within a poll, not stable across polls)
///
/// This is the single identity function for the whole system; every call
/// site that needs a session identity must go through it so identity
/// semantics cannot drift.
pub fn session_uid(raw: &Value) -> SessionId {
    let explicit = raw
        .get("sessionId")
        .and_then(Value::as_str)
        .or_else(|| raw.get("id").and_then(Value::as_str))
        .or_else(|| raw.get("key").and_then(Value::as_str))
        .filter(|s| !s.is_empty());

    if let Some(id) = explicit {
        return SessionId::new(id);
    }

    // Composite key from channel + label when both are present
    let channel = raw.get("channel").and_then(Value::as_str);
    let label = raw.get("label").and_then(Value::as_str);
    if let (Some(channel), Some(label)) = (channel, label) {
        if !channel.is_empty() && !label.is_empty() {
            return SessionId::new(format!("{channel}:{label}"));
        }
    }

    // Last resort: unique within this poll, not stable across polls.
    // The counter disambiguates calls landing on the same clock reading.
    static FALLBACK_SEQ: AtomicU64 = AtomicU64::new(0);
    let nanos = Utc::now().timestamp_nanos_opt().unwrap_or_default();
    let seq = FALLBACK_SEQ.fetch_add(1, Ordering::Relaxed);
    SessionId::new(format!("session-{nanos}-{seq}"))
}

// ============================================================================
// Session Kind
// ============================================================================

/// The kind of agent behind a session.
///
/// The gateway does not report this explicitly; it is derived from marker
/// substrings in the session id. Exactly one kind applies; `Main` is the
/// default when no marker matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionKind {
    /// Primary agent session (no marker in the id).
    #[default]
    Main,

    /// Spawned subagent session.
    Subagent,

    /// Isolated/sandboxed session.
    Isolated,
}

impl SessionKind {
    /// Derives the kind from a session id.
    ///
    /// Check order is fixed: `subagent` before `isolated` before the
    /// `Main` default.
    #[must_use]
    pub fn from_id(id: &str) -> Self {
        if id.contains("subagent") {
            Self::Subagent
        } else if id.contains("isolated") {
            Self::Isolated
        } else {
            Self::Main
        }
    }

    /// Returns the display label for this kind.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Main => "main",
            Self::Subagent => "subagent",
            Self::Isolated => "isolated",
        }
    }

    /// Returns a single-character marker for compact list rows.
    #[must_use]
    pub fn marker(&self) -> &'static str {
        match self {
            Self::Main => "M",
            Self::Subagent => "S",
            Self::Isolated => "I",
        }
    }
}

impl fmt::Display for SessionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

// ============================================================================
// Session Record
// ============================================================================

/// Assumed context-window ceiling when the gateway does not report one.
pub const DEFAULT_CONTEXT_TOKENS: u64 = 200_000;

/// Display name used for main sessions that carry no label.
pub const MAIN_SESSION_NAME: &str = "main";

/// A normalized gateway session.
///
/// This is not the gateway-native shape; raw session objects arrive in
/// several envelope variants and with any subset of these fields, and are
/// flattened into this record by `agm-gateway`. The set of records visible
/// to the UI always equals the most recent successful poll result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionRecord {
    /// Best-effort unique identity, stable across polls (see [`session_uid`]).
    pub id: SessionId,

    /// Human display name. Absent for main sessions.
    pub label: Option<String>,

    /// Derived agent kind.
    pub kind: SessionKind,

    /// Timestamp of the last activity on this session, if reported.
    pub last_activity: Option<DateTime<Utc>>,

    /// Cumulative token usage.
    pub total_tokens: u64,

    /// Context-window ceiling for this session.
    pub context_tokens: u64,

    /// Number of messages exchanged.
    pub message_count: u64,

    /// Transport channel (e.g. "telegram"), if reported.
    pub channel: Option<String>,

    /// Model identifier, if reported.
    pub model: Option<String>,
}

impl SessionRecord {
    /// Creates a record with defaults for everything but the id.
    ///
    /// The kind is derived from the id.
    pub fn new(id: impl Into<SessionId>) -> Self {
        let id = id.into();
        let kind = SessionKind::from_id(id.as_str());
        Self {
            id,
            label: None,
            kind,
            last_activity: None,
            total_tokens: 0,
            context_tokens: DEFAULT_CONTEXT_TOKENS,
            message_count: 0,
            channel: None,
            model: None,
        }
    }

    /// Returns the name to display for this session.
    ///
    /// Falls back to a fixed default for unlabeled sessions rather than
    /// leaking raw ids into the primary display position.
    #[must_use]
    pub fn display_name(&self) -> &str {
        match self.label.as_deref() {
            Some(label) if !label.is_empty() => label,
            _ => MAIN_SESSION_NAME,
        }
    }

    /// Returns context usage as a percentage (0.0 - 100.0).
    ///
    /// A zero ceiling yields 0% rather than a division error.
    #[must_use]
    pub fn context_percentage(&self) -> f64 {
        if self.context_tokens == 0 {
            return 0.0;
        }
        (self.total_tokens as f64 / self.context_tokens as f64) * 100.0
    }
}

// ============================================================================
// Tests
// ============================================================================
