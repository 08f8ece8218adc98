//! Activity state derivation from last-activity timestamps.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Activity State (3-State Model)
// ============================================================================

/// Current activity state of a session.
///
/// A pure function of the session's last-activity timestamp and wall-clock
/// now, split at two configurable thresholds:
/// - **Working**: recent activity, the agent is actively processing
/// - **Idle**: no activity for a while, nothing urgent
/// - **Waiting**: long silence, probably parked on something
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityState {
    /// Recent activity below the working threshold.
    Working,

    /// Between the working and waiting thresholds, or no timestamp at all.
    #[default]
    Idle,

    /// No activity at or beyond the waiting threshold.
    Waiting,
}

impl ActivityState {
    /// Returns the display label for this state.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Working => "working",
            Self::Idle => "idle",
            Self::Waiting => "waiting",
        }
    }

    /// Returns the ASCII icon for this state.
    #[must_use]
    pub fn icon(&self) -> &'static str {
        match self {
            Self::Working => ">",
            Self::Idle => "-",
            Self::Waiting => "z",
        }
    }

    /// Returns true if the session is actively processing.
    #[must_use]
    pub fn is_working(&self) -> bool {
        matches!(self, Self::Working)
    }
}

impl fmt::Display for ActivityState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Working => write!(f, "Working"),
            Self::Idle => write!(f, "Idle"),
            Self::Waiting => write!(f, "Waiting"),
        }
    }
}

// ============================================================================
// Thresholds
// ============================================================================

/// Elapsed-time thresholds for [`ActivityState`] classification.
///
/// These varied between revisions of the upstream dashboard, so they are
/// configuration rather than constants. The defaults match the latest
/// revision: 5 minutes to leave `Working`, 15 minutes to enter `Waiting`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActivityThresholds {
    /// Elapsed time below which a session counts as working.
    pub working: Duration,

    /// Elapsed time at or beyond which a session counts as waiting.
    pub waiting: Duration,
}

impl Default for ActivityThresholds {
    fn default() -> Self {
        Self {
            working: Duration::minutes(5),
            waiting: Duration::minutes(15),
        }
    }
}

impl ActivityThresholds {
    /// Creates thresholds from whole minutes.
    #[must_use]
    pub fn from_minutes(working: i64, waiting: i64) -> Self {
        Self {
            working: Duration::minutes(working),
            waiting: Duration::minutes(waiting),
        }
    }

    /// Classifies a session's activity.
    ///
    /// A missing timestamp classifies as `Idle`: the gateway reports nothing
    /// for sessions that have never spoken, and treating them as working or
    /// waiting would be misleading either way.
    #[must_use]
    pub fn classify(
        &self,
        last_activity: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
    ) -> ActivityState {
        let Some(last) = last_activity else {
            return ActivityState::Idle;
        };

        let elapsed = now.signed_duration_since(last);
        if elapsed < self.working {
            ActivityState::Working
        } else if elapsed < self.waiting {
            ActivityState::Idle
        } else {
            ActivityState::Waiting
        }
    }
}

// ============================================================================
// Display Helpers
// ============================================================================

/// Formats the elapsed time since a timestamp as a compact "ago" string.
///
/// Examples: "just now", "42s ago", "5m ago", "2h ago", "3d ago".
#[must_use]
pub fn format_ago(timestamp: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let elapsed = now.signed_duration_since(timestamp);
    let seconds = elapsed.num_seconds();

    if seconds < 5 {
        "just now".to_string()
    } else if seconds < 60 {
        format!("{seconds}s ago")
    } else if seconds < 3600 {
        format!("{}m ago", seconds / 60)
    } else if seconds < 86_400 {
        format!("{}h ago", seconds / 3600)
    } else {
        format!("{}d ago", seconds / 86_400)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn now() -> DateTime<Utc> {
        // Fixed instant so tests are deterministic
        DateTime::parse_from_rfc3339("2024-06-01T12:00:00Z")
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or_else(|_| Utc::now())
    }

    fn minutes_ago(mins: i64) -> Option<DateTime<Utc>> {
        Some(now() - Duration::minutes(mins))
    }

    #[test]
    fn test_recent_activity_is_working() {
        let thresholds = ActivityThresholds::default();
        assert_eq!(
            thresholds.classify(minutes_ago(1), now()),
            ActivityState::Working
        );
    }

    #[test]
    fn test_moderate_silence_is_idle() {
        let thresholds = ActivityThresholds::default();
        assert_eq!(
            thresholds.classify(minutes_ago(10), now()),
            ActivityState::Idle
        );
    }

    #[test]
    fn test_long_silence_is_waiting() {
        let thresholds = ActivityThresholds::default();
        assert_eq!(
            thresholds.classify(minutes_ago(20), now()),
            ActivityState::Waiting
        );
    }

    #[test]
    fn test_missing_timestamp_is_idle() {
        let thresholds = ActivityThresholds::default();
        assert_eq!(thresholds.classify(None, now()), ActivityState::Idle);
    }

    #[test]
    fn test_waiting_boundary_is_inclusive() {
        let thresholds = ActivityThresholds::default();
        assert_eq!(
            thresholds.classify(minutes_ago(15), now()),
            ActivityState::Waiting
        );
    }

    #[test]
    fn test_working_boundary_is_exclusive() {
        let thresholds = ActivityThresholds::default();
        assert_eq!(
            thresholds.classify(minutes_ago(5), now()),
            ActivityState::Idle
        );
    }

    #[test]
    fn test_custom_thresholds() {
        // Earlier upstream revision used 2/15 minute thresholds
        let thresholds = ActivityThresholds::from_minutes(2, 15);
        assert_eq!(
            thresholds.classify(minutes_ago(3), now()),
            ActivityState::Idle
        );
        assert_eq!(
            thresholds.classify(minutes_ago(1), now()),
            ActivityState::Working
        );
    }

    #[test]
    fn test_future_timestamp_is_working() {
        // Clock skew between gateway and client should not misclassify
        let thresholds = ActivityThresholds::default();
        let future = Some(now() + Duration::minutes(2));
        assert_eq!(thresholds.classify(future, now()), ActivityState::Working);
    }

    #[test]
    fn test_format_ago() {
        assert_eq!(format_ago(now(), now()), "just now");
        assert_eq!(format_ago(now() - Duration::seconds(42), now()), "42s ago");
        assert_eq!(format_ago(now() - Duration::minutes(5), now()), "5m ago");
        assert_eq!(format_ago(now() - Duration::hours(2), now()), "2h ago");
        assert_eq!(format_ago(now() - Duration::days(3), now()), "3d ago");
    }
}
