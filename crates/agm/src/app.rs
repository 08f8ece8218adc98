//! Application state machine for the AGM TUI.
//!
//! This module defines the core state model for the dashboard, including
//! connectivity tracking, the session store, and the notification feed.
//!
//! All code follows the panic-free policy: no `.unwrap()`, `.expect()`,
//! `panic!()`, `unreachable!()`, `todo!()`, or direct indexing `[i]`.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};

use agm_core::{ActivityState, ActivityThresholds, SessionDiff, SessionId, SessionRecord};

/// Maximum number of notifications kept in the feed.
const MAX_NOTIFICATIONS: usize = 5;

// ============================================================================
// Connectivity State
// ============================================================================

/// Connectivity of the dashboard to the gateway.
///
/// `Degraded` means an earlier poll succeeded but the latest one failed:
/// the session list on screen is kept but may be stale. A failed initial
/// connect lands in `Disconnected` and stays there until the user asks
/// for a reconnect.
#[derive(Debug, Clone, PartialEq)]
pub enum ConnState {
    /// No connection established; waiting for a manual reconnect.
    Disconnected {
        /// Why the last attempt failed, for display.
        reason: Option<String>,
    },

    /// Initial connection attempt in progress.
    Connecting,

    /// Last poll succeeded; data on screen is current.
    Connected,

    /// Previously connected, but the latest poll failed.
    Degraded {
        /// When polls started failing.
        since: DateTime<Utc>,
    },
}

impl Default for ConnState {
    fn default() -> Self {
        Self::Connecting
    }
}

// ============================================================================
// Application
// ============================================================================

/// Core application state for the AGM TUI.
///
/// Holds the normalized session store, connectivity state, the started /
/// ended notification feed, and UI selection state.
#[derive(Debug, Clone)]
pub struct App {
    /// Current connectivity to the gateway.
    pub state: ConnState,

    /// All sessions from the latest successful poll, indexed by ID.
    pub sessions: HashMap<SessionId, SessionRecord>,

    /// Thresholds used to classify session activity.
    pub thresholds: ActivityThresholds,

    /// Recent started/ended notifications, newest first.
    pub notifications: Vec<String>,

    /// Index of the currently selected session in the sorted list.
    pub selected_index: usize,

    /// Flag indicating the application should quit.
    pub should_quit: bool,

    /// Timestamp of the last successful poll.
    pub last_update: DateTime<Utc>,

    /// Whether blinking status icons are currently visible.
    /// Toggles every 500ms (5 ticks at 100ms tick rate).
    pub blink_visible: bool,

    /// Internal tick counter for blink timing.
    tick_count: u32,

    /// Session IDs seen by the previous poll. `None` until the first poll
    /// lands, which is what suppresses spurious "started" notifications
    /// for pre-existing sessions.
    known_ids: Option<HashSet<SessionId>>,
}

impl Default for App {
    fn default() -> Self {
        Self::new(ActivityThresholds::default())
    }
}

impl App {
    /// Creates a new App in the Connecting state.
    pub fn new(thresholds: ActivityThresholds) -> Self {
        Self {
            state: ConnState::Connecting,
            sessions: HashMap::new(),
            thresholds,
            notifications: Vec::new(),
            selected_index: 0,
            should_quit: false,
            last_update: Utc::now(),
            blink_visible: true,
            tick_count: 0,
            known_ids: None,
        }
    }

    /// Applies a successful poll result.
    ///
    /// Diffs the incoming ID set against the previous poll to emit
    /// started/ended notifications, then replaces the session store
    /// wholesale. The first poll establishes the baseline silently.
    pub fn apply_poll(&mut self, records: Vec<SessionRecord>) {
        let current: HashSet<SessionId> = records.iter().map(|r| r.id.clone()).collect();
        let diff = SessionDiff::between(self.known_ids.as_ref(), &current);

        for id in &diff.started {
            self.push_notification(format!("Session started: {}", id.short()));
        }
        for id in &diff.ended {
            self.push_notification(format!("Session ended: {}", id.short()));
        }

        self.known_ids = Some(current);
        self.sessions = records.into_iter().map(|r| (r.id.clone(), r)).collect();
        self.state = ConnState::Connected;
        self.last_update = Utc::now();

        self.clamp_selection();
    }

    /// Records a failed poll.
    ///
    /// A failure after a successful connect degrades the connection but
    /// keeps the last known session list on screen. A failure during the
    /// initial connect drops to Disconnected, where the poller waits for
    /// a manual reconnect.
    pub fn poll_failed(&mut self, reason: impl Into<String>) {
        match &self.state {
            ConnState::Connected => {
                self.state = ConnState::Degraded { since: Utc::now() };
            }
            ConnState::Degraded { .. } => {
                // Already degraded; keep the original failure time
            }
            ConnState::Connecting | ConnState::Disconnected { .. } => {
                self.state = ConnState::Disconnected {
                    reason: Some(reason.into()),
                };
            }
        }
    }

    /// Transitions back to Connecting for a manual reconnect attempt.
    pub fn begin_reconnect(&mut self) {
        self.state = ConnState::Connecting;
    }

    /// Returns true when a manual reconnect is the only way forward.
    pub fn is_disconnected(&self) -> bool {
        matches!(self.state, ConnState::Disconnected { .. })
    }

    /// Classifies a session's activity using the configured thresholds.
    pub fn activity_of(&self, session: &SessionRecord, now: DateTime<Utc>) -> ActivityState {
        self.thresholds.classify(session.last_activity, now)
    }

    /// Returns sessions sorted by last activity (most recent first).
    ///
    /// Sessions without an activity timestamp sort last; ties break on
    /// the session ID so the ordering is stable across polls.
    pub fn sessions_sorted(&self) -> Vec<&SessionRecord> {
        let mut sessions: Vec<&SessionRecord> = self.sessions.values().collect();
        sessions.sort_by(|a, b| {
            b.last_activity
                .cmp(&a.last_activity)
                .then_with(|| a.id.as_str().cmp(b.id.as_str()))
        });
        sessions
    }

    /// Returns the currently selected session, if any.
    pub fn selected_session(&self) -> Option<&SessionRecord> {
        let sorted = self.sessions_sorted();
        sorted.get(self.selected_index).copied()
    }

    /// Navigates to the next session (downward), wrapping around if needed.
    pub fn select_next(&mut self) {
        let session_count = self.sessions.len();
        if session_count == 0 {
            self.selected_index = 0;
            return;
        }
        self.selected_index = (self.selected_index.saturating_add(1)) % session_count;
    }

    /// Navigates to the previous session (upward), wrapping around if needed.
    pub fn select_previous(&mut self) {
        let session_count = self.sessions.len();
        if session_count == 0 {
            self.selected_index = 0;
            return;
        }
        if self.selected_index == 0 {
            self.selected_index = session_count.saturating_sub(1);
        } else {
            self.selected_index = self.selected_index.saturating_sub(1);
        }
    }

    /// Clamps the selected_index to a valid range.
    fn clamp_selection(&mut self) {
        let session_count = self.sessions.len();
        if session_count == 0 {
            self.selected_index = 0;
        } else if self.selected_index >= session_count {
            self.selected_index = session_count.saturating_sub(1);
        }
    }

    /// Advances the blink animation by one tick.
    ///
    /// Should be called every 100ms (on each event loop tick).
    /// Toggles `blink_visible` every 5 ticks (500ms).
    pub fn tick(&mut self) {
        self.tick_count = self.tick_count.wrapping_add(1);
        if self.tick_count % 5 == 0 {
            self.blink_visible = !self.blink_visible;
        }
    }

    /// Sets the quit flag, signaling the application should exit.
    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    /// Returns the number of sessions currently tracked.
    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }

    /// Returns the number of sessions classified as working.
    pub fn working_count(&self, now: DateTime<Utc>) -> usize {
        self.sessions
            .values()
            .filter(|s| self.activity_of(s, now) == ActivityState::Working)
            .count()
    }

    /// Returns the number of sessions classified as waiting.
    pub fn waiting_count(&self, now: DateTime<Utc>) -> usize {
        self.sessions
            .values()
            .filter(|s| self.activity_of(s, now) == ActivityState::Waiting)
            .count()
    }

    /// Returns the total token count across all sessions.
    pub fn total_tokens(&self) -> u64 {
        self.sessions.values().map(|s| s.total_tokens).sum()
    }

    /// Returns the most recent notification, if any.
    pub fn latest_notification(&self) -> Option<&str> {
        self.notifications.first().map(String::as_str)
    }

    /// Prepends a notification, keeping the feed bounded.
    fn push_notification(&mut self, message: String) {
        self.notifications.insert(0, message);
        self.notifications.truncate(MAX_NOTIFICATIONS);
    }
}

// ============================================================================
// Tests
// ============================================================================
