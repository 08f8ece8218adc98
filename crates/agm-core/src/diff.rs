//! Poll-to-poll session set diffing.
//!
//! Each successful poll replaces the whole session list, so started and
//! ended sessions are detected by diffing id sets between consecutive
//! polls rather than by explicit gateway events.

use crate::SessionId;
use std::collections::HashSet;

/// The difference between two consecutive poll results.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionDiff {
    /// Ids present now but not in the previous poll.
    pub started: Vec<SessionId>,

    /// Ids present in the previous poll but gone now.
    pub ended: Vec<SessionId>,
}

impl SessionDiff {
    /// Computes the diff between the previous and current id sets.
    ///
    /// `previous = None` means there is no baseline yet (the very first
    /// successful poll after a connect). In that case the diff is empty:
    /// firing a "started" event for every session on every reconnect would
    /// be pure noise.
    #[must_use]
    pub fn between(previous: Option<&HashSet<SessionId>>, current: &HashSet<SessionId>) -> Self {
        let Some(previous) = previous else {
            return Self::default();
        };

        let mut started: Vec<SessionId> = current.difference(previous).cloned().collect();
        let mut ended: Vec<SessionId> = previous.difference(current).cloned().collect();

        // Deterministic ordering for stable notification output
        started.sort_by(|a, b| a.as_str().cmp(b.as_str()));
        ended.sort_by(|a, b| a.as_str().cmp(b.as_str()));

        Self { started, ended }
    }

    /// Returns true if nothing changed between the two polls.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.started.is_empty() && self.ended.is_empty()
    }
}
