//! AGM Core - Shared types for agent gateway monitoring
//!
//! This crate provides the core domain types shared between
//! the relay (agm-relay) and the TUI dashboard (agm).
//!
//! All code follows the panic-free policy: no `.unwrap()`, `.expect()`,
//! `panic!()`, `unreachable!()`, `todo!()`, or direct indexing `[i]`.

pub mod activity;
pub mod diff;
pub mod session;

// Re-exports for convenience
pub use activity::{format_ago, ActivityState, ActivityThresholds};
pub use diff::SessionDiff;
pub use session::{session_uid, SessionId, SessionKind, SessionRecord, DEFAULT_CONTEXT_TOKENS};
