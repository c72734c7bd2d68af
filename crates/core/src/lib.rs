//! Goalsync Core - Domain entities, services, and traits.
//!
//! This crate contains the goal synchronization logic: the wire codec, the
//! sync engine that mirrors a remote goal collection, the session manager
//! that drives it, deadline presentation rules, and reminder scheduling.
//! It is backend-agnostic and defines traits that are implemented by the
//! `storage-memory` crate (or any real document store adapter).

pub mod config;
pub mod constants;
pub mod deadlines;
pub mod documents;
pub mod errors;
pub mod events;
pub mod goals;
pub mod reminders;
pub mod session;
pub mod sync;
pub mod utils;

#[cfg(test)]
pub(crate) mod test_support;

pub use config::SyncConfig;
pub use deadlines::{deadline_status, format_deadline, is_due_soon, is_expired, DeadlineStatus};
pub use goals::{Goal, NewGoal};
pub use session::{Identity, SessionManager, SharedIdentity};
pub use sync::{GoalSyncServiceTrait, SyncEngine, SyncEngineBuilder, SyncState};

// Re-export error types
pub use errors::Error;
pub use errors::Result;
