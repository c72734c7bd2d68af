//! Domain event types.

use serde::{Deserialize, Serialize};

/// Domain events emitted by the sync core after successful operations.
///
/// These events represent facts about goal data. They are emitted only once
/// the remote store acknowledged a write or a snapshot was applied.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DomainEvent {
    /// A goal document was created. `goal_id` is the store-assigned id.
    GoalCreated { goal_id: String },

    /// A goal document was overwritten.
    GoalUpdated { goal_id: String },

    /// A goal document was removed.
    GoalDeleted { goal_id: String },

    /// A snapshot replaced the local goal list.
    GoalsSynced {
        count: usize,
        /// Records dropped because they failed to decode
        dropped: usize,
    },

    /// The session identity changed (`None` after sign-out).
    SessionChanged { uid: Option<String> },
}

impl DomainEvent {
    /// Creates a GoalCreated event.
    pub fn goal_created(goal_id: impl Into<String>) -> Self {
        Self::GoalCreated {
            goal_id: goal_id.into(),
        }
    }

    /// Creates a GoalUpdated event.
    pub fn goal_updated(goal_id: impl Into<String>) -> Self {
        Self::GoalUpdated {
            goal_id: goal_id.into(),
        }
    }

    /// Creates a GoalDeleted event.
    pub fn goal_deleted(goal_id: impl Into<String>) -> Self {
        Self::GoalDeleted {
            goal_id: goal_id.into(),
        }
    }

    /// Creates a GoalsSynced event.
    pub fn goals_synced(count: usize, dropped: usize) -> Self {
        Self::GoalsSynced { count, dropped }
    }

    /// Creates a SessionChanged event.
    pub fn session_changed(uid: Option<String>) -> Self {
        Self::SessionChanged { uid }
    }
}
