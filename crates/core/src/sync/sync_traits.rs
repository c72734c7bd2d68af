use async_trait::async_trait;

use super::sync_state::SyncState;
use crate::errors::Result;
use crate::goals::{Goal, NewGoal};
use crate::utils::observable::ListenerId;

/// Caller-facing goal operations.
///
/// Mutations never touch the local list directly: the visible list changes
/// only when the subscription delivers the next snapshot.
#[async_trait]
pub trait GoalSyncServiceTrait: Send + Sync {
    /// Current state of the engine.
    fn snapshot(&self) -> SyncState;

    /// Registers a listener called with every committed state.
    fn on_change(&self, listener: Box<dyn Fn(&SyncState) + Send + Sync>) -> ListenerId;

    fn remove_listener(&self, id: ListenerId) -> bool;

    /// Creates a goal owned by the signed-in user. Returns the store id.
    async fn add(&self, new_goal: NewGoal) -> Result<String>;

    /// Overwrites the goal document keyed by `goal.id`.
    async fn update(&self, goal: &Goal) -> Result<()>;

    /// Writes the goal back with its completion flag inverted.
    async fn toggle_completion(&self, goal: &Goal) -> Result<()>;

    /// Removes the goal document and its pending reminder.
    async fn delete(&self, goal: &Goal) -> Result<()>;

    fn clear_error(&self);
}
