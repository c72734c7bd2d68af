//! Observable state published by the sync engine.

use serde::Serialize;

use crate::goals::Goal;

/// Point-in-time view of the engine state.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncState {
    /// Goals from the latest applied snapshot, ascending by deadline.
    pub goals: Vec<Goal>,
    /// True between `start()` and the first snapshot (or error).
    pub is_loading: bool,
    /// User-visible text of the most recent failure.
    pub last_error: Option<String>,
}

impl SyncState {
    pub fn goal(&self, id: &str) -> Option<&Goal> {
        self.goals.iter().find(|goal| goal.id == id)
    }
}

/// Orders goals ascending by deadline; ties fall back to the id so the
/// order does not depend on snapshot delivery order.
pub fn sort_goals(goals: &mut [Goal]) {
    goals.sort_by(|a, b| a.deadline.cmp(&b.deadline).then_with(|| a.id.cmp(&b.id)));
}
