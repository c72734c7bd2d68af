//! Sync module - live subscription, reconciliation and goal mutations.

mod sync_engine;
mod sync_state;
mod sync_traits;


pub use sync_engine::{SyncEngine, SyncEngineBuilder};
pub use sync_state::{sort_goals, SyncState};
pub use sync_traits::GoalSyncServiceTrait;
