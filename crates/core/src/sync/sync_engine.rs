use async_trait::async_trait;
use log::{debug, error, info, warn};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, Weak};

use super::sync_state::{sort_goals, SyncState};
use super::sync_traits::GoalSyncServiceTrait;
use crate::config::SyncConfig;
use crate::documents::{DocumentStore, ListenerRegistration, SnapshotResult};
use crate::errors::{Error, Result};
use crate::events::{DomainEvent, DomainEventSink, NoOpDomainEventSink};
use crate::goals::{decode_goal, encode_goal, Goal, NewGoal};
use crate::reminders::ReminderScheduler;
use crate::session::SharedIdentity;
use crate::utils::observable::{ListenerId, Observable};

/// Keeps the local goal list consistent with the remote collection.
///
/// Cheap to clone; clones share one engine. The subscription is released
/// when the last clone is dropped.
#[derive(Clone)]
pub struct SyncEngine {
    inner: Arc<EngineInner>,
}

struct EngineInner {
    store: Arc<dyn DocumentStore>,
    identity: SharedIdentity,
    reminders: Option<Arc<ReminderScheduler>>,
    event_sink: Arc<dyn DomainEventSink>,
    collection: String,
    state: Observable<SyncState>,
    /// Held only for short bookkeeping; never while listeners run or while
    /// the store is subscribing.
    subscription: Mutex<Option<Box<dyn ListenerRegistration>>>,
    started: AtomicBool,
    /// Bumped on every start/stop; snapshots tagged with an older value
    /// belong to a released subscription.
    generation: AtomicU64,
    /// Bumped on every stop; write completions from an older epoch are
    /// dropped.
    epoch: AtomicU64,
}

/// Assembles a [`SyncEngine`] with its optional collaborators.
pub struct SyncEngineBuilder {
    store: Arc<dyn DocumentStore>,
    identity: SharedIdentity,
    collection: String,
    reminders: Option<Arc<ReminderScheduler>>,
    event_sink: Arc<dyn DomainEventSink>,
}

impl SyncEngineBuilder {
    /// Schedule and cancel reminders alongside goal writes.
    pub fn with_reminders(mut self, reminders: Arc<ReminderScheduler>) -> Self {
        self.reminders = Some(reminders);
        self
    }

    pub fn with_event_sink(mut self, event_sink: Arc<dyn DomainEventSink>) -> Self {
        self.event_sink = event_sink;
        self
    }

    pub fn build(self) -> SyncEngine {
        SyncEngine {
            inner: Arc::new(EngineInner {
                store: self.store,
                identity: self.identity,
                reminders: self.reminders,
                event_sink: self.event_sink,
                collection: self.collection,
                state: Observable::default(),
                subscription: Mutex::new(None),
                started: AtomicBool::new(false),
                generation: AtomicU64::new(0),
                epoch: AtomicU64::new(0),
            }),
        }
    }
}

impl SyncEngine {
    /// Engine without reminders or domain events.
    pub fn new(store: Arc<dyn DocumentStore>, identity: SharedIdentity, config: &SyncConfig) -> Self {
        Self::builder(store, identity, config).build()
    }

    pub fn builder(
        store: Arc<dyn DocumentStore>,
        identity: SharedIdentity,
        config: &SyncConfig,
    ) -> SyncEngineBuilder {
        SyncEngineBuilder {
            store,
            identity,
            collection: config.collection.clone(),
            reminders: None,
            event_sink: Arc::new(NoOpDomainEventSink),
        }
    }

    /// Opens the live subscription, releasing any previous one first.
    ///
    /// Listeners may call back into the engine, including from the first
    /// snapshot a store delivers inside `subscribe`.
    pub fn start(&self) -> Result<()> {
        let (generation, previous) = {
            let mut subscription = self.inner.lock_subscription();
            let generation = self.inner.generation.fetch_add(1, Ordering::SeqCst) + 1;
            self.inner.started.store(true, Ordering::SeqCst);
            (generation, subscription.take())
        };
        if let Some(previous) = previous {
            debug!("Releasing previous goals subscription before restart");
            previous.release();
        }

        self.inner.state.update_if(|state| {
            if !self.inner.is_generation(generation) {
                return false;
            }
            state.is_loading = true;
            true
        });

        let weak: Weak<EngineInner> = Arc::downgrade(&self.inner);
        let listener = Arc::new(move |result: SnapshotResult| {
            if let Some(inner) = weak.upgrade() {
                inner.apply_snapshot(generation, result);
            }
        });

        match self.inner.store.subscribe(&self.inner.collection, listener) {
            Ok(handle) => {
                let superseded = {
                    let mut subscription = self.inner.lock_subscription();
                    if self.inner.is_generation(generation) {
                        *subscription = Some(handle);
                        None
                    } else {
                        Some(handle)
                    }
                };
                match superseded {
                    Some(handle) => {
                        debug!("Subscription superseded while opening; releasing it");
                        handle.release();
                    }
                    None => info!("Subscribed to collection '{}'", self.inner.collection),
                }
                Ok(())
            }
            Err(e) => {
                error!("Failed to subscribe to '{}': {}", self.inner.collection, e);
                {
                    let _subscription = self.inner.lock_subscription();
                    if self.inner.is_generation(generation) {
                        self.inner.started.store(false, Ordering::SeqCst);
                    }
                }
                self.inner.state.update_if(|state| {
                    if !self.inner.is_generation(generation) {
                        return false;
                    }
                    state.is_loading = false;
                    state.last_error = Some(format!("Failed to load goals: {}", e));
                    true
                });
                Err(e)
            }
        }
    }

    /// Releases the subscription. No-op when not started.
    pub fn stop(&self) {
        let handle = {
            let mut subscription = self.inner.lock_subscription();
            self.inner.generation.fetch_add(1, Ordering::SeqCst);
            self.inner.epoch.fetch_add(1, Ordering::SeqCst);
            self.inner.started.store(false, Ordering::SeqCst);
            subscription.take()
        };
        if let Some(handle) = handle {
            handle.release();
            info!("Released subscription to '{}'", self.inner.collection);
        }
        self.inner.state.update_if(|state| {
            let was_loading = state.is_loading;
            state.is_loading = false;
            was_loading
        });
    }

    /// Empties the local goal list.
    pub fn reset(&self) {
        self.inner.state.update(|state| state.goals = Vec::new());
    }

    /// True between `start()` and `stop()`, including while the store is
    /// still opening the subscription.
    pub fn is_started(&self) -> bool {
        self.inner.started.load(Ordering::SeqCst)
    }

    /// Records user-visible error text, as remote failures do.
    pub fn report_error(&self, message: impl Into<String>) {
        let message = message.into();
        self.inner
            .state
            .update(|state| state.last_error = Some(message));
    }

    pub(crate) fn event_sink(&self) -> Arc<dyn DomainEventSink> {
        self.inner.event_sink.clone()
    }

    fn fail_write<T>(&self, epoch: u64, context: &str, err: Error) -> Result<T> {
        error!("{}: {}", context, err);
        if self.inner.is_current(epoch) {
            self.report_error(format!("{}: {}", context, err));
        } else {
            debug!("Engine stopped before '{}' completed; error not surfaced", context);
        }
        Err(err)
    }

    /// Brings the goal's reminder in line with its current state.
    async fn sync_reminder(&self, goal: &Goal) {
        if let Some(reminders) = &self.inner.reminders {
            match reminders.schedule(goal).await {
                Ok(outcome) => debug!("Reminder for goal {}: {:?}", goal.id, outcome),
                Err(e) => warn!("Failed to schedule reminder for goal {}: {}", goal.id, e),
            }
        }
    }
}

impl EngineInner {
    fn lock_subscription(&self) -> MutexGuard<'_, Option<Box<dyn ListenerRegistration>>> {
        self.subscription
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn current_epoch(&self) -> u64 {
        self.epoch.load(Ordering::SeqCst)
    }

    fn is_current(&self, epoch: u64) -> bool {
        self.current_epoch() == epoch
    }

    fn is_generation(&self, generation: u64) -> bool {
        self.generation.load(Ordering::SeqCst) == generation
    }

    fn apply_snapshot(&self, generation: u64, result: SnapshotResult) {
        match result {
            Ok(documents) => {
                let received = documents.len();
                let mut goals: Vec<Goal> = documents
                    .iter()
                    .filter_map(|document| match decode_goal(document) {
                        Ok(goal) => Some(goal),
                        Err(e) => {
                            debug!("Dropping undecodable goal document: {}", e);
                            None
                        }
                    })
                    .collect();
                sort_goals(&mut goals);
                let count = goals.len();

                // The generation check runs under the state lock so a
                // concurrent stop()+reset() cannot be overwritten.
                let applied = self.state.update_if(|state| {
                    if !self.is_generation(generation) {
                        return false;
                    }
                    state.goals = goals;
                    state.is_loading = false;
                    true
                });
                if applied {
                    debug!("Applied snapshot with {} goal(s)", count);
                    self.event_sink
                        .emit(DomainEvent::goals_synced(count, received - count));
                } else {
                    debug!("Ignoring snapshot from a released subscription");
                }
            }
            Err(e) => {
                let applied = self.state.update_if(|state| {
                    if !self.is_generation(generation) {
                        return false;
                    }
                    state.last_error = Some(format!("Failed to load goals: {}", e));
                    state.is_loading = false;
                    true
                });
                if applied {
                    error!("Goals snapshot failed: {}", e);
                }
            }
        }
    }
}

impl Drop for EngineInner {
    fn drop(&mut self) {
        if let Some(handle) = self.lock_subscription().take() {
            handle.release();
        }
    }
}

#[async_trait]
impl GoalSyncServiceTrait for SyncEngine {
    fn snapshot(&self) -> SyncState {
        self.inner.state.get()
    }

    fn on_change(&self, listener: Box<dyn Fn(&SyncState) + Send + Sync>) -> ListenerId {
        self.inner.state.on_change(listener)
    }

    fn remove_listener(&self, id: ListenerId) -> bool {
        self.inner.state.remove_listener(id)
    }

    async fn add(&self, new_goal: NewGoal) -> Result<String> {
        let Some(identity) = self.inner.identity.get() else {
            let err = Error::NotAuthenticated;
            warn!("Rejected goal creation without a session");
            self.report_error(err.to_string());
            return Err(err);
        };

        let new_goal = match new_goal.normalized() {
            Ok(new_goal) => new_goal,
            Err(e) => {
                let err = Error::from(e);
                self.report_error(err.to_string());
                return Err(err);
            }
        };

        let goal = Goal::create(new_goal, identity.uid);
        let epoch = self.inner.current_epoch();
        let id = match self
            .inner
            .store
            .add_document(&self.inner.collection, encode_goal(&goal))
            .await
        {
            Ok(id) => id,
            Err(e) => return self.fail_write(epoch, "Failed to add goal", e),
        };

        if !self.inner.is_current(epoch) {
            debug!("Engine stopped before goal {} was acknowledged", id);
            return Ok(id);
        }
        debug!("Created goal {}", id);
        self.inner.event_sink.emit(DomainEvent::goal_created(id.as_str()));
        self.sync_reminder(&goal.with_id(id.as_str())).await;
        Ok(id)
    }

    async fn update(&self, goal: &Goal) -> Result<()> {
        let epoch = self.inner.current_epoch();
        if let Err(e) = self
            .inner
            .store
            .set_document(&self.inner.collection, &goal.id, encode_goal(goal))
            .await
        {
            return self.fail_write(epoch, "Failed to update goal", e);
        }

        if !self.inner.is_current(epoch) {
            debug!("Engine stopped before update of goal {} completed", goal.id);
            return Ok(());
        }
        self.inner.event_sink.emit(DomainEvent::goal_updated(goal.id.as_str()));
        self.sync_reminder(goal).await;
        Ok(())
    }

    async fn toggle_completion(&self, goal: &Goal) -> Result<()> {
        self.update(&goal.toggled()).await
    }

    async fn delete(&self, goal: &Goal) -> Result<()> {
        let epoch = self.inner.current_epoch();
        if let Err(e) = self
            .inner
            .store
            .delete_document(&self.inner.collection, &goal.id)
            .await
        {
            return self.fail_write(epoch, "Failed to delete goal", e);
        }

        if !self.inner.is_current(epoch) {
            debug!("Engine stopped before delete of goal {} completed", goal.id);
            return Ok(());
        }
        self.inner.event_sink.emit(DomainEvent::goal_deleted(goal.id.as_str()));
        if let Some(reminders) = &self.inner.reminders {
            reminders.cancel(&goal.id).await;
        }
        Ok(())
    }

    fn clear_error(&self) {
        self.inner.state.update_if(|state| state.last_error.take().is_some());
    }
}
