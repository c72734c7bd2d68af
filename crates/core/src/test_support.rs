//! Hand-written collaborator mocks shared by unit tests.

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{mpsc, Arc, Mutex};
use std::thread;
use std::time::Duration;
use tokio::sync::Notify;

use crate::documents::{
    DocumentStore, FieldValue, ListenerRegistration, RawDocument, RawRecord, SnapshotListener,
    SnapshotResult,
};
use crate::errors::{Error, Result, TransportError};
use crate::goals::{encode_goal, Goal};
use crate::reminders::{NotificationCenter, PermissionStatus, ReminderRequest};
use crate::session::{AuthProvider, Identity, IdentityListener};
use crate::utils::time_utils::Clock;

pub fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
}

pub fn goal(id: &str, name: &str, deadline: DateTime<Utc>) -> Goal {
    Goal {
        id: id.to_string(),
        name: name.to_string(),
        description: format!("{} description", name),
        deadline,
        is_completed: false,
        created_by: "u1".to_string(),
    }
}

pub fn document(goal: &Goal) -> RawDocument {
    RawDocument::new(goal.id.clone(), encode_goal(goal))
}

/// Runs `f` on a worker thread; panics if it has not finished in 5 s.
pub fn run_with_timeout<T: Send + 'static>(f: impl FnOnce() -> T + Send + 'static) -> T {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let _ = tx.send(f());
    });
    rx.recv_timeout(Duration::from_secs(5))
        .expect("call did not complete within 5s")
}

pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Counts `release()` calls for one registration.
pub struct CountingRegistration {
    releases: Arc<AtomicUsize>,
}

impl ListenerRegistration for CountingRegistration {
    fn release(&self) {
        self.releases.fetch_add(1, Ordering::SeqCst);
    }
}

// ---------------------------------------------------------------------------
// Document store
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub enum StoreCall {
    Add { collection: String, record: RawRecord },
    Set { collection: String, id: String, record: RawRecord },
    Delete { collection: String, id: String },
}

pub struct Subscription {
    pub collection: String,
    pub listener: SnapshotListener,
    pub releases: Arc<AtomicUsize>,
}

#[derive(Default)]
pub struct MockDocumentStore {
    subscriptions: Mutex<Vec<Subscription>>,
    calls: Mutex<Vec<StoreCall>>,
    fail_subscribe: Mutex<Option<TransportError>>,
    fail_writes: Mutex<Option<TransportError>>,
    next_id: AtomicUsize,
    /// When set, writes record their call and then wait for a permit.
    write_gate: Mutex<Option<Arc<Notify>>>,
    /// Delivered to each new listener before `subscribe` returns.
    initial_snapshot: Mutex<Option<Vec<RawDocument>>>,
}

impl MockDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<StoreCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn subscription_count(&self) -> usize {
        self.subscriptions.lock().unwrap().len()
    }

    /// Release count of the `index`-th subscription ever opened.
    pub fn releases(&self, index: usize) -> usize {
        self.subscriptions.lock().unwrap()[index]
            .releases
            .load(Ordering::SeqCst)
    }

    pub fn subscribed_collection(&self, index: usize) -> String {
        self.subscriptions.lock().unwrap()[index].collection.clone()
    }

    pub fn fail_subscribe_with(&self, err: TransportError) {
        *self.fail_subscribe.lock().unwrap() = Some(err);
    }

    pub fn deliver_on_subscribe(&self, documents: Vec<RawDocument>) {
        *self.initial_snapshot.lock().unwrap() = Some(documents);
    }

    pub fn fail_writes_with(&self, err: Option<TransportError>) {
        *self.fail_writes.lock().unwrap() = err;
    }

    pub fn gate_writes(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        *self.write_gate.lock().unwrap() = Some(gate.clone());
        gate
    }

    /// Delivers `result` to the `index`-th subscription, released or not.
    pub fn emit_to(&self, index: usize, result: SnapshotResult) {
        let listener = self.subscriptions.lock().unwrap()[index].listener.clone();
        listener(result);
    }

    /// Delivers `documents` to the most recent subscription.
    pub fn emit(&self, documents: Vec<RawDocument>) {
        let last = self.subscription_count() - 1;
        self.emit_to(last, Ok(documents));
    }

    async fn write(&self, call: StoreCall) -> std::result::Result<(), TransportError> {
        self.calls.lock().unwrap().push(call);
        let gate = self.write_gate.lock().unwrap().clone();
        if let Some(gate) = gate {
            gate.notified().await;
        }
        match self.fail_writes.lock().unwrap().clone() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl DocumentStore for MockDocumentStore {
    fn subscribe(
        &self,
        collection: &str,
        listener: SnapshotListener,
    ) -> Result<Box<dyn ListenerRegistration>> {
        if let Some(err) = self.fail_subscribe.lock().unwrap().clone() {
            return Err(err.into());
        }
        let releases = Arc::new(AtomicUsize::new(0));
        self.subscriptions.lock().unwrap().push(Subscription {
            collection: collection.to_string(),
            listener: listener.clone(),
            releases: releases.clone(),
        });
        let initial = self.initial_snapshot.lock().unwrap().clone();
        if let Some(documents) = initial {
            listener(Ok(documents));
        }
        Ok(Box::new(CountingRegistration { releases }))
    }

    async fn add_document(&self, collection: &str, record: RawRecord) -> Result<String> {
        self.write(StoreCall::Add {
            collection: collection.to_string(),
            record,
        })
        .await?;
        let n = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(format!("doc-{}", n))
    }

    async fn set_document(&self, collection: &str, id: &str, record: RawRecord) -> Result<()> {
        self.write(StoreCall::Set {
            collection: collection.to_string(),
            id: id.to_string(),
            record,
        })
        .await?;
        Ok(())
    }

    async fn delete_document(&self, collection: &str, id: &str) -> Result<()> {
        self.write(StoreCall::Delete {
            collection: collection.to_string(),
            id: id.to_string(),
        })
        .await?;
        Ok(())
    }
}

/// Field lookup helper for recorded writes.
pub fn field<'a>(record: &'a RawRecord, name: &str) -> &'a FieldValue {
    record.get(name).unwrap()
}

// ---------------------------------------------------------------------------
// Notification center
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub enum NotificationCall {
    Schedule(ReminderRequest),
    Cancel(String),
}

pub struct MockNotificationCenter {
    permission: Mutex<PermissionStatus>,
    calls: Mutex<Vec<NotificationCall>>,
    fail_schedule: Mutex<bool>,
}

impl MockNotificationCenter {
    pub fn new(permission: PermissionStatus) -> Self {
        Self {
            permission: Mutex::new(permission),
            calls: Mutex::new(Vec::new()),
            fail_schedule: Mutex::new(false),
        }
    }

    pub fn granted() -> Self {
        Self::new(PermissionStatus::Granted)
    }

    pub fn calls(&self) -> Vec<NotificationCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn set_fail_schedule(&self, fail: bool) {
        *self.fail_schedule.lock().unwrap() = fail;
    }
}

#[async_trait]
impl NotificationCenter for MockNotificationCenter {
    async fn request_permission(&self) -> Result<PermissionStatus> {
        Ok(*self.permission.lock().unwrap())
    }

    async fn permission_status(&self) -> PermissionStatus {
        *self.permission.lock().unwrap()
    }

    async fn schedule_one_shot(&self, request: ReminderRequest) -> Result<()> {
        if *self.fail_schedule.lock().unwrap() {
            return Err(Error::Notification("center offline".to_string()));
        }
        self.calls
            .lock()
            .unwrap()
            .push(NotificationCall::Schedule(request));
        Ok(())
    }

    async fn cancel(&self, id: &str) {
        self.calls
            .lock()
            .unwrap()
            .push(NotificationCall::Cancel(id.to_string()));
    }
}

// ---------------------------------------------------------------------------
// Auth provider
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct MockAuthProvider {
    listeners: Mutex<Vec<(IdentityListener, Arc<AtomicUsize>)>>,
    failure: Mutex<Option<Error>>,
}

impl MockAuthProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_with(&self, err: Option<Error>) {
        *self.failure.lock().unwrap() = err;
    }

    /// Pushes `identity` to every listener that has not been released.
    pub fn emit(&self, identity: Option<Identity>) {
        let listeners: Vec<IdentityListener> = self
            .listeners
            .lock()
            .unwrap()
            .iter()
            .filter(|(_, releases)| releases.load(Ordering::SeqCst) == 0)
            .map(|(listener, _)| listener.clone())
            .collect();
        for listener in listeners {
            listener(identity.clone());
        }
    }

    pub fn releases(&self, index: usize) -> usize {
        self.listeners.lock().unwrap()[index].1.load(Ordering::SeqCst)
    }

    fn check(&self) -> Result<()> {
        match self.failure.lock().unwrap().clone() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl AuthProvider for MockAuthProvider {
    fn on_identity_change(&self, listener: IdentityListener) -> Box<dyn ListenerRegistration> {
        let releases = Arc::new(AtomicUsize::new(0));
        self.listeners
            .lock()
            .unwrap()
            .push((listener, releases.clone()));
        Box::new(CountingRegistration { releases })
    }

    async fn sign_in(&self, email: &str, _password: &str) -> Result<Identity> {
        self.check()?;
        Ok(Identity::new(format!("uid-{}", email)).with_email(email))
    }

    async fn sign_up(&self, email: &str, _password: &str) -> Result<Identity> {
        self.check()?;
        Ok(Identity::new(format!("uid-{}", email)).with_email(email))
    }

    async fn sign_out(&self) -> Result<()> {
        self.check()
    }
}
