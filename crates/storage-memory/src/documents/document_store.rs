use async_trait::async_trait;
use log::{debug, info};
use std::collections::{BTreeMap, HashMap, VecDeque};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, Weak};
use uuid::Uuid;

use goalsync_core::documents::{
    DocumentStore, ListenerRegistration, RawDocument, RawRecord, SnapshotListener, SnapshotResult,
};
use goalsync_core::errors::TransportError;
use goalsync_core::Result;

use crate::errors::{IntoCore, StorageError};

/// Store operations that accept injected faults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreOperation {
    Subscribe,
    Add,
    Set,
    Delete,
}

type Collection = BTreeMap<String, RawRecord>;

#[derive(Default)]
struct StoreState {
    collections: HashMap<String, Collection>,
    faults: HashMap<StoreOperation, VecDeque<TransportError>>,
}

struct Subscriber {
    collection: String,
    listener: SnapshotListener,
}

#[derive(Default)]
struct StoreInner {
    state: Mutex<StoreState>,
    subscribers: Mutex<BTreeMap<u64, Subscriber>>,
    next_subscriber: AtomicU64,
}

/// In-process document store with live collection subscriptions.
///
/// Every committed write pushes a full snapshot of the written collection to
/// its subscribers, ordered by document id. Listeners run on the writing
/// task with no store lock held.
#[derive(Clone, Default)]
pub struct MemoryDocumentStore {
    inner: Arc<StoreInner>,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes the next call of `operation` fail with `err`. Faults queue up
    /// per operation and are consumed in order.
    pub fn fail_next(&self, operation: StoreOperation, err: TransportError) {
        self.inner
            .lock_state()
            .faults
            .entry(operation)
            .or_default()
            .push_back(err);
    }

    /// Writes a record without validation and notifies subscribers.
    ///
    /// Lets callers seed documents another client wrote, malformed ones
    /// included.
    pub fn insert_raw(&self, collection: &str, id: &str, record: RawRecord) {
        self.inner.commit(collection, |documents| {
            documents.insert(id.to_string(), record);
        });
    }

    /// Delivers a snapshot error to every subscriber of `collection`.
    pub fn push_error(&self, collection: &str, err: TransportError) {
        self.inner.broadcast(collection, Err(err));
    }

    pub fn document(&self, collection: &str, id: &str) -> Option<RawRecord> {
        self.inner
            .lock_state()
            .collections
            .get(collection)
            .and_then(|documents| documents.get(id).cloned())
    }

    pub fn len(&self, collection: &str) -> usize {
        self.inner
            .lock_state()
            .collections
            .get(collection)
            .map_or(0, BTreeMap::len)
    }

    pub fn is_empty(&self, collection: &str) -> bool {
        self.len(collection) == 0
    }

    /// Number of live (unreleased) subscriptions.
    pub fn subscriber_count(&self) -> usize {
        self.inner.lock_subscribers().len()
    }
}

impl StoreInner {
    fn lock_state(&self) -> MutexGuard<'_, StoreState> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn lock_subscribers(&self) -> MutexGuard<'_, BTreeMap<u64, Subscriber>> {
        self.subscribers
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn take_fault(&self, operation: StoreOperation) -> std::result::Result<(), StorageError> {
        match self
            .lock_state()
            .faults
            .get_mut(&operation)
            .and_then(VecDeque::pop_front)
        {
            Some(err) => {
                debug!("Injected fault for {:?}: {}", operation, err);
                Err(StorageError::Injected(err))
            }
            None => Ok(()),
        }
    }

    fn snapshot(&self, collection: &str) -> Vec<RawDocument> {
        self.lock_state()
            .collections
            .get(collection)
            .map(|documents| {
                documents
                    .iter()
                    .map(|(id, record)| RawDocument::new(id.clone(), record.clone()))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Applies `f` to the collection, then notifies its subscribers.
    fn commit(&self, collection: &str, f: impl FnOnce(&mut Collection)) {
        let documents = {
            let mut state = self.lock_state();
            let documents = state.collections.entry(collection.to_string()).or_default();
            f(documents);
            documents
                .iter()
                .map(|(id, record)| RawDocument::new(id.clone(), record.clone()))
                .collect::<Vec<_>>()
        };
        self.broadcast(collection, Ok(documents));
    }

    fn broadcast(&self, collection: &str, result: SnapshotResult) {
        let listeners: Vec<SnapshotListener> = self
            .lock_subscribers()
            .values()
            .filter(|subscriber| subscriber.collection == collection)
            .map(|subscriber| subscriber.listener.clone())
            .collect();
        for listener in listeners {
            listener(result.clone());
        }
    }
}

/// Handle returned by [`MemoryDocumentStore::subscribe`]. Releasing twice
/// is harmless.
pub struct MemoryRegistration {
    store: Weak<StoreInner>,
    id: u64,
}

impl ListenerRegistration for MemoryRegistration {
    fn release(&self) {
        if let Some(store) = self.store.upgrade() {
            if store.lock_subscribers().remove(&self.id).is_some() {
                debug!("Released subscription {}", self.id);
            }
        }
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    fn subscribe(
        &self,
        collection: &str,
        listener: SnapshotListener,
    ) -> Result<Box<dyn ListenerRegistration>> {
        self.inner.take_fault(StoreOperation::Subscribe).into_core()?;

        let id = self.inner.next_subscriber.fetch_add(1, Ordering::SeqCst);
        self.inner.lock_subscribers().insert(
            id,
            Subscriber {
                collection: collection.to_string(),
                listener: listener.clone(),
            },
        );
        info!("Opened subscription {} on '{}'", id, collection);

        // Initial snapshot, as live queries deliver the current contents first.
        listener(Ok(self.inner.snapshot(collection)));

        Ok(Box::new(MemoryRegistration {
            store: Arc::downgrade(&self.inner),
            id,
        }))
    }

    async fn add_document(&self, collection: &str, record: RawRecord) -> Result<String> {
        self.inner.take_fault(StoreOperation::Add).into_core()?;
        let id = Uuid::new_v4().simple().to_string();
        self.inner.commit(collection, |documents| {
            documents.insert(id.clone(), record);
        });
        debug!("Added document {} to '{}'", id, collection);
        Ok(id)
    }

    async fn set_document(&self, collection: &str, id: &str, record: RawRecord) -> Result<()> {
        self.inner.take_fault(StoreOperation::Set).into_core()?;
        self.inner.commit(collection, |documents| {
            documents.insert(id.to_string(), record);
        });
        debug!("Set document {} in '{}'", id, collection);
        Ok(())
    }

    async fn delete_document(&self, collection: &str, id: &str) -> Result<()> {
        self.inner.take_fault(StoreOperation::Delete).into_core()?;
        self.inner.commit(collection, |documents| {
            documents.remove(id);
        });
        debug!("Deleted document {} from '{}'", id, collection);
        Ok(())
    }
}
