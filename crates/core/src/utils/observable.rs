//! Observable value holder with change listeners.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, RwLock};

/// Identifies a registered change listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type Listener<T> = Arc<dyn Fn(&T) + Send + Sync>;

/// Holds a value and fans out every committed change to listeners.
///
/// Readers always observe a complete value: updates are applied under a
/// write lock and listeners receive a clone taken before the lock is
/// released. Listeners run on the updating thread, outside any lock.
pub struct Observable<T: Clone + Send + Sync> {
    value: RwLock<T>,
    listeners: Mutex<Vec<(ListenerId, Listener<T>)>>,
    next_id: AtomicU64,
}

impl<T: Clone + Send + Sync + Default> Default for Observable<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: Clone + Send + Sync> Observable<T> {
    pub fn new(value: T) -> Self {
        Self {
            value: RwLock::new(value),
            listeners: Mutex::new(Vec::new()),
            next_id: AtomicU64::new(1),
        }
    }

    /// Returns a clone of the current value.
    pub fn get(&self) -> T {
        match self.value.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Replaces the value and notifies listeners.
    pub fn set(&self, value: T) {
        self.update(|current| *current = value);
    }

    /// Mutates the value in place and notifies listeners.
    pub fn update(&self, f: impl FnOnce(&mut T)) {
        self.update_if(|current| {
            f(current);
            true
        });
    }

    /// Mutates the value; listeners are notified only when `f` returns true.
    ///
    /// `f` runs under the write lock, so checks made inside it are atomic
    /// with respect to other updates.
    pub fn update_if(&self, f: impl FnOnce(&mut T) -> bool) -> bool {
        let committed = {
            let mut guard = match self.value.write() {
                Ok(guard) => guard,
                Err(poisoned) => poisoned.into_inner(),
            };
            if !f(&mut *guard) {
                return false;
            }
            guard.clone()
        };

        let listeners: Vec<Listener<T>> = self
            .lock_listeners()
            .iter()
            .map(|(_, listener)| listener.clone())
            .collect();
        for listener in listeners {
            listener(&committed);
        }
        true
    }

    /// Registers a listener called after every committed change.
    pub fn on_change(&self, listener: impl Fn(&T) + Send + Sync + 'static) -> ListenerId {
        let id = ListenerId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.lock_listeners().push((id, Arc::new(listener)));
        id
    }

    /// Unregisters a listener. Returns false when the id is unknown.
    pub fn remove_listener(&self, id: ListenerId) -> bool {
        let mut listeners = self.lock_listeners();
        let before = listeners.len();
        listeners.retain(|(existing, _)| *existing != id);
        listeners.len() != before
    }

    fn lock_listeners(&self) -> MutexGuard<'_, Vec<(ListenerId, Listener<T>)>> {
        self.listeners
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
