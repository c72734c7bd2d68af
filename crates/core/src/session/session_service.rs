use log::{debug, info, warn};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, Weak};

use super::session_model::{Identity, SharedIdentity};
use super::session_traits::{AuthProvider, IdentityListener};
use crate::documents::ListenerRegistration;
use crate::errors::{Error, Result};
use crate::events::DomainEvent;
use crate::sync::SyncEngine;
use crate::utils::observable::ListenerId;

/// Tracks the authenticated identity and drives the sync engine lifecycle.
///
/// Signed in: the engine holds a live subscription. Signed out: the engine
/// is stopped and the local goal list is empty.
#[derive(Clone)]
pub struct SessionManager {
    inner: Arc<SessionInner>,
}

struct SessionInner {
    identity: SharedIdentity,
    engine: SyncEngine,
    auth: Arc<dyn AuthProvider>,
    transitions: Mutex<TransitionQueue>,
    registration: Mutex<Option<Box<dyn ListenerRegistration>>>,
}

/// Identity changes waiting to be applied. One caller at a time drains the
/// queue; changes raised meanwhile (including from listeners) are appended
/// and applied in order by that caller.
#[derive(Default)]
struct TransitionQueue {
    pending: VecDeque<Option<Identity>>,
    draining: bool,
}

impl SessionManager {
    /// `identity` must be the handle the engine was built with.
    pub fn new(auth: Arc<dyn AuthProvider>, engine: SyncEngine, identity: SharedIdentity) -> Self {
        Self {
            inner: Arc::new(SessionInner {
                identity,
                engine,
                auth,
                transitions: Mutex::new(TransitionQueue::default()),
                registration: Mutex::new(None),
            }),
        }
    }

    pub fn current_identity(&self) -> Option<Identity> {
        self.inner.identity.get()
    }

    pub fn engine(&self) -> &SyncEngine {
        &self.inner.engine
    }

    pub fn on_change(
        &self,
        listener: impl Fn(&Option<Identity>) + Send + Sync + 'static,
    ) -> ListenerId {
        self.inner.identity.on_change(listener)
    }

    pub fn remove_listener(&self, id: ListenerId) -> bool {
        self.inner.identity.remove_listener(id)
    }

    /// Registers with the auth provider's identity feed, replacing any
    /// earlier registration.
    pub fn attach(&self) {
        let weak: Weak<SessionInner> = Arc::downgrade(&self.inner);
        let listener: IdentityListener = Arc::new(move |identity| {
            if let Some(inner) = weak.upgrade() {
                inner.handle_identity_change(identity);
            }
        });

        // Providers may call back synchronously; no lock is held here.
        let registration = self.inner.auth.on_identity_change(listener);
        let previous = self.inner.lock_registration().replace(registration);
        if let Some(previous) = previous {
            debug!("Replacing previous identity feed registration");
            previous.release();
        }
    }

    /// Releases the identity feed registration, if any. The current
    /// identity and the engine are left as they are.
    pub fn detach(&self) {
        if let Some(registration) = self.inner.lock_registration().take() {
            registration.release();
            debug!("Detached from identity feed");
        }
    }

    /// Applies an identity transition. When another transition is in
    /// progress the change is queued behind it.
    pub fn handle_identity_change(&self, identity: Option<Identity>) {
        self.inner.handle_identity_change(identity);
    }

    pub async fn sign_in(&self, email: &str, password: &str) -> Result<Identity> {
        match self.inner.auth.sign_in(email, password).await {
            Ok(identity) => {
                self.inner.handle_identity_change(Some(identity.clone()));
                Ok(identity)
            }
            Err(e) => Err(self.inner.auth_failed("Sign in failed", e)),
        }
    }

    pub async fn sign_up(&self, email: &str, password: &str) -> Result<Identity> {
        match self.inner.auth.sign_up(email, password).await {
            Ok(identity) => {
                self.inner.handle_identity_change(Some(identity.clone()));
                Ok(identity)
            }
            Err(e) => Err(self.inner.auth_failed("Sign up failed", e)),
        }
    }

    pub async fn sign_out(&self) -> Result<()> {
        match self.inner.auth.sign_out().await {
            Ok(()) => {
                self.inner.handle_identity_change(None);
                Ok(())
            }
            Err(e) => Err(self.inner.auth_failed("Sign out failed", e)),
        }
    }
}

impl SessionInner {
    fn lock_registration(&self) -> MutexGuard<'_, Option<Box<dyn ListenerRegistration>>> {
        self.registration
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn lock_transitions(&self) -> MutexGuard<'_, TransitionQueue> {
        self.transitions
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn handle_identity_change(&self, identity: Option<Identity>) {
        {
            let mut queue = self.lock_transitions();
            queue.pending.push_back(identity);
            if queue.draining {
                debug!("Identity transition queued behind one in progress");
                return;
            }
            queue.draining = true;
        }

        // Listeners run from apply_transition with no lock held.
        loop {
            let next = {
                let mut queue = self.lock_transitions();
                match queue.pending.pop_front() {
                    Some(next) => next,
                    None => {
                        queue.draining = false;
                        return;
                    }
                }
            };
            self.apply_transition(next);
        }
    }

    fn apply_transition(&self, identity: Option<Identity>) {
        let previous = self.identity.get();
        if previous == identity {
            return;
        }
        let previous_uid = previous.map(|identity| identity.uid);
        let uid = identity.as_ref().map(|identity| identity.uid.clone());
        self.identity.set(identity);

        match (&previous_uid, &uid) {
            (Some(before), Some(after)) if before == after => {
                debug!("Identity details refreshed for user {}", after);
                return;
            }
            (_, Some(uid)) => {
                info!("Session started for user {}", uid);
                // start() releases any subscription held for a previous user.
                if let Err(e) = self.engine.start() {
                    warn!("Could not start goal sync: {}", e);
                }
            }
            (Some(_), None) => {
                info!("Session ended");
                self.engine.stop();
                self.engine.reset();
            }
            (None, None) => {}
        }

        self.engine
            .event_sink()
            .emit(DomainEvent::session_changed(uid));
    }

    fn auth_failed(&self, context: &str, err: Error) -> Error {
        let message = match err {
            Error::Auth(message) => message,
            other => other.to_string(),
        };
        warn!("{}: {}", context, message);
        self.engine.report_error(format!("{}: {}", context, message));
        Error::Auth(message)
    }
}

impl Drop for SessionInner {
    fn drop(&mut self) {
        if let Some(registration) = self.lock_registration().take() {
            registration.release();
        }
    }
}
