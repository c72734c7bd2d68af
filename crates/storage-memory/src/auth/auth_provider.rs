use async_trait::async_trait;
use log::{debug, info};
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, Weak};
use uuid::Uuid;

use goalsync_core::documents::ListenerRegistration;
use goalsync_core::session::{AuthProvider, Identity, IdentityListener};
use goalsync_core::Result;

use crate::errors::{IntoCore, StorageError};

const MIN_PASSWORD_LEN: usize = 6;

struct Account {
    uid: String,
    password: String,
}

#[derive(Default)]
struct AuthState {
    accounts: HashMap<String, Account>,
    current: Option<Identity>,
    fail_next: Option<String>,
}

#[derive(Default)]
struct AuthInner {
    state: Mutex<AuthState>,
    listeners: Mutex<BTreeMap<u64, IdentityListener>>,
    next_listener: AtomicU64,
}

/// Email/password accounts kept in memory, with an identity-change feed.
///
/// New listeners receive the current identity immediately. Every successful
/// sign-in, sign-up and sign-out is pushed to all listeners.
#[derive(Clone, Default)]
pub struct MemoryAuthProvider {
    inner: Arc<AuthInner>,
}

impl MemoryAuthProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes the next sign-in, sign-up or sign-out fail with `message`.
    pub fn fail_next(&self, message: impl Into<String>) {
        self.inner.lock_state().fail_next = Some(message.into());
    }

    pub fn current(&self) -> Option<Identity> {
        self.inner.lock_state().current.clone()
    }

    pub fn listener_count(&self) -> usize {
        self.inner.lock_listeners().len()
    }
}

impl AuthInner {
    fn lock_state(&self) -> MutexGuard<'_, AuthState> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn lock_listeners(&self) -> MutexGuard<'_, BTreeMap<u64, IdentityListener>> {
        self.listeners
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Runs `f` against the account state unless a fault is pending, then
    /// publishes the identity `current` derives from its output.
    fn transition<T>(
        &self,
        f: impl FnOnce(&mut AuthState) -> std::result::Result<T, StorageError>,
        current: impl FnOnce(&T) -> Option<Identity>,
    ) -> std::result::Result<T, StorageError> {
        let (output, identity) = {
            let mut state = self.lock_state();
            if let Some(message) = state.fail_next.take() {
                return Err(StorageError::AuthRejected(message));
            }
            let output = f(&mut state)?;
            let identity = current(&output);
            state.current = identity.clone();
            (output, identity)
        };
        self.publish(identity);
        Ok(output)
    }

    fn publish(&self, identity: Option<Identity>) {
        let listeners: Vec<IdentityListener> = self.lock_listeners().values().cloned().collect();
        for listener in listeners {
            listener(identity.clone());
        }
    }
}

fn identity_for(email: &str, account: &Account) -> Identity {
    Identity::new(account.uid.clone()).with_email(email)
}

pub struct MemoryAuthRegistration {
    provider: Weak<AuthInner>,
    id: u64,
}

impl ListenerRegistration for MemoryAuthRegistration {
    fn release(&self) {
        if let Some(provider) = self.provider.upgrade() {
            provider.lock_listeners().remove(&self.id);
        }
    }
}

#[async_trait]
impl AuthProvider for MemoryAuthProvider {
    fn on_identity_change(&self, listener: IdentityListener) -> Box<dyn ListenerRegistration> {
        let id = self.inner.next_listener.fetch_add(1, Ordering::SeqCst);
        self.inner.lock_listeners().insert(id, listener.clone());
        let current = self.current();
        listener(current);
        Box::new(MemoryAuthRegistration {
            provider: Arc::downgrade(&self.inner),
            id,
        })
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<Identity> {
        let email = email.trim().to_lowercase();
        let identity = self
            .inner
            .transition(
                |state| {
                    let account = state.accounts.get(&email).ok_or_else(|| {
                        StorageError::AuthRejected(
                            "There is no user record corresponding to this identifier."
                                .to_string(),
                        )
                    })?;
                    if account.password != password {
                        return Err(StorageError::AuthRejected(
                            "The password is invalid.".to_string(),
                        ));
                    }
                    Ok(identity_for(&email, account))
                },
                |identity| Some(identity.clone()),
            )
            .into_core()?;
        info!("Signed in {}", email);
        Ok(identity)
    }

    async fn sign_up(&self, email: &str, password: &str) -> Result<Identity> {
        let email = email.trim().to_lowercase();
        let identity = self
            .inner
            .transition(
                |state| {
                    if !email.contains('@') {
                        return Err(StorageError::AuthRejected(
                            "The email address is badly formatted.".to_string(),
                        ));
                    }
                    if password.chars().count() < MIN_PASSWORD_LEN {
                        return Err(StorageError::AuthRejected(format!(
                            "The password must be {} characters long or more.",
                            MIN_PASSWORD_LEN
                        )));
                    }
                    if state.accounts.contains_key(&email) {
                        return Err(StorageError::AuthRejected(
                            "The email address is already in use by another account."
                                .to_string(),
                        ));
                    }
                    let account = Account {
                        uid: Uuid::new_v4().simple().to_string(),
                        password: password.to_string(),
                    };
                    let identity = identity_for(&email, &account);
                    state.accounts.insert(email.clone(), account);
                    Ok(identity)
                },
                |identity| Some(identity.clone()),
            )
            .into_core()?;
        info!("Created account for {}", email);
        Ok(identity)
    }

    async fn sign_out(&self) -> Result<()> {
        self.inner.transition(|_| Ok(()), |_| None).into_core()?;
        debug!("Signed out");
        Ok(())
    }
}
