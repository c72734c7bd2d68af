use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::debug;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

use goalsync_core::reminders::{NotificationCenter, PermissionStatus, ReminderRequest};
use goalsync_core::Result;

use crate::errors::StorageError;

struct CenterState {
    /// `None` until permission has been requested.
    permission: Option<PermissionStatus>,
    /// Answer given when permission is requested.
    response: PermissionStatus,
    pending: BTreeMap<String, ReminderRequest>,
    fail_next_schedule: Option<String>,
}

/// Local notification center that keeps pending one-shot reminders in
/// memory.
///
/// Scheduling with an id that is already pending replaces it.
#[derive(Clone)]
pub struct MemoryNotificationCenter {
    state: Arc<Mutex<CenterState>>,
}

impl Default for MemoryNotificationCenter {
    fn default() -> Self {
        Self::new(PermissionStatus::Granted)
    }
}

impl MemoryNotificationCenter {
    /// `response` is what the user answers when permission is requested.
    pub fn new(response: PermissionStatus) -> Self {
        Self {
            state: Arc::new(Mutex::new(CenterState {
                permission: None,
                response,
                pending: BTreeMap::new(),
                fail_next_schedule: None,
            })),
        }
    }

    /// Pending reminders ordered by id.
    pub fn pending(&self) -> Vec<ReminderRequest> {
        self.lock().pending.values().cloned().collect()
    }

    pub fn pending_for(&self, id: &str) -> Option<ReminderRequest> {
        self.lock().pending.get(id).cloned()
    }

    pub fn fail_next_schedule(&self, message: impl Into<String>) {
        self.lock().fail_next_schedule = Some(message.into());
    }

    /// Removes and returns every reminder due at `now`, earliest first.
    pub fn deliver_due(&self, now: DateTime<Utc>) -> Vec<ReminderRequest> {
        let mut state = self.lock();
        let due_ids: Vec<String> = state
            .pending
            .values()
            .filter(|request| request.fire_at <= now)
            .map(|request| request.id.clone())
            .collect();
        let mut due: Vec<ReminderRequest> = due_ids
            .iter()
            .filter_map(|id| state.pending.remove(id))
            .collect();
        due.sort_by_key(|request| request.fire_at);
        due
    }

    fn lock(&self) -> MutexGuard<'_, CenterState> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl NotificationCenter for MemoryNotificationCenter {
    async fn request_permission(&self) -> Result<PermissionStatus> {
        let mut state = self.lock();
        let response = state.response;
        let status = *state.permission.get_or_insert(response);
        debug!("Notification permission answered: {:?}", status);
        Ok(status)
    }

    async fn permission_status(&self) -> PermissionStatus {
        self.lock().permission.unwrap_or(PermissionStatus::Denied)
    }

    async fn schedule_one_shot(&self, request: ReminderRequest) -> Result<()> {
        let mut state = self.lock();
        if let Some(message) = state.fail_next_schedule.take() {
            return Err(StorageError::NotificationRejected(message).into());
        }
        debug!("Pending reminder {} at {}", request.id, request.fire_at);
        state.pending.insert(request.id.clone(), request);
        Ok(())
    }

    async fn cancel(&self, id: &str) {
        if self.lock().pending.remove(id).is_some() {
            debug!("Cancelled reminder {}", id);
        }
    }
}
