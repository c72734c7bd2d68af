use async_trait::async_trait;

use super::reminders_model::{PermissionStatus, ReminderRequest};
use crate::errors::Result;

/// Contract for the platform's local notification facility.
///
/// Requests are keyed by id: scheduling under an id that is already pending
/// replaces it, and cancelling an unknown id is a no-op.
#[async_trait]
pub trait NotificationCenter: Send + Sync {
    /// Prompts the user for notification permission.
    async fn request_permission(&self) -> Result<PermissionStatus>;

    async fn permission_status(&self) -> PermissionStatus;

    async fn schedule_one_shot(&self, request: ReminderRequest) -> Result<()>;

    async fn cancel(&self, id: &str);
}
