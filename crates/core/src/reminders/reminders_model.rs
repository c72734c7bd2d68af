//! Reminder domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Whether the user allowed local notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PermissionStatus {
    Granted,
    Denied,
}

impl PermissionStatus {
    pub fn is_granted(self) -> bool {
        matches!(self, PermissionStatus::Granted)
    }
}

/// A one-shot local notification, keyed by goal id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReminderRequest {
    pub id: String,
    pub fire_at: DateTime<Utc>,
    pub title: String,
    pub body: String,
}

/// Result of a scheduling attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReminderOutcome {
    Scheduled { fire_at: DateTime<Utc> },
    /// Notifications are not permitted; nothing was touched.
    PermissionDenied,
    /// The goal is completed, so any pending reminder was cancelled.
    Completed,
    /// The fire time is already in the past.
    Elapsed,
}
