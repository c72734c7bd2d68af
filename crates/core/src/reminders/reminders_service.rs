use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use log::{debug, info, warn};
use std::sync::Arc;

use super::reminders_model::{PermissionStatus, ReminderOutcome, ReminderRequest};
use super::reminders_traits::NotificationCenter;
use crate::config::SyncConfig;
use crate::deadlines::format_deadline;
use crate::errors::Result;
use crate::goals::Goal;
use crate::utils::time_utils::{subtract_calendar_days, Clock, SystemClock};

/// Schedules and cancels deadline reminders.
///
/// Holds the injected notification collaborator; there is no process-wide
/// instance. Call [`ReminderScheduler::initialize`] once after construction.
pub struct ReminderScheduler {
    center: Arc<dyn NotificationCenter>,
    clock: Arc<dyn Clock>,
    time_zone: Tz,
    lead_days: u32,
    title: String,
}

impl ReminderScheduler {
    pub fn new(center: Arc<dyn NotificationCenter>, config: &SyncConfig) -> Self {
        Self {
            center,
            clock: Arc::new(SystemClock),
            time_zone: config.time_zone,
            lead_days: config.reminder_lead_days,
            title: config.reminder_title.clone(),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Requests notification permission and reports the result.
    ///
    /// A failed request is treated as denied.
    pub async fn initialize(&self) -> PermissionStatus {
        match self.center.request_permission().await {
            Ok(status) => {
                info!("Notification permission: {:?}", status);
                status
            }
            Err(e) => {
                warn!("Notification permission request failed: {}", e);
                PermissionStatus::Denied
            }
        }
    }

    /// Instant at which the reminder for `deadline` fires.
    ///
    /// `lead_days` calendar days before the deadline, or the deadline itself
    /// when that local time does not exist. Never later than the deadline.
    pub fn fire_time(&self, deadline: DateTime<Utc>) -> DateTime<Utc> {
        subtract_calendar_days(deadline, self.lead_days, self.time_zone)
            .map(|fire_at| fire_at.min(deadline))
            .unwrap_or(deadline)
    }

    /// Schedules (or replaces) the reminder for `goal`.
    ///
    /// Without notification permission this is a silent no-op. Otherwise any
    /// pending reminder for the goal id is cancelled first, so at most one
    /// stays pending per goal.
    pub async fn schedule(&self, goal: &Goal) -> Result<ReminderOutcome> {
        if !self.center.permission_status().await.is_granted() {
            debug!("Skipping reminder for goal {}: permission not granted", goal.id);
            return Ok(ReminderOutcome::PermissionDenied);
        }

        self.center.cancel(&goal.id).await;

        if goal.is_completed {
            debug!("Goal {} is completed, no reminder kept", goal.id);
            return Ok(ReminderOutcome::Completed);
        }

        let fire_at = self.fire_time(goal.deadline);
        if fire_at <= self.clock.now() {
            debug!("Reminder time for goal {} already passed ({})", goal.id, fire_at);
            return Ok(ReminderOutcome::Elapsed);
        }

        let request = ReminderRequest {
            id: goal.id.clone(),
            fire_at,
            title: self.title.clone(),
            body: format!(
                "Goal '{}' is due on {}",
                goal.name,
                format_deadline(goal.deadline, self.time_zone)
            ),
        };
        self.center.schedule_one_shot(request).await?;
        debug!("Scheduled reminder for goal {} at {}", goal.id, fire_at);
        Ok(ReminderOutcome::Scheduled { fire_at })
    }

    /// Removes the pending reminder for `goal_id`, if any.
    pub async fn cancel(&self, goal_id: &str) {
        self.center.cancel(goal_id).await;
    }
}
