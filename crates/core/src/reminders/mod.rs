//! Reminders module - deadline reminders through the notification collaborator.

mod reminders_model;
mod reminders_service;
mod reminders_traits;

pub use reminders_model::{PermissionStatus, ReminderOutcome, ReminderRequest};
pub use reminders_service::ReminderScheduler;
pub use reminders_traits::NotificationCenter;
