//! Runtime configuration for the sync core.

use chrono_tz::Tz;
use std::str::FromStr;

use crate::constants::{DEFAULT_REMINDER_LEAD_DAYS, DEFAULT_REMINDER_TITLE, GOALS_COLLECTION};
use crate::errors::{Error, Result};
use crate::utils::time_utils::DEFAULT_TIME_ZONE;

/// Settings shared by the sync engine and the reminder scheduler.
#[derive(Debug, Clone, PartialEq)]
pub struct SyncConfig {
    /// Remote collection holding goal documents.
    pub collection: String,
    /// Timezone used for calendar-day arithmetic.
    pub time_zone: Tz,
    /// Calendar days between a reminder and its deadline.
    pub reminder_lead_days: u32,
    pub reminder_title: String,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            collection: GOALS_COLLECTION.to_string(),
            time_zone: DEFAULT_TIME_ZONE,
            reminder_lead_days: DEFAULT_REMINDER_LEAD_DAYS,
            reminder_title: DEFAULT_REMINDER_TITLE.to_string(),
        }
    }
}

impl SyncConfig {
    pub fn with_collection(mut self, collection: impl Into<String>) -> Self {
        self.collection = collection.into();
        self
    }

    pub fn with_time_zone(mut self, time_zone: Tz) -> Self {
        self.time_zone = time_zone;
        self
    }

    pub fn with_reminder_lead_days(mut self, days: u32) -> Self {
        self.reminder_lead_days = days;
        self
    }

    pub fn with_reminder_title(mut self, title: impl Into<String>) -> Self {
        self.reminder_title = title.into();
        self
    }

    /// Parses an IANA timezone name such as `Asia/Ho_Chi_Minh`.
    pub fn parse_time_zone(name: &str) -> Result<Tz> {
        Tz::from_str(name.trim())
            .map_err(|_| Error::InvalidConfigValue(format!("unknown time zone '{}'", name)))
    }

    /// Rejects settings the core cannot operate with.
    pub fn validate(&self) -> Result<()> {
        if self.collection.trim().is_empty() {
            return Err(Error::InvalidConfigValue(
                "collection name cannot be empty".to_string(),
            ));
        }
        if self.reminder_title.trim().is_empty() {
            return Err(Error::InvalidConfigValue(
                "reminder title cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}
