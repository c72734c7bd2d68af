use goalsync_core::errors::{Error, Result};
use goalsync_core::SyncConfig;

/// Demo settings read from the environment (and `.env`, when present).
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub sync: SyncConfig,
    /// `text` or `json`.
    pub log_format: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup; unset keys keep defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut sync = SyncConfig::default();

        if let Some(collection) = lookup("GOALSYNC_COLLECTION") {
            sync = sync.with_collection(collection.trim());
        }
        if let Some(name) = lookup("GOALSYNC_TIMEZONE") {
            sync = sync.with_time_zone(SyncConfig::parse_time_zone(&name)?);
        }
        if let Some(days) = lookup("GOALSYNC_REMINDER_LEAD_DAYS") {
            let days: u32 = days.trim().parse().map_err(|_| {
                Error::InvalidConfigValue(format!(
                    "GOALSYNC_REMINDER_LEAD_DAYS must be a non-negative integer, got '{}'",
                    days
                ))
            })?;
            sync = sync.with_reminder_lead_days(days);
        }
        if let Some(title) = lookup("GOALSYNC_REMINDER_TITLE") {
            sync = sync.with_reminder_title(title);
        }
        sync.validate()?;

        let log_format = lookup("GOALSYNC_LOG_FORMAT").unwrap_or_else(|| "text".to_string());
        if !["text", "json"]
            .iter()
            .any(|format| log_format.eq_ignore_ascii_case(format))
        {
            return Err(Error::InvalidConfigValue(format!(
                "GOALSYNC_LOG_FORMAT must be 'text' or 'json', got '{}'",
                log_format
            )));
        }

        Ok(Self { sync, log_format })
    }
}
