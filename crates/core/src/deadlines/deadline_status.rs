use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::constants::DUE_SOON_WINDOW_DAYS;
use crate::utils::time_utils::calendar_days_between;

/// Presentation state of a goal deadline relative to "now".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeadlineStatus {
    /// The deadline instant has passed.
    Expired,
    /// Due today or within the next two calendar days.
    DueSoon,
    /// Further away than the due-soon window.
    Upcoming,
}

/// True once `now` is strictly after the deadline instant.
pub fn is_expired(deadline: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    now > deadline
}

/// Calendar days from `now` until the deadline, in `tz`.
pub fn days_between(now: DateTime<Utc>, deadline: DateTime<Utc>, tz: Tz) -> i64 {
    calendar_days_between(now, deadline, tz)
}

/// True when the deadline has not passed and falls within
/// `[0, DUE_SOON_WINDOW_DAYS]` calendar days of `now`.
///
/// A deadline earlier today is expired, not due soon.
pub fn is_due_soon(deadline: DateTime<Utc>, now: DateTime<Utc>, tz: Tz) -> bool {
    if is_expired(deadline, now) {
        return false;
    }
    (0..=DUE_SOON_WINDOW_DAYS).contains(&days_between(now, deadline, tz))
}

pub fn deadline_status(deadline: DateTime<Utc>, now: DateTime<Utc>, tz: Tz) -> DeadlineStatus {
    if is_expired(deadline, now) {
        DeadlineStatus::Expired
    } else if is_due_soon(deadline, now, tz) {
        DeadlineStatus::DueSoon
    } else {
        DeadlineStatus::Upcoming
    }
}

/// Medium-style date text, e.g. "Apr 24, 2025".
pub fn format_deadline(deadline: DateTime<Utc>, tz: Tz) -> String {
    deadline.with_timezone(&tz).format("%b %-d, %Y").to_string()
}
