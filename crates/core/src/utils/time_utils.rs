use chrono::{DateTime, Days, NaiveDate, Utc};
use chrono_tz::Tz;

/// Default timezone used to turn instants into calendar dates.
pub const DEFAULT_TIME_ZONE: Tz = chrono_tz::UTC;

/// Source of the current instant.
///
/// Injected wherever "now" matters so tests can pin the wall clock.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock backed by the system time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Converts a UTC instant to its calendar date in the given timezone.
///
/// This is the single source of truth for instant-to-date conversion.
pub fn local_date(instant: DateTime<Utc>, tz: Tz) -> NaiveDate {
    instant.with_timezone(&tz).date_naive()
}

/// Number of midnights crossed between `from` and `to`, in `tz`.
///
/// Negative when `to` falls on an earlier calendar date than `from`.
pub fn calendar_days_between(from: DateTime<Utc>, to: DateTime<Utc>, tz: Tz) -> i64 {
    (local_date(to, tz) - local_date(from, tz)).num_days()
}

/// Moves an instant back by whole calendar days, keeping its local wall time.
///
/// Returns `None` when the result is out of range, or when that wall time
/// does not exist (or is ambiguous) on the target date.
pub fn subtract_calendar_days(instant: DateTime<Utc>, days: u32, tz: Tz) -> Option<DateTime<Utc>> {
    instant
        .with_timezone(&tz)
        .checked_sub_days(Days::new(u64::from(days)))
        .map(|local| local.with_timezone(&Utc))
}
