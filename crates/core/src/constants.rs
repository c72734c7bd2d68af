/// Remote collection holding every shared goal document
pub const GOALS_COLLECTION: &str = "goals";

/// Wire field names of a goal document
pub const FIELD_NAME: &str = "name";
pub const FIELD_DESCRIPTION: &str = "description";
pub const FIELD_DEADLINE: &str = "deadline";
pub const FIELD_IS_COMPLETED: &str = "isCompleted";
pub const FIELD_CREATED_BY: &str = "createdBy";

/// Inclusive upper bound (in calendar days) for a deadline to count as due soon
pub const DUE_SOON_WINDOW_DAYS: i64 = 2;

/// Calendar days between the reminder and the deadline it announces
pub const DEFAULT_REMINDER_LEAD_DAYS: u32 = 1;

/// Title used for deadline reminders
pub const DEFAULT_REMINDER_TITLE: &str = "Goal deadline approaching!";
