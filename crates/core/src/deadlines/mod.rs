//! Deadline presentation logic - pure functions of (deadline, now).

mod deadline_status;

pub use deadline_status::{
    days_between, deadline_status, format_deadline, is_due_soon, is_expired, DeadlineStatus,
};
