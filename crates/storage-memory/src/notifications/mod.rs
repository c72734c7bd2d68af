//! In-process notification center.

mod notification_center;

pub use notification_center::MemoryNotificationCenter;
