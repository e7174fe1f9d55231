pub mod notification_handler;

pub use notification_handler::{list_notifications, mark_notification_read};
