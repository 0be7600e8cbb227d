pub mod notification;

pub use notification::{Notification, NotificationKind, NOTIFICATION_LIST_LIMIT};
