pub mod notification_entry;

pub use notification_entry::{NotificationEntryData, NotificationFeedData};
