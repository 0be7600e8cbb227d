pub mod fanout;
pub mod listing;

pub use fanout::{emit, fanout_recipients};
pub use listing::{list_notifications, mark_all_read};
