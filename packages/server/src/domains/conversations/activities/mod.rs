pub mod resolve;
pub mod threads;

pub use resolve::resolve_conversation;
pub use threads::{list_conversations, open_thread, send_message};
