pub mod conversation_summary;
pub mod message_entry;

pub use conversation_summary::ConversationSummaryData;
pub use message_entry::{MessageEntryData, ThreadData};
