pub mod conversation;
pub mod message;
pub mod watermark;

pub use conversation::{
    conversation_title, direct_pair_key, Conversation, CONVERSATION_LIST_LIMIT,
};
pub use message::{Message, MessageWithSender, THREAD_MESSAGE_LIMIT};
pub use watermark::ReadWatermark;
