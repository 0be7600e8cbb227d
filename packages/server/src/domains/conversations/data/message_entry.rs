//! Read-result shapes for an opened thread.

use serde::{Deserialize, Serialize};

use crate::common::UserId;
use crate::domains::conversations::models::MessageWithSender;

/// A message entry as handed to the request layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageEntryData {
    pub id: String,
    pub body: String,
    pub created_at: String,
    pub sender_name: String,
    pub is_me: bool,
}

impl MessageEntryData {
    pub fn from_message(m: &MessageWithSender, me: UserId) -> Self {
        Self {
            id: m.message.id.to_string(),
            body: m.message.body.clone(),
            created_at: m.message.created_at.to_rfc3339(),
            sender_name: m.sender_name.clone(),
            is_me: m.message.sender_id == me,
        }
    }
}

/// An opened thread: channel header plus its messages, oldest first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThreadData {
    pub id: String,
    pub title: String,
    pub messages: Vec<MessageEntryData>,
}
