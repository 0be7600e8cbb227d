//! Read-result shape for the conversation listing.

use serde::{Deserialize, Serialize};

/// One row of a user's conversation list.
///
/// `unread_count` is computed live from the caller's read watermark.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationSummaryData {
    pub id: String,
    pub title: String,
    pub last_message: String,
    pub unread_count: i64,
}
