//! Read-result shapes for the notification feed.

use serde::{Deserialize, Serialize};

use crate::domains::notifications::models::Notification;

/// A notification entry as handed to the request layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationEntryData {
    pub id: String,
    pub kind: String,
    pub text: String,
    pub url: String,
    pub is_read: bool,
    pub created_at: String,
}

impl From<Notification> for NotificationEntryData {
    fn from(n: Notification) -> Self {
        Self {
            id: n.id.to_string(),
            kind: n.kind,
            text: n.text,
            url: n.url,
            is_read: n.is_read,
            created_at: n.created_at.to_rfc3339(),
        }
    }
}

/// The notification listing plus the live unread total.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationFeedData {
    pub notifications: Vec<NotificationEntryData>,
    pub unread: i64,
}
