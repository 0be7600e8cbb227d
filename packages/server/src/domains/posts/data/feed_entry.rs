//! Read-result shape for feed entries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domains::posts::models::FeedRow;

/// A feed entry as handed to the request layer.
///
/// `status` is the *effective* status: derived from the event time and the
/// stored value at read time, never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedEntryData {
    pub id: String,
    pub title: String,
    pub circle_name: String,
    pub event_at: String,
    pub status: String,
    pub category: String,
    pub tags: Vec<String>,
    pub favs_count: i64,
    pub views_count: i64,
}

impl FeedEntryData {
    pub fn from_row(row: &FeedRow, tags: Vec<String>, now: DateTime<Utc>) -> Self {
        Self {
            id: row.post.id.to_string(),
            title: row.post.title.clone(),
            circle_name: row.post.circle_name.clone(),
            event_at: row.post.event_at.to_rfc3339(),
            status: row.post.effective_status(now).to_string(),
            category: row.post.category.clone(),
            tags,
            favs_count: row.favs_count,
            views_count: row.views_count,
        }
    }
}
