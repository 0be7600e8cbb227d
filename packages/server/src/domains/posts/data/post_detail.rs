//! Read-result shape for a single post.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domains::posts::models::Post;

/// A full post as handed to the request layer. `status` is effective,
/// not stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostDetailData {
    pub id: String,
    pub author_id: String,
    pub title: String,
    pub circle_name: String,
    pub place: String,
    pub detail: String,
    pub event_at: String,
    pub image_url: Option<String>,
    pub status: String,
    pub category: String,
    pub tags: Vec<String>,
}

impl PostDetailData {
    pub fn from_post(post: &Post, tags: Vec<String>, now: DateTime<Utc>) -> Self {
        Self {
            id: post.id.to_string(),
            author_id: post.author_id.to_string(),
            title: post.title.clone(),
            circle_name: post.circle_name.clone(),
            place: post.place.clone(),
            detail: post.detail.clone(),
            event_at: post.event_at.to_rfc3339(),
            image_url: post.image_url.clone(),
            status: post.effective_status(now).to_string(),
            category: post.category.clone(),
            tags,
        }
    }
}
