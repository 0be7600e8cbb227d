//! Per-session view counting.
//!
//! A view is counted once per (session, post); the dedup state lives with
//! the session, not the store, so it resets when the session does.

use std::collections::HashSet;

use tracing::debug;

use crate::common::{CoreError, CoreResult, PostId, UserId};
use crate::domains::posts::models::{Post, PostView};
use crate::kernel::ServerDeps;

/// The set of posts a session has already been counted against.
#[derive(Debug, Default)]
pub struct SessionViews {
    seen: HashSet<PostId>,
}

impl SessionViews {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_seen(&self, post_id: PostId) -> bool {
        self.seen.contains(&post_id)
    }
}

/// Record a view of `post_id` for this session. Returns true when a view
/// row was appended, false when the session had already been counted.
pub async fn record_view(
    session: &mut SessionViews,
    viewer: Option<UserId>,
    post_id: PostId,
    deps: &ServerDeps,
) -> CoreResult<bool> {
    if session.has_seen(post_id) {
        return Ok(false);
    }

    Post::find_by_id(post_id, &deps.db_pool)
        .await?
        .ok_or(CoreError::NotFound("post"))?;

    PostView::create(post_id, viewer, &deps.db_pool).await?;
    session.seen.insert(post_id);
    debug!(%post_id, "view recorded");
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_session_has_seen_nothing() {
        let session = SessionViews::new();
        assert!(!session.has_seen(PostId::new()));
    }

    #[test]
    fn seen_posts_are_remembered() {
        let mut session = SessionViews::new();
        let post_id = PostId::new();
        session.seen.insert(post_id);
        assert!(session.has_seen(post_id));
        assert!(!session.has_seen(PostId::new()));
    }
}
