//! Post authoring activities: create, update, delete.

use chrono::{DateTime, Utc};
use tracing::info;

use crate::common::{CoreError, CoreResult, PostId, UserId};
use crate::domains::posts::data::PostDetailData;
use crate::domains::posts::models::{Post, PostCategory, PostStatus};
use crate::domains::tags::models::Tag;
use crate::domains::users::models::User;
use crate::kernel::ServerDeps;

/// Tags beyond this count are silently dropped.
pub const MAX_TAGS_PER_POST: usize = 20;

/// Author-supplied post fields.
#[derive(Debug, Clone)]
pub struct PostDraft {
    pub title: String,
    pub circle_name: String,
    pub place: String,
    pub detail: String,
    pub event_at: DateTime<Utc>,
    pub image_url: Option<String>,
    pub status: PostStatus,
    pub category: PostCategory,
    pub tags: Vec<String>,
}

/// Create a post. A blank circle name falls back to the author's own.
pub async fn create_post(
    author: UserId,
    draft: PostDraft,
    deps: &ServerDeps,
) -> CoreResult<PostDetailData> {
    let title = draft.title.trim();
    if title.is_empty() {
        return Err(CoreError::validation("title must not be empty"));
    }

    let user = User::find_by_id(author, &deps.db_pool)
        .await?
        .ok_or(CoreError::NotFound("user"))?;

    let circle_name = if draft.circle_name.trim().is_empty() {
        user.circle_name.clone()
    } else {
        draft.circle_name.trim().to_string()
    };

    let post = Post::create(
        author,
        title,
        &circle_name,
        draft.place.trim(),
        draft.detail.trim(),
        draft.event_at,
        draft.image_url.as_deref(),
        draft.status,
        draft.category,
        &deps.db_pool,
    )
    .await?;

    let tags = replace_tags(post.id, &draft.tags, deps).await?;

    info!(post_id = %post.id, %author, "post created");
    Ok(PostDetailData::from_post(&post, tags, Utc::now()))
}

/// Update a post. Only the author may edit; the tag set is replaced
/// wholesale.
pub async fn update_post(
    actor: UserId,
    post_id: PostId,
    draft: PostDraft,
    deps: &ServerDeps,
) -> CoreResult<PostDetailData> {
    let title = draft.title.trim();
    if title.is_empty() {
        return Err(CoreError::validation("title must not be empty"));
    }

    let existing = Post::find_by_id(post_id, &deps.db_pool)
        .await?
        .ok_or(CoreError::NotFound("post"))?;
    if existing.author_id != actor {
        return Err(CoreError::Forbidden("only the author can edit a post"));
    }

    let circle_name = if draft.circle_name.trim().is_empty() {
        existing.circle_name.clone()
    } else {
        draft.circle_name.trim().to_string()
    };

    let post = Post::update(
        post_id,
        title,
        &circle_name,
        draft.place.trim(),
        draft.detail.trim(),
        draft.event_at,
        draft.status,
        draft.category,
        &deps.db_pool,
    )
    .await?;

    Tag::detach_all_from_post(post_id, &deps.db_pool).await?;
    let tags = replace_tags(post_id, &draft.tags, deps).await?;

    info!(%post_id, %actor, "post updated");
    Ok(PostDetailData::from_post(&post, tags, Utc::now()))
}

/// Delete a post. Only the author may delete.
pub async fn delete_post(actor: UserId, post_id: PostId, deps: &ServerDeps) -> CoreResult<()> {
    let existing = Post::find_by_id(post_id, &deps.db_pool)
        .await?
        .ok_or(CoreError::NotFound("post"))?;
    if existing.author_id != actor {
        return Err(CoreError::Forbidden("only the author can delete a post"));
    }

    Post::delete(post_id, &deps.db_pool).await?;
    info!(%post_id, %actor, "post deleted");
    Ok(())
}

/// Normalize, dedupe and attach the given tag names, returning the final
/// alphabetical set.
async fn replace_tags(
    post_id: PostId,
    names: &[String],
    deps: &ServerDeps,
) -> CoreResult<Vec<String>> {
    let mut seen = std::collections::HashSet::new();
    for name in names.iter().take(MAX_TAGS_PER_POST) {
        let name = name.trim();
        if name.is_empty() || !seen.insert(name.to_lowercase()) {
            continue;
        }
        let tag = Tag::get_or_create(name, &deps.db_pool).await?;
        Tag::attach_to_post(tag.id, post_id, &deps.db_pool).await?;
    }
    Ok(Tag::names_for_post(post_id, &deps.db_pool).await?)
}
