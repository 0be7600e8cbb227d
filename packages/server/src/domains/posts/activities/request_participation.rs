//! Participation requests: one per (post, user), with a direct channel to
//! the author opened as a side effect.

use chrono::Utc;
use tracing::info;

use crate::common::{CoreError, CoreResult, PostId, UserId};
use crate::domains::conversations::activities::resolve_conversation;
use crate::domains::notifications::activities as notifications;
use crate::domains::notifications::models::NotificationKind;
use crate::domains::posts::models::{Participation, Post};
use crate::kernel::ServerDeps;

const PARTICIPATION_GREETING: &str = "Hi! I'd like to join.";

/// Request to participate in a post's event.
///
/// Repeat requests return the existing row. On the first request a direct
/// channel to the author is resolved, a greeting seeded if that channel is
/// new, and the author notified. Returns the participation and whether
/// this call created it.
pub async fn request_participation(
    actor: UserId,
    post_id: PostId,
    deps: &ServerDeps,
) -> CoreResult<(Participation, bool)> {
    let post = Post::find_by_id(post_id, &deps.db_pool)
        .await?
        .ok_or(CoreError::NotFound("post"))?;

    if post.author_id == actor {
        return Err(CoreError::validation("cannot apply to your own post"));
    }
    if !post.is_effectively_open(Utc::now()) {
        return Err(CoreError::validation("post is closed"));
    }

    let (participation, created) =
        Participation::get_or_create(post_id, actor, &deps.db_pool).await?;

    if created {
        // The applicant lands in their regular DM channel with the author.
        resolve_conversation(
            actor,
            post.author_id,
            None,
            Some(PARTICIPATION_GREETING),
            deps,
        )
        .await?;

        notifications::emit(
            &[post.author_id],
            actor,
            NotificationKind::Participation,
            "New participation request on your post",
            "/?tab=messages",
            deps,
        )
        .await?;

        info!(%post_id, %actor, "participation requested");
    }

    Ok((participation, created))
}
