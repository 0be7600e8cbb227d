//! Conversation resolution - find or create a direct channel.

use tracing::info;

use crate::common::{CoreError, CoreResult, PostId, UserId};
use crate::domains::conversations::models::{Conversation, Message, ReadWatermark};
use crate::domains::posts::models::Post;
use crate::domains::users::models::User;
use crate::kernel::ServerDeps;

/// Resolve the direct channel between two users, scoped to an optional
/// context post.
///
/// Returns the channel and whether it was created by this call. When a
/// greeting is given and the channel is new, the greeting is seeded as the
/// initiator's first message (and the initiator's watermark is touched, so
/// only the other side sees it as unread).
pub async fn resolve_conversation(
    initiator: UserId,
    other: UserId,
    context_post: Option<PostId>,
    greeting: Option<&str>,
    deps: &ServerDeps,
) -> CoreResult<(Conversation, bool)> {
    if initiator == other {
        return Err(CoreError::validation(
            "cannot open a conversation with yourself",
        ));
    }

    for user_id in [initiator, other] {
        User::find_by_id(user_id, &deps.db_pool)
            .await?
            .ok_or(CoreError::NotFound("user"))?;
    }

    if let Some(post_id) = context_post {
        Post::find_by_id(post_id, &deps.db_pool)
            .await?
            .ok_or(CoreError::NotFound("post"))?;
    }

    let (conversation, created) =
        Conversation::find_or_create_direct(initiator, other, context_post, &deps.db_pool).await?;

    if created {
        info!(conversation_id = %conversation.id, %initiator, %other, "direct channel created");
        if let Some(text) = greeting {
            Message::create(conversation.id, initiator, text, &deps.db_pool).await?;
            // Sending implies the sender is caught up.
            ReadWatermark::touch(conversation.id, initiator, &deps.db_pool).await?;
        }
    }

    Conversation::touch_updated_at(conversation.id, &deps.db_pool).await?;

    Ok((conversation, created))
}
