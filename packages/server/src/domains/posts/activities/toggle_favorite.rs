//! Favorite toggling with author notification.

use tracing::debug;

use crate::common::{CoreError, CoreResult, PostId, UserId};
use crate::domains::notifications::activities as notifications;
use crate::domains::notifications::models::NotificationKind;
use crate::domains::posts::data::FavoriteStateData;
use crate::domains::posts::models::{Favorite, Post};
use crate::kernel::ServerDeps;

/// Toggle the (actor, post) favorite edge.
///
/// A create that loses a race against an identical create degrades to the
/// already-favorited side, so double submits never produce two rows or two
/// notifications. The author is notified only when the edge is newly
/// created, and never about their own favorite.
pub async fn toggle_favorite(
    actor: UserId,
    post_id: PostId,
    deps: &ServerDeps,
) -> CoreResult<FavoriteStateData> {
    let post = Post::find_by_id(post_id, &deps.db_pool)
        .await?
        .ok_or(CoreError::NotFound("post"))?;

    let created = Favorite::insert_if_absent(actor, post_id, &deps.db_pool).await?;
    let favorited = if created {
        notifications::emit(
            &[post.author_id],
            actor,
            NotificationKind::Favorite,
            "Your post was added to favorites",
            "/?tab=mine",
            deps,
        )
        .await?;
        true
    } else {
        // Edge already existed: this call is the "off" side of the toggle.
        Favorite::remove(actor, post_id, &deps.db_pool).await?;
        false
    };

    let favs_count = Favorite::count_for_post(post_id, &deps.db_pool).await?;
    debug!(%post_id, %actor, favorited, "favorite toggled");
    Ok(FavoriteStateData {
        favorited,
        favs_count,
    })
}
