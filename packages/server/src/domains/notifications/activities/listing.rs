//! Notification listing and read-state activities.

use tracing::debug;

use crate::common::{CoreResult, UserId};
use crate::domains::notifications::data::{NotificationEntryData, NotificationFeedData};
use crate::domains::notifications::models::{Notification, NOTIFICATION_LIST_LIMIT};
use crate::kernel::ServerDeps;

/// Recent notifications for a user plus the live unread total.
pub async fn list_notifications(user_id: UserId, deps: &ServerDeps) -> CoreResult<NotificationFeedData> {
    let notifications =
        Notification::find_recent(user_id, NOTIFICATION_LIST_LIMIT, &deps.db_pool).await?;
    let unread = Notification::unread_count(user_id, &deps.db_pool).await?;

    Ok(NotificationFeedData {
        notifications: notifications
            .into_iter()
            .map(NotificationEntryData::from)
            .collect(),
        unread,
    })
}

/// Flip every unread notification for the user.
pub async fn mark_all_read(user_id: UserId, deps: &ServerDeps) -> CoreResult<u64> {
    let flipped = Notification::mark_all_read(user_id, &deps.db_pool).await?;
    debug!(%user_id, flipped, "marked notifications read");
    Ok(flipped)
}
