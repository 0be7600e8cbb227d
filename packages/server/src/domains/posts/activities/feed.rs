//! Feed assembly: one filtered/sorted page, tags batch-loaded in a second
//! query.

use std::collections::HashMap;

use chrono::Utc;
use tracing::debug;

use crate::common::{CoreResult, PostId};
use crate::domains::posts::data::FeedEntryData;
use crate::domains::posts::models::{FeedFilters, FeedSort, Post, FEED_DEFAULT_LIMIT};
use crate::domains::tags::models::Tag;
use crate::kernel::ServerDeps;

/// One page of the feed, with effective statuses computed at read time.
pub async fn feed(
    filters: &FeedFilters,
    sort: FeedSort,
    limit: Option<i64>,
    deps: &ServerDeps,
) -> CoreResult<Vec<FeedEntryData>> {
    let limit = limit.unwrap_or(FEED_DEFAULT_LIMIT);
    let rows = Post::feed(filters, sort, limit, &deps.db_pool).await?;

    let post_ids: Vec<PostId> = rows.iter().map(|r| r.post.id).collect();
    let mut tags_by_post: HashMap<PostId, Vec<String>> = HashMap::new();
    for t in Tag::find_for_post_ids(&post_ids, &deps.db_pool).await? {
        tags_by_post.entry(t.post_id).or_default().push(t.tag.name);
    }

    let now = Utc::now();
    let entries = rows
        .iter()
        .map(|row| {
            let tags = tags_by_post.remove(&row.post.id).unwrap_or_default();
            FeedEntryData::from_row(row, tags, now)
        })
        .collect::<Vec<_>>();

    debug!(count = entries.len(), ?sort, "feed page assembled");
    Ok(entries)
}
