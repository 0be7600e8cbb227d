pub mod favorite;
pub mod participation;
pub mod post;
pub mod post_view;

pub use favorite::Favorite;
pub use participation::{Participation, ParticipationStatus};
pub use post::{
    effective_status, FeedFilters, FeedRow, FeedSort, Post, PostCategory, PostStatus,
    FEED_DEFAULT_LIMIT, FEED_MAX_LIMIT,
};
pub use post_view::PostView;
