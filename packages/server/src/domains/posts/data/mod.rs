pub mod favorite_state;
pub mod feed_entry;
pub mod post_detail;

pub use favorite_state::FavoriteStateData;
pub use feed_entry::FeedEntryData;
pub use post_detail::PostDetailData;
