pub mod create_post;
pub mod feed;
pub mod record_view;
pub mod request_participation;
pub mod toggle_favorite;

pub use create_post::{create_post, delete_post, update_post, PostDraft, MAX_TAGS_PER_POST};
pub use feed::feed;
pub use record_view::{record_view, SessionViews};
pub use request_participation::request_participation;
pub use toggle_favorite::toggle_favorite;
