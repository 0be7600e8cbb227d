//! Read-result shape for a favorite toggle.

use serde::{Deserialize, Serialize};

/// Outcome of toggling a favorite: the side the toggle landed on, plus
/// the post's live count.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FavoriteStateData {
    pub favorited: bool,
    pub favs_count: i64,
}
