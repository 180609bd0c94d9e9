use serde::{Deserialize, Serialize};

use crate::models::track::Track;

#[derive(Debug, Deserialize, Serialize)]
pub struct PlaylistItems {
    pub href: String,
    pub total: i32,
    pub offset: i32,
    pub next: Option<String>,
    pub previous: Option<String>,
    pub items: Vec<PlaylistItem>,
}

/// Entry of a playlist page. `track` is null for items that were removed
/// from the catalog.
#[derive(Debug, Deserialize, Serialize)]
pub struct PlaylistItem {
    pub track: Option<Track>,
}
