use serde::{Deserialize, Serialize};

use crate::models::artist::SimplifiedArtist;

#[derive(Debug, Deserialize, Serialize)]
pub struct Track {
    pub id: Option<String>,
    pub name: String,
    pub duration_ms: u64,
    #[serde(default)]
    pub explicit: bool,
    #[serde(default)]
    pub popularity: u32,
    /// Absent on podcast episodes.
    #[serde(default)]
    pub artists: Vec<SimplifiedArtist>,
}
