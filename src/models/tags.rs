use serde::{Deserialize, Serialize};

/// Response of Last.fm's `track.getInfo`. Unknown tracks come back as an
/// error object without a `track` field.
#[derive(Debug, Deserialize, Serialize)]
pub struct TrackInfoResponse {
    pub track: Option<TrackInfo>,
    pub error: Option<i32>,
    pub message: Option<String>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct TrackInfo {
    pub name: String,
    #[serde(default)]
    pub toptags: TopTags,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct TopTags {
    #[serde(default)]
    pub tag: OneOrMany<LastFmTag>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct LastFmTag {
    pub name: String,
    pub url: Option<String>,
}

/// Last.fm collapses single-element lists into a bare object.
#[derive(Debug, Deserialize, Serialize)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    Many(Vec<T>),
    One(T),
}

impl<T> Default for OneOrMany<T> {
    fn default() -> Self {
        OneOrMany::Many(Vec::new())
    }
}

impl<T> From<OneOrMany<T>> for Vec<T> {
    fn from(value: OneOrMany<T>) -> Self {
        match value {
            OneOrMany::Many(items) => items,
            OneOrMany::One(item) => vec![item],
        }
    }
}
