use log::debug;
use reqwest::blocking::Client;
use reqwest::StatusCode;
use thiserror::Error;

use crate::lastfm_endpoint;
use crate::models::tags::{LastFmTag, TrackInfoResponse};

/// A free-text tag attached to a track; rank 0 is the most relevant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    pub name: String,
    pub rank: usize,
}

impl Tag {
    pub fn new(name: impl Into<String>, rank: usize) -> Self {
        Tag {
            name: name.into(),
            rank,
        }
    }
}

#[derive(Debug, Error)]
pub enum TaggingError {
    #[error("Request error: {0}")]
    RequestError(#[from] reqwest::Error),
    #[error("Malformed tagging response: {0}")]
    Malformed(String),
    #[error("Last.fm error {code}: {message}")]
    Service { code: i32, message: String },
    #[error("Unexpected status {0}")]
    Status(StatusCode),
}

/// Last.fm error code for an unknown track.
const TRACK_NOT_FOUND: i32 = 6;

/// Source of ranked tags for a track.
///
/// `Ok(None)` means the service has no record of the track, which callers
/// treat the same as a record without tags.
pub trait TaggingService {
    fn lookup_tags(
        &self,
        track_name: &str,
        artist_names: &str,
    ) -> Result<Option<Vec<Tag>>, TaggingError>;
}

impl<T: TaggingService + ?Sized> TaggingService for &T {
    fn lookup_tags(
        &self,
        track_name: &str,
        artist_names: &str,
    ) -> Result<Option<Vec<Tag>>, TaggingError> {
        (**self).lookup_tags(track_name, artist_names)
    }
}

/// Tag lookups through Last.fm's `track.getInfo`.
pub struct LastFmTagging {
    client: Client,
    api_key: String,
}

impl LastFmTagging {
    pub fn new(api_key: impl Into<String>) -> Self {
        LastFmTagging {
            client: Client::new(),
            api_key: api_key.into(),
        }
    }
}

impl TaggingService for LastFmTagging {
    fn lookup_tags(
        &self,
        track_name: &str,
        artist_names: &str,
    ) -> Result<Option<Vec<Tag>>, TaggingError> {
        let request = self
            .client
            .get(lastfm_endpoint!("/"))
            .query(&[
                ("method", "track.getInfo"),
                ("api_key", self.api_key.as_str()),
                ("artist", artist_names),
                ("track", track_name),
                ("format", "json"),
            ])
            .build()?;
        let resp = self.client.execute(request)?;
        // Last.fm sends its coded error bodies with 4xx statuses, so the body
        // is parsed before the status is looked at.
        let status = resp.status();
        let body = resp.text()?;
        match serde_json::from_str::<TrackInfoResponse>(&body) {
            Ok(info) => tags_from_response(info),
            Err(err) if status.is_success() => Err(TaggingError::Malformed(err.to_string())),
            Err(_) => Err(TaggingError::Status(status)),
        }
    }
}

fn tags_from_response(resp: TrackInfoResponse) -> Result<Option<Vec<Tag>>, TaggingError> {
    let message = resp.message.unwrap_or_default();
    match (resp.track, resp.error) {
        (Some(track), _) => {
            let tags: Vec<LastFmTag> = track.toptags.tag.into();
            Ok(Some(
                tags.into_iter()
                    .enumerate()
                    .map(|(rank, tag)| Tag::new(tag.name, rank))
                    .collect(),
            ))
        }
        (None, Some(TRACK_NOT_FOUND)) => {
            debug!("Last.fm has no track record: {message}");
            Ok(None)
        }
        (None, Some(code)) => Err(TaggingError::Service { code, message }),
        (None, None) => Err(TaggingError::Malformed(
            "response has neither a track nor an error".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ranks_follow_response_order() {
        let resp: TrackInfoResponse = serde_json::from_str(
            r#"{"track":{"name":"Song","toptags":{"tag":[{"name":"Pop"},{"name":"80s"}]}}}"#,
        )
        .unwrap();
        let tags = tags_from_response(resp).unwrap().unwrap();
        assert_eq!(tags, vec![Tag::new("Pop", 0), Tag::new("80s", 1)]);
    }

    #[test]
    fn missing_track_is_not_found() {
        let resp: TrackInfoResponse =
            serde_json::from_str(r#"{"error":6,"message":"Track not found"}"#).unwrap();
        assert!(tags_from_response(resp).unwrap().is_none());
    }

    #[test]
    fn rate_limit_is_a_service_error() {
        let resp: TrackInfoResponse =
            serde_json::from_str(r#"{"error":29,"message":"Rate limit exceeded"}"#).unwrap();
        match tags_from_response(resp) {
            Err(TaggingError::Service { code, message }) => {
                assert_eq!(code, 29);
                assert_eq!(message, "Rate limit exceeded");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn invalid_api_key_is_a_service_error() {
        let resp: TrackInfoResponse =
            serde_json::from_str(r#"{"error":10,"message":"Invalid API key"}"#).unwrap();
        assert!(matches!(
            tags_from_response(resp),
            Err(TaggingError::Service { code: 10, .. })
        ));
    }

    #[test]
    fn empty_body_is_malformed() {
        let resp: TrackInfoResponse = serde_json::from_str("{}").unwrap();
        assert!(matches!(
            tags_from_response(resp),
            Err(TaggingError::Malformed(_))
        ));
    }
}
