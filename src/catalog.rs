use std::cell::RefCell;

use log::{debug, trace};
use reqwest::blocking::{Client, Response};
use thiserror::Error;

use crate::api_endpoint;
use crate::authorize::{try_get_access_token, Access, AuthorizeError, ClientCredentials};
use crate::models::artist::{Artist, SimplifiedArtist};
use crate::models::playlist::PlaylistItems;
use crate::models::track::Track;

const PAGE_LIMIT: usize = 100;

/// Artist credit on a catalog track. `id` is absent for local files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawArtistRef {
    pub id: Option<String>,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawTrack {
    pub name: String,
    pub duration_ms: u64,
    pub explicit: bool,
    pub popularity: u32,
    pub artists: Vec<RawArtistRef>,
}

/// One page of playlist entries. Entries whose track was removed from the
/// catalog are already dropped.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PlaylistPage {
    pub tracks: Vec<RawTrack>,
    pub next_page_token: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawArtist {
    pub name: String,
    pub followers: u64,
    pub popularity: u32,
    pub genres: Vec<String>,
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Request error: {0}")]
    RequestError(reqwest::Error),
    #[error("Authorization failed: {0}")]
    Authorize(#[from] AuthorizeError),
    #[error("Malformed catalog data: {0}")]
    Malformed(String),
}

impl From<reqwest::Error> for CatalogError {
    fn from(err: reqwest::Error) -> Self {
        CatalogError::RequestError(err)
    }
}

/// Read access to playlists and artist profiles.
pub trait CatalogService {
    /// Fetches the page `page_token` points at, or the first page when it is
    /// `None`.
    fn fetch_playlist_page(
        &self,
        playlist_id: &str,
        page_token: Option<&str>,
    ) -> Result<PlaylistPage, CatalogError>;

    fn fetch_artist(&self, artist_id: &str) -> Result<RawArtist, CatalogError>;
}

impl<C: CatalogService + ?Sized> CatalogService for &C {
    fn fetch_playlist_page(
        &self,
        playlist_id: &str,
        page_token: Option<&str>,
    ) -> Result<PlaylistPage, CatalogError> {
        (**self).fetch_playlist_page(playlist_id, page_token)
    }

    fn fetch_artist(&self, artist_id: &str) -> Result<RawArtist, CatalogError> {
        (**self).fetch_artist(artist_id)
    }
}

/// Spotify Web API catalog using an app-only token.
pub struct SpotifyCatalog {
    client: Client,
    credentials: ClientCredentials,
    access: RefCell<Option<Access>>,
}

impl SpotifyCatalog {
    pub fn new(credentials: ClientCredentials) -> Self {
        SpotifyCatalog {
            client: Client::new(),
            credentials,
            access: RefCell::new(None),
        }
    }

    fn authorized_get(&self, url: &str) -> Result<Response, CatalogError> {
        let old_access = self.access.borrow_mut().take();
        let access = try_get_access_token(&self.client, &self.credentials, old_access)?;
        let request = access.authorize(self.client.get(url)).build()?;
        *self.access.borrow_mut() = Some(access);
        trace!("GET {url}");
        let resp = self.client.execute(request)?.error_for_status()?;
        Ok(resp)
    }
}

impl CatalogService for SpotifyCatalog {
    fn fetch_playlist_page(
        &self,
        playlist_id: &str,
        page_token: Option<&str>,
    ) -> Result<PlaylistPage, CatalogError> {
        let url = page_url(playlist_id, page_token)?;
        let resp = self.authorized_get(&url)?;
        let resp = resp.json::<PlaylistItems>()?;
        debug!(
            "Fetched {} of {} playlist entries at offset {}",
            resp.items.len(),
            resp.total,
            resp.offset
        );
        Ok(resp.into())
    }

    fn fetch_artist(&self, artist_id: &str) -> Result<RawArtist, CatalogError> {
        let resp = self.authorized_get(&api_endpoint!("/artists/{artist_id}"))?;
        let resp = resp.json::<Artist>()?;
        Ok(resp.into())
    }
}

fn page_url(playlist_id: &str, page_token: Option<&str>) -> Result<String, CatalogError> {
    match page_token {
        None => Ok(api_endpoint!(
            "/playlists/{playlist_id}/tracks?limit={PAGE_LIMIT}"
        )),
        Some(next) if next.starts_with(&api_endpoint!("/")) => Ok(next.to_string()),
        Some(next) => Err(CatalogError::Malformed(format!(
            "next page link \"{next}\" is outside the Web API"
        ))),
    }
}

impl From<PlaylistItems> for PlaylistPage {
    fn from(items: PlaylistItems) -> Self {
        let tracks = items
            .items
            .into_iter()
            .filter_map(|item| {
                if item.track.is_none() {
                    debug!("Skipping playlist entry without a track");
                }
                item.track
            })
            .map(RawTrack::from)
            .collect();
        PlaylistPage {
            tracks,
            next_page_token: items.next,
        }
    }
}

impl From<Track> for RawTrack {
    fn from(track: Track) -> Self {
        RawTrack {
            name: track.name,
            duration_ms: track.duration_ms,
            explicit: track.explicit,
            popularity: track.popularity,
            artists: track.artists.into_iter().map(RawArtistRef::from).collect(),
        }
    }
}

impl From<SimplifiedArtist> for RawArtistRef {
    fn from(artist: SimplifiedArtist) -> Self {
        RawArtistRef {
            id: artist.id,
            name: artist.name,
        }
    }
}

impl From<Artist> for RawArtist {
    fn from(artist: Artist) -> Self {
        RawArtist {
            name: artist.name,
            followers: artist.followers.total,
            popularity: artist.popularity,
            genres: artist.genres,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_page_url() {
        assert_eq!(
            page_url("37i9dQZF1DXcBWIGoYBM5M", None).unwrap(),
            "https://api.spotify.com/v1/playlists/37i9dQZF1DXcBWIGoYBM5M/tracks?limit=100"
        );
    }

    #[test]
    fn next_link_is_followed_verbatim() {
        let next = "https://api.spotify.com/v1/playlists/abc/tracks?offset=100&limit=100";
        assert_eq!(page_url("abc", Some(next)).unwrap(), next);
    }

    #[test]
    fn foreign_next_link_is_rejected() {
        assert!(matches!(
            page_url("abc", Some("https://example.com/steal-token")),
            Err(CatalogError::Malformed(_))
        ));
    }

    #[test]
    fn page_drops_removed_tracks() {
        let items: PlaylistItems = serde_json::from_str(
            r#"{
                "href": "https://api.spotify.com/v1/playlists/abc/tracks",
                "total": 2, "offset": 0, "next": null, "previous": null,
                "items": [
                    {"track": {"id": "t1", "name": "Song", "duration_ms": 180000,
                        "explicit": false, "popularity": 40,
                        "artists": [{"id": null, "name": "Local"}]}},
                    {"track": null}
                ]
            }"#,
        )
        .unwrap();
        let page = PlaylistPage::from(items);
        assert_eq!(page.tracks.len(), 1);
        assert_eq!(page.next_page_token, None);
        assert_eq!(
            page.tracks[0].artists,
            [RawArtistRef {
                id: None,
                name: "Local".into()
            }]
        );
    }

    #[test]
    fn artist_profile_flattens_followers() {
        let artist: Artist = serde_json::from_str(
            r#"{"id": "a1", "name": "Band", "followers": {"href": null, "total": 42},
                "genres": ["indie rock"], "popularity": 55}"#,
        )
        .unwrap();
        let raw = RawArtist::from(artist);
        assert_eq!(raw.followers, 42);
        assert_eq!(raw.genres, ["indie rock"]);
    }
}
