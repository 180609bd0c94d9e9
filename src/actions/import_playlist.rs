use std::rc::Rc;

use log::{debug, info, warn};
use thiserror::Error;

use crate::analysis::{AnalysisError, Artist, GenreResolver, Playlist, Song};
use crate::catalog::{CatalogError, CatalogService, RawTrack};
use crate::tagging::TaggingService;

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),
    #[error(transparent)]
    Analysis(#[from] AnalysisError),
}

/// Extracts the playlist id from a share link such as
/// `https://open.spotify.com/playlist/<id>?si=...`. Bare ids pass through.
pub fn playlist_id_from_link(link: &str) -> &str {
    let link = link.trim();
    let without_query = link.split(['?', '#']).next().unwrap_or(link);
    without_query
        .trim_end_matches('/')
        .rsplit(['/', ':'])
        .next()
        .unwrap_or(without_query)
}

/// Pages through the playlist and turns every usable track into a [`Song`].
///
/// Tracks with an artist credit lacking an id are skipped, as are tracks the
/// catalog hands back with values a [`Song`] cannot hold.
pub fn import_playlist<C, T>(
    catalog: &C,
    resolver: &GenreResolver<T>,
    playlist_id: &str,
) -> Result<Playlist, ImportError>
where
    C: CatalogService,
    T: TaggingService,
{
    let mut songs = Vec::new();
    let mut page_token: Option<String> = None;
    loop {
        let page = catalog.fetch_playlist_page(playlist_id, page_token.as_deref())?;
        for track in page.tracks {
            if let Some(song) = import_track(catalog, resolver, track)? {
                songs.push(song);
            }
        }
        match page.next_page_token {
            Some(next) => page_token = Some(next),
            None => break,
        }
    }
    info!("Imported {} songs from playlist {playlist_id}", songs.len());
    Ok(Playlist::new(songs))
}

fn import_track<C, T>(
    catalog: &C,
    resolver: &GenreResolver<T>,
    track: RawTrack,
) -> Result<Option<Song>, ImportError>
where
    C: CatalogService,
    T: TaggingService,
{
    let artist_ids: Option<Vec<&str>> = track
        .artists
        .iter()
        .map(|credit| credit.id.as_deref())
        .collect();
    let artist_ids = match artist_ids {
        Some(ids) if !ids.is_empty() => ids,
        _ => {
            debug!("Skipping \"{}\": artist credit without id", track.name);
            return Ok(None);
        }
    };

    let mut artists = Vec::with_capacity(artist_ids.len());
    for artist_id in artist_ids {
        let profile = catalog.fetch_artist(artist_id)?;
        match Artist::new(
            profile.name,
            profile.followers,
            profile.popularity,
            profile.genres,
        ) {
            Ok(artist) => artists.push(Rc::new(artist)),
            Err(err) => {
                warn!("Skipping \"{}\": artist {artist_id}: {err}", track.name);
                return Ok(None);
            }
        }
    }

    let duration = track.duration_ms as f64 / 1000.0;
    match Song::resolve(
        track.name.as_str(),
        artists,
        duration,
        track.explicit,
        track.popularity,
        resolver,
    ) {
        Ok(song) => Ok(Some(song)),
        Err(AnalysisError::InvalidInput(reason)) => {
            warn!("Skipping \"{}\": {reason}", track.name);
            Ok(None)
        }
        Err(err) => Err(err.into()),
    }
}
