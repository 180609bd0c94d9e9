use std::collections::HashSet;
use std::rc::Rc;

use log::debug;
use once_cell::sync::Lazy;

use crate::analysis::{AnalysisError, Artist};
use crate::tagging::{Tag, TaggingService};

/// Canonical genre names used to filter free-text tags.
///
/// Spans Western popular music as well as regional scenes; every entry is
/// lower-case so it can be compared against case-folded tags directly.
pub static KNOWN_GENRES: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "pop", "rock", "hip hop", "rap", "jazz", "classical", "electronic", "folk", "country",
        "blues", "reggae", "metal", "punk", "soul", "funk", "disco", "house", "techno", "trance",
        "dubstep", "bossa nova", "indie", "alternative", "r&b", "latin", "world", "ska", "ambient",
        "grunge", "opera", "gospel", "bluegrass", "swing", "synthpop", "new wave", "edm",
        "video game music", "trap", "lo-fi", "dance", "electro", "hardstyle", "glitch hop",
        "vaporwave", "chiptune", "progressive house", "deep house",
        "k-pop", "j-pop", "j-rock", "j-rap", "jazz fusion", "enka", "kayokyoku",
        "mandopop", "cantopop", "thai-pop", "v-pop", "thai pop", "indian pop",
        "bhangra", "qawwali", "filmi", "arab pop", "rai", "turkish pop", "greek pop",
        "afrobeat", "highlife", "jùjú music", "kizomba", "kuduro", "kwaito", "flamenco", "tango",
        "samba", "reggaeton", "merengue", "bachata", "cumbia", "vallenato", "fado", "klezmer",
        "schlager", "zouk", "soukus", "mbalax", "kaseko", "maloya", "funana", "sega", "calypso",
        "soca", "mento", "salsa", "chicha", "huayno", "forro", "brega", "axé", "frevo", "pagode",
        "tropicalia", "celtic", "traditional irish", "eurobeat",
    ]
    .into_iter()
    .collect()
});

pub fn is_known_genre(genre: &str) -> bool {
    KNOWN_GENRES.contains(genre)
}

/// Turns a track and its credited artists into a genre list using the
/// tagging service.
///
/// The policy is a short-circuiting chain: taxonomy matches first, then the
/// single top-ranked raw tag. An empty result means the tagging service had
/// nothing to offer; [`crate::analysis::Song::resolve`] then falls back to the
/// primary artist's own genres.
pub struct GenreResolver<T> {
    tagging: T,
}

impl<T: TaggingService> GenreResolver<T> {
    pub fn new(tagging: T) -> Self {
        GenreResolver { tagging }
    }

    pub fn resolve(
        &self,
        track_name: &str,
        artists: &[Rc<Artist>],
    ) -> Result<Vec<String>, AnalysisError> {
        if track_name.trim().is_empty() {
            return Err(AnalysisError::InvalidInput(
                "track name must not be empty".to_string(),
            ));
        }
        if artists.is_empty() {
            return Err(AnalysisError::InvalidInput(format!(
                "track \"{track_name}\" has no artists"
            )));
        }
        let artist_names = artists
            .iter()
            .map(|artist| artist.name())
            .collect::<Vec<_>>()
            .join(", ");

        let tags = match self.tagging.lookup_tags(track_name, &artist_names) {
            Ok(Some(tags)) => tags,
            Ok(None) => {
                debug!("No tagging record for \"{track_name}\" by {artist_names}");
                return Ok(Vec::new());
            }
            Err(err) => {
                debug!("Tag lookup failed for \"{track_name}\" by {artist_names}: {err}");
                return Err(AnalysisError::ResolutionUnavailable(err.to_string()));
            }
        };

        let mut tags = tags;
        tags.sort_by_key(|tag| tag.rank);

        let genres = known_genres(&tags)
            .or_else(|| top_tag(&tags))
            .unwrap_or_default();
        debug!("Resolved \"{track_name}\" to {genres:?}");
        Ok(genres)
    }
}

/// Tags found in [`KNOWN_GENRES`], lower-cased, in rank order.
pub fn known_genres(tags: &[Tag]) -> Option<Vec<String>> {
    let genres: Vec<String> = tags
        .iter()
        .map(|tag| tag.name.to_lowercase())
        .filter(|name| is_known_genre(name))
        .collect();
    (!genres.is_empty()).then_some(genres)
}

/// The top-ranked raw tag, lower-cased, whether or not it is a known genre.
pub fn top_tag(tags: &[Tag]) -> Option<Vec<String>> {
    tags.iter()
        .min_by_key(|tag| tag.rank)
        .map(|tag| vec![tag.name.to_lowercase()])
}
