use std::fmt::Display;
use std::rc::Rc;

use log::{debug, warn};

use crate::analysis::{AnalysisError, Artist, GenreResolver};
use crate::tagging::TaggingService;

/// A playlist track with its resolved genre list. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct Song {
    name: String,
    artists: Vec<Rc<Artist>>,
    duration: f64,
    explicit: bool,
    popularity: u32,
    genre: Vec<String>,
}

impl Song {
    /// Builds a song whose genre list is already known.
    pub fn new(
        name: impl Into<String>,
        artists: Vec<Rc<Artist>>,
        duration: f64,
        explicit: bool,
        popularity: u32,
        genre: Vec<String>,
    ) -> Result<Self, AnalysisError> {
        let name = name.into();
        validate(&name, &artists, duration, popularity)?;
        Ok(Song {
            name,
            artists,
            duration,
            explicit,
            popularity,
            genre,
        })
    }

    /// Builds a song and resolves its genres.
    ///
    /// Falls back to the primary artist's genres when the tagging service has
    /// nothing for the track or cannot be reached, then to the genres of the
    /// first other credited artist that has any.
    pub fn resolve<T: TaggingService>(
        name: impl Into<String>,
        artists: Vec<Rc<Artist>>,
        duration: f64,
        explicit: bool,
        popularity: u32,
        resolver: &GenreResolver<T>,
    ) -> Result<Self, AnalysisError> {
        let name = name.into();
        validate(&name, &artists, duration, popularity)?;

        let tagged = match resolver.resolve(&name, &artists) {
            Ok(genres) => genres,
            Err(AnalysisError::ResolutionUnavailable(reason)) => {
                warn!("Using artist genres for \"{name}\": {reason}");
                Vec::new()
            }
            Err(err) => return Err(err),
        };
        let genre = Some(tagged)
            .filter(|genres| !genres.is_empty())
            .or_else(|| primary_artist_genres(&artists))
            .or_else(|| credited_artist_genres(&artists))
            .unwrap_or_default();
        if genre.is_empty() {
            debug!("No genre could be resolved for \"{name}\"");
        }

        Ok(Song {
            name,
            artists,
            duration,
            explicit,
            popularity,
            genre,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn artists(&self) -> &[Rc<Artist>] {
        &self.artists
    }

    /// Duration in seconds.
    pub fn duration(&self) -> f64 {
        self.duration
    }

    pub fn explicit(&self) -> bool {
        self.explicit
    }

    pub fn popularity(&self) -> u32 {
        self.popularity
    }

    pub fn genre(&self) -> &[String] {
        &self.genre
    }
}

fn validate(
    name: &str,
    artists: &[Rc<Artist>],
    duration: f64,
    popularity: u32,
) -> Result<(), AnalysisError> {
    if name.trim().is_empty() {
        return Err(AnalysisError::InvalidInput(
            "song name must not be empty".to_string(),
        ));
    }
    if artists.is_empty() {
        return Err(AnalysisError::InvalidInput(format!(
            "song \"{name}\" has no artists"
        )));
    }
    if !duration.is_finite() || duration < 0.0 {
        return Err(AnalysisError::InvalidInput(format!(
            "song \"{name}\" has invalid duration {duration}"
        )));
    }
    if popularity > 100 {
        return Err(AnalysisError::InvalidInput(format!(
            "song \"{name}\" has popularity {popularity}, expected 0-100"
        )));
    }
    Ok(())
}

fn primary_artist_genres(artists: &[Rc<Artist>]) -> Option<Vec<String>> {
    artists
        .first()
        .map(|artist| artist.genres())
        .filter(|genres| !genres.is_empty())
        .map(<[String]>::to_vec)
}

/// Genres of the first credited artist that has any.
fn credited_artist_genres(artists: &[Rc<Artist>]) -> Option<Vec<String>> {
    artists
        .iter()
        .map(|artist| artist.genres())
        .find(|genres| !genres.is_empty())
        .map(<[String]>::to_vec)
}

impl Display for Song {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let join = |values: Vec<String>| values.join(", ");
        writeln!(f, "Song: {}", self.name)?;
        writeln!(
            f,
            "Artists: {}",
            join(self.artists.iter().map(|a| a.name().to_string()).collect())
        )?;
        writeln!(f, "Duration: {} seconds", self.duration)?;
        writeln!(f, "Explicit: {}", if self.explicit { "Yes" } else { "No" })?;
        writeln!(f, "Popularity: {}", self.popularity)?;
        writeln!(f, "Genres: {}", self.genre.join(", "))?;
        writeln!(
            f,
            "Artist Followers: {}",
            join(self.artists.iter().map(|a| a.followers().to_string()).collect())
        )?;
        writeln!(
            f,
            "Artist Popularity: {}",
            join(self.artists.iter().map(|a| a.popularity().to_string()).collect())
        )
    }
}
