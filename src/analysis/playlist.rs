use std::collections::{HashMap, HashSet};

use serde::Serialize;

use crate::analysis::classification::Classification;
use crate::analysis::statistics::{genre_statistics, GenreStatBlock, StatBlock};
use crate::analysis::{AnalysisError, Song};

/// What the artist index keeps per distinct artist name.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArtistSummary {
    pub followers: u64,
    pub popularity: u32,
    /// Resolved genres of the song the artist was first seen on.
    pub genre: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArtistStatistics {
    pub followers: StatBlock,
    pub popularity: StatBlock,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SongStatistics {
    pub duration: StatBlock,
    pub explicit: usize,
    pub popularity: StatBlock,
    pub genre: GenreStatBlock,
}

/// An ordered, immutable set of songs plus the artist index derived from them.
///
/// The index holds one entry per artist name in first-occurrence order. When
/// the same name shows up with different attributes on a later song, the
/// first values are kept.
#[derive(Debug, Clone, PartialEq)]
pub struct Playlist {
    songs: Vec<Song>,
    artists: Vec<(String, ArtistSummary)>,
}

impl Playlist {
    pub fn new(songs: Vec<Song>) -> Self {
        let artists = index_artists(&songs);
        Playlist { songs, artists }
    }

    /// Number of songs. Anything at or below one is too little to analyse,
    /// which callers should check before asking for statistics.
    pub fn len(&self) -> usize {
        self.songs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.songs.is_empty()
    }

    pub fn songs(&self) -> &[Song] {
        &self.songs
    }

    /// The deduplicated artist index, in first-occurrence order.
    pub fn artists(&self) -> impl Iterator<Item = (&str, &ArtistSummary)> {
        self.artists
            .iter()
            .map(|(name, summary)| (name.as_str(), summary))
    }

    pub fn artist(&self, name: &str) -> Option<&ArtistSummary> {
        self.artists
            .iter()
            .find(|(known, _)| known == name)
            .map(|(_, summary)| summary)
    }

    pub fn artist_count(&self) -> usize {
        self.artists.len()
    }

    /// How many song credits each artist name has across the playlist.
    pub fn artist_appearance_counts(&self) -> HashMap<String, usize> {
        let mut counts: HashMap<String, usize> = HashMap::new();
        for artist in self.songs.iter().flat_map(|song| song.artists()) {
            *counts.entry(artist.name().to_string()).or_default() += 1;
        }
        counts
    }

    /// Statistics over the artist index, one value per distinct artist.
    pub fn artist_statistics(&self) -> Result<ArtistStatistics, AnalysisError> {
        let followers: Vec<f64> = self
            .artists
            .iter()
            .map(|(_, summary)| summary.followers as f64)
            .collect();
        let popularity: Vec<f64> = self
            .artists
            .iter()
            .map(|(_, summary)| f64::from(summary.popularity))
            .collect();
        Ok(ArtistStatistics {
            followers: StatBlock::from_series(&followers)?,
            popularity: StatBlock::from_series(&popularity)?,
        })
    }

    pub fn song_statistics(&self) -> Result<SongStatistics, AnalysisError> {
        let durations: Vec<f64> = self.songs.iter().map(Song::duration).collect();
        let popularity: Vec<f64> = self
            .songs
            .iter()
            .map(|song| f64::from(song.popularity()))
            .collect();
        Ok(SongStatistics {
            duration: StatBlock::with_shape(&durations)?,
            explicit: self.songs.iter().filter(|song| song.explicit()).count(),
            popularity: StatBlock::with_shape(&popularity)?,
            genre: genre_statistics(self.songs.iter().map(Song::genre)),
        })
    }

    pub fn classification(&self) -> Result<Classification, AnalysisError> {
        Ok(Classification::from_statistics(
            &self.song_statistics()?,
            &self.artist_statistics()?,
        ))
    }

    /// Artist with the most followers; the first one wins ties.
    pub fn most_followed_artist(&self) -> Option<(&str, &ArtistSummary)> {
        self.artists().reduce(|best, candidate| {
            if candidate.1.followers > best.1.followers {
                candidate
            } else {
                best
            }
        })
    }

    /// Artist with the fewest followers; the first one wins ties.
    pub fn least_followed_artist(&self) -> Option<(&str, &ArtistSummary)> {
        self.artists().reduce(|best, candidate| {
            if candidate.1.followers < best.1.followers {
                candidate
            } else {
                best
            }
        })
    }
}

fn index_artists(songs: &[Song]) -> Vec<(String, ArtistSummary)> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut artists = Vec::new();
    for song in songs {
        for artist in song.artists() {
            if seen.insert(artist.name()) {
                artists.push((
                    artist.name().to_string(),
                    ArtistSummary {
                        followers: artist.followers(),
                        popularity: artist.popularity(),
                        genre: song.genre().to_vec(),
                    },
                ));
            }
        }
    }
    artists
}
