//! Threshold rules that turn playlist statistics into qualitative labels.
//!
//! Every rule is total: undefined dispersion (`None`) simply fails the
//! "low spread" condition of the rules that have one.

use std::fmt::Display;

use serde::Serialize;

use crate::analysis::playlist::{ArtistStatistics, SongStatistics};

/// How spread out the genres of a playlist are.
///
/// - Very Low: entropy < 1.5
/// - Low: 1.5 <= entropy < 2.5
/// - Moderate: 2.5 <= entropy < 3.5
/// - High: 3.5 <= entropy < 4.5
/// - Very High: entropy >= 4.5
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DiversityLevel {
    #[serde(rename = "Very Low")]
    VeryLow,
    Low,
    Moderate,
    High,
    #[serde(rename = "Very High")]
    VeryHigh,
}

impl DiversityLevel {
    pub fn from_entropy(entropy: f64) -> Self {
        if entropy < 1.5 {
            DiversityLevel::VeryLow
        } else if entropy < 2.5 {
            DiversityLevel::Low
        } else if entropy < 3.5 {
            DiversityLevel::Moderate
        } else if entropy < 4.5 {
            DiversityLevel::High
        } else {
            DiversityLevel::VeryHigh
        }
    }
}

impl Display for DiversityLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DiversityLevel::VeryLow => write!(f, "Very Low"),
            DiversityLevel::Low => write!(f, "Low"),
            DiversityLevel::Moderate => write!(f, "Moderate"),
            DiversityLevel::High => write!(f, "High"),
            DiversityLevel::VeryHigh => write!(f, "Very High"),
        }
    }
}

/// Whether the playlist leans towards popular songs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PopularityPreference {
    #[serde(rename = "Very High")]
    VeryHigh,
    High,
    Moderate,
}

impl PopularityPreference {
    /// Very High needs mean > 70 with std < 10; High needs mean > 60.
    pub fn from_popularity(mean: f64, std: Option<f64>) -> Self {
        if mean > 70.0 && std.is_some_and(|std| std < 10.0) {
            PopularityPreference::VeryHigh
        } else if mean > 60.0 {
            PopularityPreference::High
        } else {
            PopularityPreference::Moderate
        }
    }
}

impl Display for PopularityPreference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PopularityPreference::VeryHigh => write!(f, "Very High"),
            PopularityPreference::High => write!(f, "High"),
            PopularityPreference::Moderate => write!(f, "Moderate"),
        }
    }
}

/// How well known the playlist's artists are, by follower count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ArtistPopularityLevel {
    #[serde(rename = "Very High")]
    VeryHigh,
    High,
    Moderate,
    Low,
}

impl ArtistPopularityLevel {
    pub fn from_followers(mean: f64, std: Option<f64>) -> Self {
        if mean > 1_000_000.0 && std.is_some_and(|std| std < 100_000.0) {
            ArtistPopularityLevel::VeryHigh
        } else if mean > 500_000.0 {
            ArtistPopularityLevel::High
        } else if mean > 100_000.0 {
            ArtistPopularityLevel::Moderate
        } else {
            ArtistPopularityLevel::Low
        }
    }
}

impl Display for ArtistPopularityLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ArtistPopularityLevel::VeryHigh => write!(f, "Very High"),
            ArtistPopularityLevel::High => write!(f, "High"),
            ArtistPopularityLevel::Moderate => write!(f, "Moderate"),
            ArtistPopularityLevel::Low => write!(f, "Low"),
        }
    }
}

/// Typical track length, from the mean duration in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SongLengthPreference {
    Long,
    Moderate,
    Short,
}

impl SongLengthPreference {
    pub fn from_mean_duration(mean_seconds: f64) -> Self {
        if mean_seconds > 240.0 {
            SongLengthPreference::Long
        } else if mean_seconds > 180.0 {
            SongLengthPreference::Moderate
        } else {
            SongLengthPreference::Short
        }
    }
}

impl Display for SongLengthPreference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SongLengthPreference::Long => write!(f, "Long"),
            SongLengthPreference::Moderate => write!(f, "Moderate"),
            SongLengthPreference::Short => write!(f, "Short"),
        }
    }
}

/// All four labels for one playlist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Classification {
    pub diversity: DiversityLevel,
    pub popularity_preference: PopularityPreference,
    pub artist_popularity: ArtistPopularityLevel,
    pub song_length: SongLengthPreference,
}

impl Classification {
    pub fn from_statistics(songs: &SongStatistics, artists: &ArtistStatistics) -> Self {
        Classification {
            diversity: DiversityLevel::from_entropy(songs.genre.entropy),
            popularity_preference: PopularityPreference::from_popularity(
                songs.popularity.mean,
                songs.popularity.std,
            ),
            artist_popularity: ArtistPopularityLevel::from_followers(
                artists.followers.mean,
                artists.followers.std,
            ),
            song_length: SongLengthPreference::from_mean_duration(songs.duration.mean),
        }
    }
}
