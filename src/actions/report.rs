use std::fmt::{Display, Formatter};

use serde::Serialize;

use crate::analysis::classification::Classification;
use crate::analysis::playlist::{ArtistStatistics, ArtistSummary, SongStatistics};
use crate::analysis::statistics::StatBlock;
use crate::analysis::{AnalysisError, Playlist};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FollowerHighlight {
    pub name: String,
    pub followers: u64,
}

/// Everything the CLI prints about a playlist, computed in one go.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlaylistReport {
    pub song_count: usize,
    pub songs: SongStatistics,
    pub artists: ArtistStatistics,
    pub classification: Classification,
    /// Song credits per artist, most credited first.
    pub artist_appearances: Vec<(String, usize)>,
    pub most_followed_artist: Option<FollowerHighlight>,
    pub least_followed_artist: Option<FollowerHighlight>,
}

impl PlaylistReport {
    pub fn from_playlist(playlist: &Playlist) -> Result<Self, AnalysisError> {
        let songs = playlist.song_statistics()?;
        let artists = playlist.artist_statistics()?;
        let classification = Classification::from_statistics(&songs, &artists);

        let mut artist_appearances: Vec<(String, usize)> =
            playlist.artist_appearance_counts().into_iter().collect();
        artist_appearances.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

        let highlight = |(name, summary): (&str, &ArtistSummary)| FollowerHighlight {
            name: name.to_string(),
            followers: summary.followers,
        };

        Ok(PlaylistReport {
            song_count: playlist.len(),
            songs,
            artists,
            classification,
            artist_appearances,
            most_followed_artist: playlist.most_followed_artist().map(highlight),
            least_followed_artist: playlist.least_followed_artist().map(highlight),
        })
    }
}

/// Two decimals, or "undefined" when there were too few values.
struct Fixed(Option<f64>);

impl Display for Fixed {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.0 {
            Some(value) => write!(f, "{value:.2}"),
            None => write!(f, "undefined"),
        }
    }
}

fn fixed(value: f64) -> Fixed {
    Fixed(Some(value))
}

fn write_stat_block(f: &mut Formatter<'_>, title: &str, block: &StatBlock) -> std::fmt::Result {
    let mode: Vec<String> = block.mode.iter().map(|value| format!("{value:.2}")).collect();
    writeln!(f, "{title}:")?;
    writeln!(f, "  Mean: {}", fixed(block.mean))?;
    writeln!(f, "  Median: {}", fixed(block.median))?;
    writeln!(f, "  Mode: {}", mode.join(", "))?;
    writeln!(f, "  Standard Deviation: {}", Fixed(block.std))?;
    writeln!(f, "  Variance: {}", Fixed(block.variance))?;
    writeln!(f, "  Max: {}", fixed(block.max))?;
    writeln!(f, "  Min: {}", fixed(block.min))?;
    writeln!(f, "  IQR: {}", fixed(block.iqr))?;
    if block.shape.is_some() {
        writeln!(f, "  Skewness: {}", Fixed(block.skewness()))?;
        writeln!(f, "  Kurtosis: {}", Fixed(block.kurtosis()))?;
    }
    Ok(())
}

impl Display for PlaylistReport {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let songs = &self.songs;
        let genre = &songs.genre;
        let most_common_genre = genre.mode.as_deref().unwrap_or("none");

        writeln!(f, "Song Statistics:")?;
        write_stat_block(f, "Duration", &songs.duration)?;
        writeln!(f)?;
        writeln!(f, "Explicit Songs: {}", songs.explicit)?;
        writeln!(f)?;
        write_stat_block(f, "Popularity", &songs.popularity)?;
        writeln!(f)?;
        writeln!(f, "Genre Statistics:")?;
        writeln!(f, "  Most Common Genre: {most_common_genre}")?;
        let frequency: Vec<String> = genre
            .frequency
            .iter()
            .map(|(name, count)| format!("{name}: {count}"))
            .collect();
        writeln!(f, "  Genre Frequency: {}", frequency.join(", "))?;
        writeln!(f, "  Genre Entropy: {}", fixed(genre.entropy))?;
        writeln!(f)?;

        writeln!(f, "Artist Statistics:")?;
        write_stat_block(f, "Followers", &self.artists.followers)?;
        writeln!(f)?;
        write_stat_block(f, "Popularity", &self.artists.popularity)?;
        writeln!(f)?;

        writeln!(f, "Artist Appearances:")?;
        for (name, count) in &self.artist_appearances {
            writeln!(f, "  {name}: {count}")?;
        }
        writeln!(f)?;

        writeln!(f, "Summary:")?;
        writeln!(f, "  Most Popular Genre: {most_common_genre}")?;
        writeln!(f, "  Genre Entropy: {}", fixed(genre.entropy))?;
        writeln!(f, "  No. of Songs: {}", self.song_count)?;
        writeln!(f, "  Avg. Duration: {}s", fixed(songs.duration.mean))?;
        writeln!(f, "  Longest Duration: {}s", fixed(songs.duration.max))?;
        writeln!(f, "  Shortest Duration: {}s", fixed(songs.duration.min))?;
        writeln!(f, "  Duration Std: {}", Fixed(songs.duration.std))?;
        writeln!(f, "  Avg. Popularity: {}", fixed(songs.popularity.mean))?;
        writeln!(f, "  Popularity Std: {}", Fixed(songs.popularity.std))?;
        writeln!(f, "  Popularity Skewness: {}", Fixed(songs.popularity.skewness()))?;
        writeln!(f, "  Popularity Kurtosis: {}", Fixed(songs.popularity.kurtosis()))?;
        writeln!(f, "  Avg. Followers: {}", fixed(self.artists.followers.mean))?;
        if let Some(most) = &self.most_followed_artist {
            writeln!(f, "  Largest Followers: {} ({})", most.followers, most.name)?;
        }
        if let Some(least) = &self.least_followed_artist {
            writeln!(f, "  Lowest Followers: {} ({})", least.followers, least.name)?;
        }
        writeln!(f, "  Followers IQR: {}", fixed(self.artists.followers.iqr))?;
        writeln!(f)?;

        let classification = &self.classification;
        writeln!(f, "Diversity Level: {}", classification.diversity)?;
        writeln!(
            f,
            "Popularity Preference: {}",
            classification.popularity_preference
        )?;
        writeln!(
            f,
            "Artist Popularity Level: {}",
            classification.artist_popularity
        )?;
        write!(f, "Song Length Preference: {}", classification.song_length)
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use super::*;
    use crate::analysis::{Artist, Song};

    fn playlist() -> Playlist {
        let x = Rc::new(Artist::new("X", 100, 50, vec![]).unwrap());
        let y = Rc::new(Artist::new("Y", 200, 70, vec![]).unwrap());
        Playlist::new(vec![
            Song::new("A", vec![x.clone()], 200.0, true, 50, vec!["rock".into()]).unwrap(),
            Song::new("B", vec![y.clone()], 220.0, false, 60, vec!["pop".into()]).unwrap(),
            Song::new("C", vec![x, y], 260.0, false, 70, vec!["rock".into()]).unwrap(),
        ])
    }

    #[test]
    fn report_collects_highlights() {
        let report = PlaylistReport::from_playlist(&playlist()).unwrap();
        assert_eq!(report.song_count, 3);
        assert_eq!(report.most_followed_artist.as_ref().unwrap().name, "Y");
        assert_eq!(report.least_followed_artist.as_ref().unwrap().followers, 100);
        assert_eq!(
            report.artist_appearances,
            [("X".to_string(), 2), ("Y".to_string(), 2)]
        );
    }

    #[test]
    fn text_uses_two_decimals_and_undefined() {
        let text = PlaylistReport::from_playlist(&playlist()).unwrap().to_string();
        assert!(text.contains("  Mean: 226.67\n"));
        assert!(text.contains("Explicit Songs: 1\n"));
        assert!(text.contains("  Most Common Genre: rock\n"));
        assert!(text.contains("  Genre Frequency: rock: 2, pop: 1\n"));
        assert!(text.contains("  Popularity Kurtosis: undefined\n"));
        assert!(text.contains("  Largest Followers: 200 (Y)\n"));
        assert!(text.ends_with("Song Length Preference: Moderate"));
    }

    #[test]
    fn json_carries_labels_and_shape() {
        let report = PlaylistReport::from_playlist(&playlist()).unwrap();
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["classification"]["diversity"], "Very Low");
        assert_eq!(json["songs"]["genre"]["frequency"]["rock"], 2);
        assert!(json["songs"]["duration"]["skewness"].is_number());
        assert!(json["songs"]["duration"]["kurtosis"].is_null());
        assert!(json["artists"]["followers"].get("skewness").is_none());
    }
}
