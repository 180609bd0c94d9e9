pub mod artist;
pub mod classification;
pub mod genre;
pub mod playlist;
pub mod song;
pub mod statistics;

use thiserror::Error;

pub use artist::Artist;
pub use genre::GenreResolver;
pub use playlist::Playlist;
pub use song::Song;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum AnalysisError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Cannot compute statistics over an empty series.")]
    EmptySeries,
    #[error("Invalid series: {0}")]
    InvalidSeries(String),
    #[error("Genre resolution unavailable: {0}")]
    ResolutionUnavailable(String),
}
