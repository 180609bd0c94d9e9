use std::fmt::Display;

use crate::analysis::AnalysisError;

/// A performer as fetched from the catalog. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct Artist {
    name: String,
    followers: u64,
    popularity: u32,
    genres: Vec<String>,
}

impl Artist {
    pub fn new(
        name: impl Into<String>,
        followers: u64,
        popularity: u32,
        genres: Vec<String>,
    ) -> Result<Self, AnalysisError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(AnalysisError::InvalidInput(
                "artist name must not be empty".to_string(),
            ));
        }
        if popularity > 100 {
            return Err(AnalysisError::InvalidInput(format!(
                "popularity of {name} is {popularity}, expected 0-100"
            )));
        }
        Ok(Artist {
            name,
            followers,
            popularity,
            genres,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn followers(&self) -> u64 {
        self.followers
    }

    pub fn popularity(&self) -> u32 {
        self.popularity
    }

    pub fn genres(&self) -> &[String] {
        &self.genres
    }
}

impl Display for Artist {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Name: {}", self.name)?;
        writeln!(f, "Genre: {}", self.genres.join(", "))?;
        writeln!(f, "Artist Followers: {}", self.followers)?;
        writeln!(f, "Artist Popularity: {}", self.popularity)
    }
}
