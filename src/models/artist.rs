use serde::{Deserialize, Serialize};

/// Artist credit as embedded in a track. Local files and some podcast
/// episodes carry credits without an id.
#[derive(Debug, Deserialize, Serialize)]
pub struct SimplifiedArtist {
    pub id: Option<String>,
    pub name: String,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Artist {
    pub id: String,
    pub name: String,
    pub followers: Followers,
    #[serde(default)]
    pub genres: Vec<String>,
    pub popularity: u32,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Followers {
    pub total: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_artist() {
        let body = r#"{
            "external_urls": {"spotify": "https://open.spotify.com/artist/0TnOYISbd1XYRBk9myaseg"},
            "followers": {"href": null, "total": 10567432},
            "genres": ["dance pop", "pop"],
            "id": "0TnOYISbd1XYRBk9myaseg",
            "name": "Pitbull",
            "popularity": 84,
            "type": "artist"
        }"#;
        let artist: Artist = serde_json::from_str(body).unwrap();
        assert_eq!(artist.followers.total, 10_567_432);
        assert_eq!(artist.genres, ["dance pop", "pop"]);
    }

    #[test]
    fn credit_without_id() {
        let artist: SimplifiedArtist =
            serde_json::from_str(r#"{"id": null, "name": "Unknown", "type": "artist"}"#).unwrap();
        assert!(artist.id.is_none());
    }
}
