pub mod actions;
pub mod analysis;
pub mod authorize;
pub mod catalog;
pub mod config;
pub mod endpoints;
pub mod models;
pub mod tagging;

pub use actions::import_playlist::{import_playlist, playlist_id_from_link, ImportError};
pub use actions::report::PlaylistReport;
pub use analysis::{AnalysisError, Artist, GenreResolver, Playlist, Song};
pub use catalog::{CatalogService, SpotifyCatalog};
pub use tagging::{LastFmTagging, TaggingService};
