pub mod import_playlist;
pub mod report;
