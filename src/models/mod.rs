pub mod artist;
pub mod playlist;
pub mod tags;
pub mod track;
