pub mod mood;
pub mod playlist;
