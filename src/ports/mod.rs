pub mod classifier;
pub mod search;
pub mod transcriber;
