pub mod analyze_audio;
pub mod analyze_mood;
pub mod playlist;
