use std::path::{Path, PathBuf};
use std::time::Duration;

use color_eyre::eyre::{Context, Result, ensure, eyre};
use serde::{Deserialize, Serialize};
use url::Url;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub playlist: PlaylistConfig,
    pub mood: MoodConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaylistConfig {
    /// Deezer search endpoint
    pub api_url: String,
    /// Maximum number of tracks returned per playlist
    pub target_songs: usize,
    /// Query used when `q` is missing or blank
    pub default_query: String,
    /// How many raw results to request per target track
    pub oversample_factor: usize,
    pub timeout_secs: u64,
}

impl Default for PlaylistConfig {
    fn default() -> Self {
        Self {
            api_url: "https://api.deezer.com/search".to_string(),
            target_songs: 5,
            default_query: "lofi".to_string(),
            oversample_factor: 4,
            timeout_secs: 10,
        }
    }
}

impl PlaylistConfig {
    pub fn search_limit(&self) -> usize {
        self.target_songs * self.oversample_factor
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MoodConfig {
    /// Hosted text-classification model endpoint
    pub classifier_url: String,
    pub classifier_timeout_secs: u64,
    /// Speech-to-text `recognize` endpoint
    pub speech_url: String,
    pub language: String,
    pub max_upload_bytes: usize,
    pub transcription_timeout_secs: u64,
    /// Length of audio consumed for ambient-noise calibration
    pub ambient_noise_duration_ms: u64,
}

impl Default for MoodConfig {
    fn default() -> Self {
        Self {
            classifier_url: "https://api-inference.huggingface.co/models/j-hartmann/emotion-english-distilroberta-base".to_string(),
            classifier_timeout_secs: 30,
            speech_url: "https://speech.googleapis.com/v1/speech:recognize".to_string(),
            language: "en-US".to_string(),
            max_upload_bytes: 10 * 1024 * 1024,
            transcription_timeout_secs: 60,
            ambient_noise_duration_ms: 1000,
        }
    }
}

impl MoodConfig {
    pub fn classifier_timeout(&self) -> Duration {
        Duration::from_secs(self.classifier_timeout_secs)
    }

    pub fn transcription_timeout(&self) -> Duration {
        Duration::from_secs(self.transcription_timeout_secs)
    }

    pub fn ambient_noise_duration(&self) -> Duration {
        Duration::from_millis(self.ambient_noise_duration_ms)
    }
}

impl Config {
    /// Load config from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .wrap_err_with(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Config = toml::from_str(&contents)
            .wrap_err_with(|| format!("Failed to parse config file: {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Default config file location
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|path| path.join("moodtune").join("config.toml"))
    }

    /// Load the default config file, falling back to built-in defaults when it doesn't exist
    pub fn load() -> Result<Self> {
        match Self::config_path() {
            Some(path) if path.exists() => Self::from_file(&path),
            _ => {
                tracing::debug!("No config file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Write the default config to the default location, if it doesn't exist
    pub fn create_default() -> Result<PathBuf> {
        let path = Self::config_path().ok_or(eyre!("No config directory available"))?;
        if path.exists() {
            tracing::info!("Config already exists at {}", path.display());
            return Ok(path);
        }

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .wrap_err_with(|| format!("Failed to create {}", parent.display()))?;
        }
        let contents =
            toml::to_string_pretty(&Self::default()).wrap_err("Failed to serialize config")?;
        std::fs::write(&path, contents)
            .wrap_err_with(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(path)
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.playlist.target_songs > 0,
            "playlist.target_songs must be at least 1"
        );
        ensure!(
            self.playlist.oversample_factor > 0,
            "playlist.oversample_factor must be at least 1"
        );
        ensure!(
            self.playlist
                .target_songs
                .checked_mul(self.playlist.oversample_factor)
                .is_some(),
            "playlist.target_songs * playlist.oversample_factor is too large"
        );
        ensure!(
            self.mood.max_upload_bytes > 0,
            "mood.max_upload_bytes must be at least 1"
        );
        for (name, value) in [
            ("playlist.api_url", &self.playlist.api_url),
            ("mood.classifier_url", &self.mood.classifier_url),
            ("mood.speech_url", &self.mood.speech_url),
        ] {
            Url::parse(value).wrap_err_with(|| format!("Invalid {name}: {value}"))?;
        }
        Ok(())
    }
}
