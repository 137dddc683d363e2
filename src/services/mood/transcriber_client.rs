use std::path::Path;
use std::time::Duration;

use color_eyre::eyre::{Result, WrapErr};
use reqwest::Client;
use url::Url;

use crate::config::MoodConfig;
use crate::ports::transcriber::{Transcriber, TranscriptionError};
use crate::speech::calibration::calibrate_ambient_noise;
use crate::speech::decode::decode_mono;
use crate::speech::google::recognize;

pub struct GoogleSpeechTranscriber {
    client: Client,
    endpoint: Url,
    api_key: String,
    language: String,
    ambient_noise_duration: Duration,
    timeout: Duration,
}

impl GoogleSpeechTranscriber {
    pub fn new(config: &MoodConfig, api_key: String) -> Result<Self> {
        let endpoint = Url::parse(&config.speech_url)
            .wrap_err_with(|| format!("Invalid speech URL: {}", config.speech_url))?;
        Ok(Self {
            client: Client::new(),
            endpoint,
            api_key,
            language: config.language.clone(),
            ambient_noise_duration: config.ambient_noise_duration(),
            timeout: config.transcription_timeout(),
        })
    }
}

#[async_trait::async_trait]
impl Transcriber for GoogleSpeechTranscriber {
    async fn transcribe(&self, audio_path: &Path) -> Result<String, TranscriptionError> {
        let path = audio_path.to_path_buf();
        let audio = tokio::task::spawn_blocking(move || decode_mono(&path))
            .await
            .map_err(|e| TranscriptionError::UnreadableAudio(e.to_string()))?
            .map_err(|e| TranscriptionError::UnreadableAudio(format!("{e:#}")))?;

        let calibration =
            calibrate_ambient_noise(&audio.samples, audio.sample_rate, self.ambient_noise_duration);
        tracing::debug!(
            "Ambient energy threshold {:.1} after {} samples",
            calibration.energy_threshold,
            calibration.consumed
        );

        let recorded = &audio.samples[calibration.consumed..];
        if recorded.is_empty() {
            return Err(TranscriptionError::SpeechNotUnderstood);
        }

        let response = recognize(
            &self.client,
            &self.endpoint,
            &self.api_key,
            &self.language,
            recorded,
            audio.sample_rate,
            self.timeout,
        )
        .await
        .map_err(|e| TranscriptionError::RecognitionServiceError(format!("{e:#}")))?;

        response
            .transcript()
            .ok_or(TranscriptionError::SpeechNotUnderstood)
    }
}
