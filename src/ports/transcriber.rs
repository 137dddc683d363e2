use std::path::Path;

#[derive(Debug, thiserror::Error)]
pub enum TranscriptionError {
    /// Audio was read but nothing intelligible was recognized.
    #[error("Could not understand audio")]
    SpeechNotUnderstood,
    #[error("Speech recognition service failed: {0}")]
    RecognitionServiceError(String),
    #[error("Could not decode audio: {0}")]
    UnreadableAudio(String),
}

/// Port trait wrapping the speech-to-text service.
///
/// Implementations live in `services::mood::transcriber_client` (production) or test mocks.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait Transcriber: Send + Sync {
    /// Transcribe the audio stored at `audio_path`. The file extension is used
    /// as the container hint.
    async fn transcribe(&self, audio_path: &Path) -> Result<String, TranscriptionError>;
}
