pub mod classifier_client;
pub mod selection;
pub mod transcriber_client;
pub mod upload;

use std::time::Duration;

use serde::Serialize;
use tracing::instrument;

use crate::config::MoodConfig;
use crate::ports::classifier::{ClassifierError, MoodClassifier};
use crate::ports::transcriber::{Transcriber, TranscriptionError};
use selection::select_top_mood;
use upload::persist_temp;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MoodAnalysis {
    pub input_text: String,
    pub mood: String,
    pub confidence: f64,
}

/// An upload that already passed the size and format checks.
#[derive(Debug)]
pub struct AudioUpload {
    pub contents: Vec<u8>,
    pub extension: &'static str,
}

#[derive(Debug, thiserror::Error)]
pub enum MoodError {
    #[error("File size too large. Maximum size is {}", display_size(*.limit))]
    FileTooLarge { limit: usize },
    #[error("Unsupported file format. Please upload WAV, MP3, or M4A file")]
    UnsupportedFormat,
    #[error("No audio file was uploaded")]
    MissingFile,
    #[error("Invalid upload: {0}")]
    InvalidUpload(String),
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
    #[error("Text must not be empty")]
    EmptyText,
    #[error("Could not understand audio")]
    SpeechNotUnderstood,
    #[error("Speech recognition service failed")]
    RecognitionServiceError,
    #[error("Could not read audio file")]
    UnreadableAudio,
    #[error("Speech recognition timed out")]
    TranscriptionTimedOut,
    #[error("Mood classification failed")]
    ClassificationFailed,
    #[error("Failed to store upload")]
    TemporaryStorage,
}

const MIB: usize = 1024 * 1024;

/// Whole mebibytes print as `10MB`, anything else as raw bytes.
fn display_size(bytes: usize) -> String {
    if bytes >= MIB && bytes % MIB == 0 {
        format!("{}MB", bytes / MIB)
    } else {
        format!("{bytes} bytes")
    }
}

impl From<TranscriptionError> for MoodError {
    fn from(err: TranscriptionError) -> Self {
        match err {
            TranscriptionError::SpeechNotUnderstood => Self::SpeechNotUnderstood,
            TranscriptionError::RecognitionServiceError(_) => Self::RecognitionServiceError,
            TranscriptionError::UnreadableAudio(_) => Self::UnreadableAudio,
        }
    }
}

impl From<ClassifierError> for MoodError {
    fn from(_: ClassifierError) -> Self {
        Self::ClassificationFailed
    }
}

pub struct MoodService<C: MoodClassifier, T: Transcriber> {
    classifier: C,
    transcriber: T,
    max_upload_bytes: usize,
    transcription_timeout: Duration,
}

impl<C: MoodClassifier, T: Transcriber> MoodService<C, T> {
    pub fn new(classifier: C, transcriber: T, config: &MoodConfig) -> Self {
        Self {
            classifier,
            transcriber,
            max_upload_bytes: config.max_upload_bytes,
            transcription_timeout: config.transcription_timeout(),
        }
    }

    pub fn max_upload_bytes(&self) -> usize {
        self.max_upload_bytes
    }

    #[instrument(skip(self))]
    pub async fn analyze_text(&self, text: &str) -> Result<MoodAnalysis, MoodError> {
        if text.trim().is_empty() {
            return Err(MoodError::EmptyText);
        }

        let scores = self.classifier.classify(text).await.inspect_err(|e| {
            tracing::error!("Classifier failed: {}", e);
        })?;
        let prediction = select_top_mood(&scores).ok_or(MoodError::ClassificationFailed)?;

        tracing::info!(
            "Classified text as {} ({})",
            prediction.mood,
            prediction.confidence
        );
        Ok(MoodAnalysis {
            input_text: text.to_string(),
            mood: prediction.mood,
            confidence: prediction.confidence,
        })
    }

    /// Transcribe the upload, then classify the transcript.
    ///
    /// The upload only lives on disk while it is being transcribed.
    #[instrument(skip(self, upload), fields(bytes = upload.contents.len(), extension = upload.extension))]
    pub async fn analyze_audio(&self, upload: AudioUpload) -> Result<MoodAnalysis, MoodError> {
        let text = {
            let AudioUpload {
                contents,
                extension,
            } = upload;
            let temp_file = tokio::task::spawn_blocking(move || persist_temp(&contents, extension))
                .await
                .map_err(|e| {
                    tracing::error!("Temp file task failed: {}", e);
                    MoodError::TemporaryStorage
                })?
                .map_err(|e| {
                    tracing::error!("Failed to write temp file: {}", e);
                    MoodError::TemporaryStorage
                })?;

            match tokio::time::timeout(
                self.transcription_timeout,
                self.transcriber.transcribe(temp_file.path()),
            )
            .await
            {
                Ok(result) => result.inspect_err(|e| {
                    tracing::warn!("Transcription failed: {}", e);
                })?,
                Err(_) => {
                    tracing::error!(
                        "Transcription did not finish within {:?}",
                        self.transcription_timeout
                    );
                    return Err(MoodError::TranscriptionTimedOut);
                }
            }
        };

        tracing::debug!("Transcribed audio: {}", text);
        self.analyze_text(&text).await
    }
}
