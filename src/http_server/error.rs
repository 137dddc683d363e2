use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::services::mood::MoodError;
use crate::services::playlist::PlaylistError;
use crate::services::playlist::filter::FilterError;

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// A playlist failure together with the query it was for, so messages can name it.
pub struct PlaylistFailure<'a> {
    pub error: PlaylistError,
    pub query: &'a str,
}

impl IntoResponse for PlaylistFailure<'_> {
    fn into_response(self) -> Response {
        let query = self.query;
        let (status, error, message) = match self.error {
            PlaylistError::UpstreamUnavailable(_) => (
                StatusCode::SERVICE_UNAVAILABLE,
                "External API Error",
                "Could not connect to or retrieve data from the Deezer API.".to_string(),
            ),
            PlaylistError::Filter(FilterError::MalformedUpstreamResponse) => (
                StatusCode::NOT_FOUND,
                "No Songs Found",
                format!("No results found for query '{query}' or API response was unexpected."),
            ),
            PlaylistError::Filter(FilterError::NoQualifyingResults) => (
                StatusCode::NOT_FOUND,
                "No Songs Found",
                format!(
                    "Could not find any songs with a preview URL for query '{query}'. Try a different search term."
                ),
            ),
        };

        let body = ErrorBody {
            error: error.to_string(),
            message: Some(message),
        };
        (status, Json(body)).into_response()
    }
}

impl MoodError {
    pub fn status(&self) -> StatusCode {
        match self {
            MoodError::FileTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            MoodError::UnsupportedFormat => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            MoodError::MissingFile | MoodError::InvalidUpload(_) | MoodError::InvalidRequest(_) => {
                StatusCode::BAD_REQUEST
            }
            MoodError::EmptyText
            | MoodError::SpeechNotUnderstood
            | MoodError::UnreadableAudio => StatusCode::UNPROCESSABLE_ENTITY,
            MoodError::RecognitionServiceError | MoodError::ClassificationFailed => {
                StatusCode::BAD_GATEWAY
            }
            MoodError::TranscriptionTimedOut => StatusCode::GATEWAY_TIMEOUT,
            MoodError::TemporaryStorage => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for MoodError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.to_string(),
            message: None,
        };
        (self.status(), Json(body)).into_response()
    }
}
