use std::sync::Arc;

use axum::{
    Json,
    extract::{Multipart, State, multipart::MultipartRejection},
};

use crate::ports::classifier::MoodClassifier;
use crate::ports::transcriber::Transcriber;
use crate::services::mood::upload::{UploadError, accepted_extension, read_capped};
use crate::services::mood::{AudioUpload, MoodAnalysis, MoodError, MoodService};

/// Name of the multipart field carrying the audio file.
const FILE_FIELD: &str = "file";

pub async fn analyze_audio<C, T>(
    State(service): State<Arc<MoodService<C, T>>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<MoodAnalysis>, MoodError>
where
    C: MoodClassifier + 'static,
    T: Transcriber + 'static,
{
    let mut multipart = multipart.map_err(|e| MoodError::InvalidUpload(e.body_text()))?;

    let field = loop {
        match multipart.next_field().await {
            Ok(Some(field)) if field.name() == Some(FILE_FIELD) => break field,
            Ok(Some(_)) => continue,
            Ok(None) => return Err(MoodError::MissingFile),
            Err(e) => return Err(MoodError::InvalidUpload(e.body_text())),
        }
    };

    let filename = field.file_name().unwrap_or_default().to_string();
    let extension = accepted_extension(&filename).ok_or_else(|| {
        tracing::info!("Rejected upload with unsupported name: {}", filename);
        MoodError::UnsupportedFormat
    })?;

    let limit = service.max_upload_bytes();
    let contents = read_capped(field, limit).await.map_err(|e| match e {
        UploadError::TooLarge { limit } => {
            tracing::info!("Rejected upload {} larger than {} bytes", filename, limit);
            MoodError::FileTooLarge { limit }
        }
        UploadError::Read(reason) => MoodError::InvalidUpload(reason),
    })?;

    tracing::info!("Accepted upload {} ({} bytes)", filename, contents.len());
    let analysis = service
        .analyze_audio(AudioUpload {
            contents,
            extension,
        })
        .await?;
    Ok(Json(analysis))
}
