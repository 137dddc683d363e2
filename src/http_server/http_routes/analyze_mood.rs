use std::sync::Arc;

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use serde::Deserialize;

use crate::ports::classifier::MoodClassifier;
use crate::ports::transcriber::Transcriber;
use crate::services::mood::{MoodAnalysis, MoodError, MoodService};

#[derive(Debug, Deserialize)]
pub struct MoodRequest {
    text: String,
}

pub async fn analyze_mood<C, T>(
    State(service): State<Arc<MoodService<C, T>>>,
    request: Result<Json<MoodRequest>, JsonRejection>,
) -> Result<Json<MoodAnalysis>, MoodError>
where
    C: MoodClassifier + 'static,
    T: Transcriber + 'static,
{
    let Json(request) = request.map_err(|e| MoodError::InvalidRequest(e.body_text()))?;
    let analysis = service.analyze_text(&request.text).await?;
    Ok(Json(analysis))
}
