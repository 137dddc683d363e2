use serde::{Deserialize, Serialize};

/// One entry of a classifier's output distribution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelScore {
    pub label: String,
    pub score: f64,
}

#[derive(Debug, thiserror::Error)]
pub enum ClassifierError {
    #[error("Classification service failed: {0}")]
    Service(String),
    #[error("Classification service returned no labels")]
    EmptyResult,
}

/// Port trait wrapping the pretrained text-classification model.
///
/// Implementations live in `services::mood::classifier_client` (production) or test mocks.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait MoodClassifier: Send + Sync {
    /// Scores for every label of the model's vocabulary, in provider order.
    async fn classify(&self, text: &str) -> Result<Vec<LabelScore>, ClassifierError>;
}
