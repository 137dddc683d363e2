use std::time::Duration;

use color_eyre::Result;
use color_eyre::eyre::Context;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use url::Url;

use crate::ports::classifier::LabelScore;

/// The inference API nests the distribution per input when it batches, and
/// returns it flat otherwise.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ClassificationResponse {
    Batched(Vec<Vec<LabelScore>>),
    Single(Vec<LabelScore>),
}

impl ClassificationResponse {
    /// Scores for the first (and only) input.
    pub fn into_scores(self) -> Vec<LabelScore> {
        match self {
            Self::Batched(batches) => batches.into_iter().next().unwrap_or_default(),
            Self::Single(scores) => scores,
        }
    }
}

/// Score `text` against every label of the hosted text-classification model.
pub async fn classify_text(
    client: &Client,
    model_url: &Url,
    api_token: Option<&str>,
    text: &str,
    timeout: Duration,
) -> Result<Vec<LabelScore>> {
    // top_k = null asks for the whole distribution instead of the best label
    let body = json!({
        "inputs": text,
        "parameters": { "top_k": null },
    });

    let mut request = client.post(model_url.clone()).json(&body).timeout(timeout);
    if let Some(token) = api_token {
        request = request.bearer_auth(token);
    }

    tracing::debug!("Sending classification request to {}", model_url);

    let response: ClassificationResponse = request
        .send()
        .await
        .wrap_err_with(|| format!("Failed to send classification request to {}", model_url))?
        .error_for_status()
        .wrap_err("Classification service returned an error status")?
        .json()
        .await
        .wrap_err("Failed to parse classification response")?;

    Ok(response.into_scores())
}
