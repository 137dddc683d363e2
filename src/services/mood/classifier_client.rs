use std::time::Duration;

use color_eyre::eyre::{Result, WrapErr};
use reqwest::Client;
use url::Url;

use crate::config::MoodConfig;
use crate::huggingface::classify_text;
use crate::ports::classifier::{ClassifierError, LabelScore, MoodClassifier};

pub struct HuggingFaceClassifier {
    client: Client,
    model_url: Url,
    api_token: Option<String>,
    timeout: Duration,
}

impl HuggingFaceClassifier {
    pub fn new(config: &MoodConfig, api_token: Option<String>) -> Result<Self> {
        let model_url = Url::parse(&config.classifier_url)
            .wrap_err_with(|| format!("Invalid classifier URL: {}", config.classifier_url))?;
        Ok(Self {
            client: Client::new(),
            model_url,
            api_token,
            timeout: config.classifier_timeout(),
        })
    }
}

#[async_trait::async_trait]
impl MoodClassifier for HuggingFaceClassifier {
    async fn classify(&self, text: &str) -> Result<Vec<LabelScore>, ClassifierError> {
        let scores = classify_text(
            &self.client,
            &self.model_url,
            self.api_token.as_deref(),
            text,
            self.timeout,
        )
        .await
        .map_err(|e| ClassifierError::Service(format!("{e:#}")))?;

        if scores.is_empty() {
            return Err(ClassifierError::EmptyResult);
        }
        Ok(scores)
    }
}
