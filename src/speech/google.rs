use std::time::Duration;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use color_eyre::Result;
use color_eyre::eyre::Context;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use url::Url;

/* ---------- Request ---------- */

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RecognitionConfig<'a> {
    encoding: &'static str,
    sample_rate_hertz: u32,
    language_code: &'a str,
}

#[derive(Debug, Serialize)]
struct RecognitionAudio {
    content: String,
}

#[derive(Debug, Serialize)]
struct RecognizeRequest<'a> {
    config: RecognitionConfig<'a>,
    audio: RecognitionAudio,
}

/* ---------- Response ---------- */

#[derive(Debug, Default, Deserialize)]
pub struct RecognizeResponse {
    #[serde(default)]
    pub results: Vec<RecognitionResult>,
}

#[derive(Debug, Deserialize)]
pub struct RecognitionResult {
    #[serde(default)]
    pub alternatives: Vec<RecognitionAlternative>,
}

#[derive(Debug, Deserialize)]
pub struct RecognitionAlternative {
    #[serde(default)]
    pub transcript: String,
}

impl RecognizeResponse {
    /// Best alternative of each consecutive result, joined. `None` when nothing was recognized.
    pub fn transcript(&self) -> Option<String> {
        let text = self
            .results
            .iter()
            .filter_map(|result| result.alternatives.first())
            .map(|alternative| alternative.transcript.trim())
            .filter(|transcript| !transcript.is_empty())
            .collect::<Vec<_>>()
            .join(" ");

        (!text.is_empty()).then_some(text)
    }
}

/// Encode mono `[-1.0, 1.0]` samples as 16-bit little-endian PCM.
pub fn encode_linear16(samples: &[f32]) -> Vec<u8> {
    samples
        .iter()
        .flat_map(|s| {
            let value = (s.clamp(-1.0, 1.0) * f32::from(i16::MAX)).round() as i16;
            value.to_le_bytes()
        })
        .collect()
}

/// Send one synchronous recognize request.
pub async fn recognize(
    client: &Client,
    endpoint: &Url,
    api_key: &str,
    language: &str,
    samples: &[f32],
    sample_rate: u32,
    timeout: Duration,
) -> Result<RecognizeResponse> {
    let request = RecognizeRequest {
        config: RecognitionConfig {
            encoding: "LINEAR16",
            sample_rate_hertz: sample_rate,
            language_code: language,
        },
        audio: RecognitionAudio {
            content: STANDARD.encode(encode_linear16(samples)),
        },
    };

    tracing::debug!(
        "Sending {:.2}s of audio to speech recognition",
        samples.len() as f64 / f64::from(sample_rate.max(1))
    );

    let response = client
        .post(endpoint.clone())
        .query(&[("key", api_key)])
        .json(&request)
        .timeout(timeout)
        .send()
        .await
        .wrap_err("Failed to send speech recognition request")?
        .error_for_status()
        .wrap_err("Speech recognition returned an error status")?
        .json::<RecognizeResponse>()
        .await
        .wrap_err("Failed to parse speech recognition response")?;

    Ok(response)
}
