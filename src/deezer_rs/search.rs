use std::time::Duration;

use color_eyre::eyre::{Result, WrapErr};
use reqwest::Client;
use serde_json::Value;
use url::Url;

/* ---------- Request ---------- */

/// Issue a single search request and hand back the raw body.
pub async fn search_tracks(
    client: &Client,
    api_url: &Url,
    term: &str,
    limit: usize,
    timeout: Duration,
) -> Result<String> {
    let limit = limit.to_string();
    let body = client
        .get(api_url.clone())
        .query(&[("q", term), ("limit", limit.as_str())])
        .timeout(timeout)
        .send()
        .await
        .wrap_err_with(|| format!("Failed to send Deezer search request to {}", api_url))?
        .error_for_status()
        .wrap_err("Deezer search returned an error status")?
        .text()
        .await
        .wrap_err("Failed to read Deezer search response body")?;

    Ok(body)
}

/* ---------- Response envelope ---------- */

/// Opaque track identifier used as the dedup key.
///
/// The JSON type is part of the key, so `2` and `"2"` are different ids.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CandidateId {
    Text(String),
    /// Any non-string id, kept by its JSON text.
    Other(String),
}

impl CandidateId {
    fn from_value(value: &Value) -> Self {
        match value {
            Value::String(s) => Self::Text(s.clone()),
            other => Self::Other(other.to_string()),
        }
    }
}

impl From<i64> for CandidateId {
    fn from(id: i64) -> Self {
        Self::Other(id.to_string())
    }
}

/// Raw search hit, before filtering.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Candidate {
    pub id: Option<CandidateId>,
    pub title: Option<String>,
    pub artist_name: Option<String>,
    pub preview_url: Option<String>,
}

impl Candidate {
    /// Lenient extraction: missing or mistyped fields become `None`.
    fn from_value(item: &Value) -> Self {
        let text = |v: Option<&Value>| v.and_then(Value::as_str).map(str::to_owned);

        Self {
            id: item
                .get("id")
                .filter(|v| !v.is_null())
                .map(CandidateId::from_value),
            title: text(item.get("title")),
            artist_name: text(item.get("artist").and_then(|a| a.get("name"))),
            preview_url: text(item.get("preview")),
        }
    }
}

/// Decoded search response.
#[derive(Debug, Clone, PartialEq)]
pub enum UpstreamResponse {
    Candidates(Vec<Candidate>),
    /// Body was not JSON, or carried no list-typed `data` field.
    Malformed,
}

impl UpstreamResponse {
    pub fn from_body(body: &str) -> Self {
        let Ok(value) = serde_json::from_str::<Value>(body) else {
            return Self::Malformed;
        };

        match value.get("data") {
            Some(Value::Array(items)) => {
                Self::Candidates(items.iter().map(Candidate::from_value).collect())
            }
            _ => Self::Malformed,
        }
    }
}
