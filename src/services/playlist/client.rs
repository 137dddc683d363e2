use std::time::Duration;

use color_eyre::eyre::{Result, WrapErr};
use reqwest::Client;
use url::Url;

use crate::config::PlaylistConfig;
use crate::deezer_rs::search::search_tracks;
use crate::ports::search::{SearchProvider, UpstreamUnavailable};

pub struct DeezerHttpAdapter {
    client: Client,
    api_url: Url,
    timeout: Duration,
}

impl DeezerHttpAdapter {
    pub fn new(config: &PlaylistConfig) -> Result<Self> {
        let api_url = Url::parse(&config.api_url)
            .wrap_err_with(|| format!("Invalid Deezer API URL: {}", config.api_url))?;
        Ok(Self {
            client: Client::new(),
            api_url,
            timeout: config.timeout(),
        })
    }
}

#[async_trait::async_trait]
impl SearchProvider for DeezerHttpAdapter {
    async fn search(&self, term: &str, limit: usize) -> Result<String, UpstreamUnavailable> {
        search_tracks(&self.client, &self.api_url, term, limit, self.timeout)
            .await
            .map_err(|e| UpstreamUnavailable::new(format!("{e:#}")))
    }
}
