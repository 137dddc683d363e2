pub mod client;
pub mod filter;

use tracing::instrument;

use crate::config::PlaylistConfig;
use crate::deezer_rs::search::UpstreamResponse;
use crate::ports::search::{SearchProvider, UpstreamUnavailable};
use filter::{FilterError, Playlist, build_playlist};

#[derive(Debug, thiserror::Error)]
pub enum PlaylistError {
    #[error(transparent)]
    UpstreamUnavailable(#[from] UpstreamUnavailable),
    #[error(transparent)]
    Filter(#[from] FilterError),
}

pub struct PlaylistService<S: SearchProvider> {
    provider: S,
    config: PlaylistConfig,
}

impl<S: SearchProvider> PlaylistService<S> {
    pub fn new(provider: S, config: PlaylistConfig) -> Self {
        Self { provider, config }
    }

    /// The query to search for, falling back to the default for blank input.
    pub fn resolve_query(&self, query: Option<&str>) -> String {
        match query.map(str::trim) {
            Some(q) if !q.is_empty() => q.to_string(),
            _ => self.config.default_query.clone(),
        }
    }

    /// Search once and filter the results into a playlist.
    #[instrument(skip(self))]
    pub async fn fetch_playlist(&self, query: &str) -> Result<Playlist, PlaylistError> {
        let limit = self.config.search_limit();
        let body = self.provider.search(query, limit).await.inspect_err(|e| {
            tracing::error!("Deezer API request failed: {}", e);
        })?;

        let response = UpstreamResponse::from_body(&body);
        if matches!(response, UpstreamResponse::Malformed) {
            tracing::warn!("Deezer API response missing 'data' field or is malformed");
        }

        let playlist = build_playlist(response, self.config.target_songs).inspect_err(|e| {
            if *e == FilterError::NoQualifyingResults {
                tracing::info!("No songs with preview URL found for query: {}", query);
            }
        })?;

        tracing::info!(
            "Built playlist of {} tracks for query: {}",
            playlist.entries().len(),
            query
        );
        Ok(playlist)
    }
}
