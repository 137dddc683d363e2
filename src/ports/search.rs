/// Raised when the search provider cannot be reached, times out, or answers
/// with a non-success status.
#[derive(Debug, thiserror::Error)]
#[error("Search provider unavailable: {reason}")]
pub struct UpstreamUnavailable {
    pub reason: String,
}

impl UpstreamUnavailable {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// Port trait wrapping the music-search provider.
///
/// Implementations live in `services::playlist::client` (production) or test mocks.
/// The provider only delivers the raw body; interpreting it is the filter's job.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait SearchProvider: Send + Sync {
    async fn search(&self, term: &str, limit: usize) -> Result<String, UpstreamUnavailable>;
}
