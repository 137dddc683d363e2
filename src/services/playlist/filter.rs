use std::collections::HashSet;

use serde::Serialize;

use crate::deezer_rs::search::{Candidate, CandidateId, UpstreamResponse};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlaylistEntry {
    pub title: Option<String>,
    pub artist: Option<String>,
    pub preview_url: String,
}

/// Ordered, deduplicated entries, never longer than the target it was built for.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Playlist(Vec<PlaylistEntry>);

impl Playlist {
    pub fn entries(&self) -> &[PlaylistEntry] {
        &self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum FilterError {
    #[error("Search response was missing its list of results")]
    MalformedUpstreamResponse,
    #[error("No search result had a preview URL")]
    NoQualifyingResults,
}

/// Build a playlist from a decoded search response.
pub fn build_playlist(response: UpstreamResponse, target: usize) -> Result<Playlist, FilterError> {
    match response {
        UpstreamResponse::Candidates(candidates) => filter_candidates(candidates, target),
        UpstreamResponse::Malformed => Err(FilterError::MalformedUpstreamResponse),
    }
}

/// Keep candidates with a preview URL whose id hasn't been seen yet, in
/// provider order, stopping once `target` entries were accepted.
///
/// Candidates after the target is reached are never pulled from the iterator.
pub fn filter_candidates<I>(candidates: I, target: usize) -> Result<Playlist, FilterError>
where
    I: IntoIterator<Item = Candidate>,
{
    let mut seen: HashSet<Option<CandidateId>> = HashSet::new();

    let entries: Vec<PlaylistEntry> = candidates
        .into_iter()
        .filter_map(|candidate| {
            let preview_url = candidate.preview_url.filter(|url| !url.is_empty())?;
            // An absent id is a key of its own, so only the first id-less hit gets in.
            if !seen.insert(candidate.id) {
                return None;
            }
            Some(PlaylistEntry {
                title: candidate.title,
                artist: candidate.artist_name,
                preview_url,
            })
        })
        .take(target)
        .collect();

    if entries.is_empty() {
        return Err(FilterError::NoQualifyingResults);
    }

    Ok(Playlist(entries))
}
