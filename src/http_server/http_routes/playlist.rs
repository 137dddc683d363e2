use std::sync::Arc;

use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Deserialize;

use crate::http_server::error::PlaylistFailure;
use crate::ports::search::SearchProvider;
use crate::services::playlist::PlaylistService;

#[derive(Debug, Deserialize)]
pub struct PlaylistQuery {
    q: Option<String>,
}

pub async fn get_playlist<S: SearchProvider + 'static>(
    State(service): State<Arc<PlaylistService<S>>>,
    Query(params): Query<PlaylistQuery>,
) -> Response {
    let query = service.resolve_query(params.q.as_deref());
    tracing::info!("Received request for query: {}", query);

    match service.fetch_playlist(&query).await {
        Ok(playlist) => (StatusCode::OK, Json(playlist)).into_response(),
        Err(error) => PlaylistFailure {
            error,
            query: &query,
        }
        .into_response(),
    }
}
