use std::sync::Arc;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use color_eyre::eyre::{Context, eyre};
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::http_server::http_routes::{
    analyze_audio::analyze_audio, analyze_mood::analyze_mood, playlist::get_playlist,
};
use crate::ports::classifier::MoodClassifier;
use crate::ports::search::SearchProvider;
use crate::ports::transcriber::Transcriber;
use crate::services::mood::MoodService;
use crate::services::playlist::PlaylistService;

async fn root() -> &'static str {
    "MoodTune is running"
}

pub fn playlist_router<S: SearchProvider + 'static>(service: Arc<PlaylistService<S>>) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/playlist", get(get_playlist::<S>))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(service)
}

pub fn mood_router<C, T>(service: Arc<MoodService<C, T>>) -> Router
where
    C: MoodClassifier + 'static,
    T: Transcriber + 'static,
{
    Router::new()
        .route("/", get(root))
        .route("/analyze-mood", post(analyze_mood::<C, T>))
        // The upload size is enforced while streaming the file field
        .route(
            "/analyze-audio",
            post(analyze_audio::<C, T>).layer(DefaultBodyLimit::disable()),
        )
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(service)
}

pub async fn serve(router: Router, port: u16) -> color_eyre::Result<()> {
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port))
        .await
        .wrap_err_with(|| eyre!("Failed to bind to port {}", port))?;
    tracing::info!("Listening on {}", listener.local_addr()?);
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .wrap_err("Failed to start HTTP server")?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}

#[cfg(test)]
mod tests {
    use axum::{
        body::Body,
        http::{Request, StatusCode, header},
    };
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use super::*;
    use crate::config::{MoodConfig, PlaylistConfig};
    use crate::ports::classifier::{LabelScore, MockMoodClassifier};
    use crate::ports::search::{MockSearchProvider, UpstreamUnavailable};
    use crate::ports::transcriber::{MockTranscriber, TranscriptionError};
    use crate::test_utils::{MULTIPART_BOUNDARY, deezer_body, multipart_body};

    async fn send(router: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = router.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn playlist_app(provider: MockSearchProvider) -> Router {
        playlist_router(Arc::new(PlaylistService::new(
            provider,
            PlaylistConfig::default(),
        )))
    }

    fn mood_app(
        classifier: MockMoodClassifier,
        transcriber: MockTranscriber,
        max_upload_bytes: usize,
    ) -> Router {
        let config = MoodConfig {
            max_upload_bytes,
            ..MoodConfig::default()
        };
        mood_router(Arc::new(MoodService::new(classifier, transcriber, &config)))
    }

    fn classifier_returning(pairs: &'static [(&'static str, f64)]) -> MockMoodClassifier {
        let mut classifier = MockMoodClassifier::new();
        classifier.expect_classify().returning(move |_| {
            Ok(pairs
                .iter()
                .map(|(label, score)| LabelScore {
                    label: label.to_string(),
                    score: *score,
                })
                .collect())
        });
        classifier
    }

    fn upload_request(filename: &str, contents: &[u8]) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/analyze-audio")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={MULTIPART_BOUNDARY}"),
            )
            .body(Body::from(multipart_body("file", filename, contents)))
            .unwrap()
    }

    // ========================================================================
    // Playlist
    // ========================================================================

    #[tokio::test]
    async fn test_playlist_ok() {
        let mut provider = MockSearchProvider::new();
        provider
            .expect_search()
            .withf(|term, _| term.to_string() == "daft punk")
            .returning(|_, _| {
                Ok(deezer_body(&[
                    (1, None),
                    (2, Some("u2")),
                    (2, Some("u2")),
                    (3, Some("u3")),
                ]))
            });

        let (status, body) = send(
            playlist_app(provider),
            get_request("/playlist?q=daft%20punk"),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!([
                {"title": "Track 2", "artist": "Artist 2", "preview_url": "u2"},
                {"title": "Track 3", "artist": "Artist 3", "preview_url": "u3"}
            ])
        );
    }

    #[tokio::test]
    async fn test_playlist_default_query() {
        let mut provider = MockSearchProvider::new();
        provider
            .expect_search()
            .withf(|term, limit| term.to_string() == "lofi" && *limit == 20)
            .times(2)
            .returning(|_, _| Ok(deezer_body(&[(1, Some("u1"))])));
        let app = playlist_app(provider);

        let (status, _) = send(app.clone(), get_request("/playlist")).await;
        assert_eq!(status, StatusCode::OK);
        let (status, _) = send(app, get_request("/playlist?q=")).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_playlist_upstream_unavailable() {
        let mut provider = MockSearchProvider::new();
        provider
            .expect_search()
            .returning(|_, _| Err(UpstreamUnavailable::new("operation timed out")));

        let (status, body) = send(playlist_app(provider), get_request("/playlist?q=lofi")).await;

        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["error"], "External API Error");
        assert!(body["message"].is_string());
    }

    #[tokio::test]
    async fn test_playlist_no_previews() {
        let mut provider = MockSearchProvider::new();
        provider
            .expect_search()
            .returning(|_, _| Ok(deezer_body(&[(1, None)])));

        let (status, body) = send(playlist_app(provider), get_request("/playlist?q=silence")).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "No Songs Found");
        assert!(body["message"].as_str().unwrap().contains("'silence'"));
    }

    #[tokio::test]
    async fn test_playlist_malformed_upstream() {
        let mut provider = MockSearchProvider::new();
        provider
            .expect_search()
            .returning(|_, _| Ok(r#"{"data": "nope"}"#.to_string()));

        let (status, body) = send(playlist_app(provider), get_request("/playlist?q=lofi")).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(
            body["message"]
                .as_str()
                .unwrap()
                .contains("API response was unexpected")
        );
    }

    // ========================================================================
    // Mood
    // ========================================================================

    #[tokio::test]
    async fn test_analyze_mood_text() {
        let app = mood_app(
            classifier_returning(&[("joy", 0.4), ("sadness", 0.6)]),
            MockTranscriber::new(),
            1024,
        );
        let request = Request::builder()
            .method("POST")
            .uri("/analyze-mood")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(r#"{"text": "rainy days again"}"#))
            .unwrap();

        let (status, body) = send(app, request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({"input_text": "rainy days again", "mood": "sadness", "confidence": 0.6})
        );
    }

    #[tokio::test]
    async fn test_analyze_mood_empty_text() {
        let app = mood_app(MockMoodClassifier::new(), MockTranscriber::new(), 1024);
        let request = Request::builder()
            .method("POST")
            .uri("/analyze-mood")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(r#"{"text": ""}"#))
            .unwrap();

        let (status, body) = send(app, request).await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"], "Text must not be empty");
    }

    #[tokio::test]
    async fn test_analyze_audio_ok() {
        let mut transcriber = MockTranscriber::new();
        transcriber
            .expect_transcribe()
            .withf(|path| path.extension().is_some_and(|ext| ext == "m4a"))
            .returning(|_| Ok("this is amazing".to_string()));
        let app = mood_app(
            classifier_returning(&[("surprise", 0.7123), ("joy", 0.2877)]),
            transcriber,
            1024,
        );

        let (status, body) = send(app, upload_request("Memo.M4A", b"fake audio")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({"input_text": "this is amazing", "mood": "surprise", "confidence": 0.712})
        );
    }

    #[tokio::test]
    async fn test_analyze_audio_unsupported_format() {
        let mut transcriber = MockTranscriber::new();
        transcriber.expect_transcribe().never();
        let app = mood_app(MockMoodClassifier::new(), transcriber, 1024);

        let (status, body) = send(app, upload_request("notes.txt", b"hello")).await;

        assert_eq!(status, StatusCode::UNSUPPORTED_MEDIA_TYPE);
        assert_eq!(
            body["error"],
            "Unsupported file format. Please upload WAV, MP3, or M4A file"
        );
    }

    #[tokio::test]
    async fn test_analyze_audio_too_large() {
        let mut transcriber = MockTranscriber::new();
        transcriber.expect_transcribe().never();
        let app = mood_app(MockMoodClassifier::new(), transcriber, 1024);

        let (status, body) = send(app, upload_request("long.wav", &[0u8; 4096])).await;

        assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
        assert!(body["error"].as_str().unwrap().starts_with("File size too large"));
    }

    #[tokio::test]
    async fn test_analyze_audio_missing_file_field() {
        let app = mood_app(MockMoodClassifier::new(), MockTranscriber::new(), 1024);
        let request = Request::builder()
            .method("POST")
            .uri("/analyze-audio")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={MULTIPART_BOUNDARY}"),
            )
            .body(Body::from(multipart_body("attachment", "a.wav", b"x")))
            .unwrap();

        let (status, body) = send(app, request).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "No audio file was uploaded");
    }

    #[tokio::test]
    async fn test_analyze_audio_not_understood() {
        let mut transcriber = MockTranscriber::new();
        transcriber
            .expect_transcribe()
            .returning(|_| Err(TranscriptionError::SpeechNotUnderstood));
        let app = mood_app(MockMoodClassifier::new(), transcriber, 1024);

        let (status, body) = send(app, upload_request("mumble.wav", b"RIFF")).await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body, json!({"error": "Could not understand audio"}));
    }

    #[tokio::test]
    async fn test_analyze_mood_missing_text_field() {
        let mut classifier = MockMoodClassifier::new();
        classifier.expect_classify().never();
        let app = mood_app(classifier, MockTranscriber::new(), 1024);
        let request = Request::builder()
            .method("POST")
            .uri("/analyze-mood")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{}"))
            .unwrap();

        let (status, body) = send(app, request).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(
            body["error"]
                .as_str()
                .unwrap()
                .starts_with("Invalid request:")
        );
    }

    #[tokio::test]
    async fn test_analyze_audio_not_multipart() {
        let mut transcriber = MockTranscriber::new();
        transcriber.expect_transcribe().never();
        let app = mood_app(MockMoodClassifier::new(), transcriber, 1024);
        let request = Request::builder()
            .method("POST")
            .uri("/analyze-audio")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(r#"{"file": "clip.wav"}"#))
            .unwrap();

        let (status, body) = send(app, request).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().starts_with("Invalid upload:"));
    }
}
