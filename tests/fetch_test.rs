//! HTTP integration tests for the reqwest transport and fetch classification
//!
//! A local axum server stands in for the webcams:
//! - `/img.jpg` always 200
//! - `/private.jpg` 200 only with Basic auth alice:secret, 401 otherwise
//! - `/broken.jpg` 500

use axum::{
    Router,
    http::{HeaderMap, StatusCode, header},
    response::IntoResponse,
    routing::get,
};
use bytes::Bytes;
use std::sync::Arc;
use std::time::Duration;

use camview::app::{App, Boot};
use camview::config::{FetchConfig, MemorySource};
use camview::display::MemoryDisplay;
use camview::fetch::{AlwaysConnected, FetchFailure, FetchResult, HttpTransport, ImageFetcher};
use camview::target::parse_target;
use camview::worker::Cadence;

const JPEG: &[u8] = b"\xff\xd8\xff\xe0fake-jpeg\xff\xd9";

async fn private_image(headers: HeaderMap) -> impl IntoResponse {
    // base64("alice:secret")
    match headers.get(header::AUTHORIZATION).and_then(|v| v.to_str().ok()) {
        Some("Basic YWxpY2U6c2VjcmV0") => (StatusCode::OK, Bytes::from_static(b"private-frame")).into_response(),
        _ => StatusCode::UNAUTHORIZED.into_response(),
    }
}

/// Start mock webcam server, returns its base URL
async fn start_mock_server() -> String {
    let app = Router::new()
        .route("/img.jpg", get(|| async { (StatusCode::OK, Bytes::from_static(JPEG)) }))
        .route("/private.jpg", get(private_image))
        .route("/broken.jpg", get(|| async { StatusCode::INTERNAL_SERVER_ERROR }));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{}", addr)
}

/// Loopback requests must not be routed through a proxy from the environment
fn local_fetch_config() -> FetchConfig {
    FetchConfig {
        system_proxy: false,
        ..FetchConfig::default()
    }
}

fn fetcher() -> ImageFetcher {
    let transport = HttpTransport::new(&local_fetch_config()).unwrap();
    ImageFetcher::new(Arc::new(transport))
}

#[tokio::test]
async fn test_fetch_success_returns_body() {
    let base = start_mock_server().await;
    let target = parse_target(&format!("{}/img.jpg", base));

    let result = fetcher().fetch(&target, &AlwaysConnected).await;

    assert_eq!(result, FetchResult::Success(Bytes::from_static(JPEG)));
}

#[tokio::test]
async fn test_fetch_missing_is_404() {
    let base = start_mock_server().await;
    let url = format!("{}/missing.jpg", base);

    let result = fetcher().fetch(&parse_target(&url), &AlwaysConnected).await;

    assert_eq!(result, FetchResult::Failure(FetchFailure::HttpError { code: 404, url }));
}

#[tokio::test]
async fn test_fetch_server_error() {
    let base = start_mock_server().await;
    let url = format!("{}/broken.jpg", base);

    let result = fetcher().fetch(&parse_target(&url), &AlwaysConnected).await;

    assert!(matches!(result, FetchResult::Failure(FetchFailure::HttpError { code: 500, .. })));
}

#[tokio::test]
async fn test_basic_auth_from_url() {
    let base = start_mock_server().await;
    let host = base.trim_start_matches("http://");

    let anonymous = parse_target(&format!("http://{}/private.jpg", host));
    let result = fetcher().fetch(&anonymous, &AlwaysConnected).await;
    assert!(matches!(result, FetchResult::Failure(FetchFailure::HttpError { code: 401, .. })));

    let authed = parse_target(&format!("http://alice:secret@{}/private.jpg", host));
    assert_eq!(authed.fetch_url, format!("http://{}/private.jpg", host));
    let result = fetcher().fetch(&authed, &AlwaysConnected).await;
    assert_eq!(result, FetchResult::Success(Bytes::from_static(b"private-frame")));

    let wrong = parse_target(&format!("http://alice:guess@{}/private.jpg", host));
    let result = fetcher().fetch(&wrong, &AlwaysConnected).await;
    assert!(matches!(result, FetchResult::Failure(FetchFailure::HttpError { code: 401, .. })));
}

#[tokio::test]
async fn test_connection_refused_is_malformed_url() {
    // Grab a free port, then close it
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let target = parse_target(&format!("http://{}/img.jpg", addr));
    let result = fetcher().fetch(&target, &AlwaysConnected).await;

    assert_eq!(result, FetchResult::Failure(FetchFailure::MalformedUrl));
}

#[tokio::test]
async fn test_app_shows_authenticated_webcam() {
    let base = start_mock_server().await;
    let host = base.trim_start_matches("http://");

    let source = MemorySource::new();
    source.set("url1", format!("http://alice:secret@{}/private.jpg", host));
    let display = Arc::new(MemoryDisplay::new());

    let mut app = App::on_boot(Boot {
        source: Arc::new(source),
        display: display.clone(),
        transport: Arc::new(HttpTransport::new(&local_fetch_config()).unwrap()),
        connectivity: Arc::new(AlwaysConnected),
        cadence: Cadence {
            success_delay: Duration::from_millis(10),
            error_delay: Duration::from_millis(20),
        },
    });

    app.on_start().unwrap();
    app.on_resume().await.unwrap();

    tokio::time::timeout(Duration::from_secs(5), async {
        while display.current_image().is_none() {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .expect("image should be displayed");

    app.on_stop().await;

    assert_eq!(display.current_image(), Some(Bytes::from_static(b"private-frame")));
    assert_eq!(display.current_status().as_deref(), Some(""));
}
