//! HTTP and envelope failures, timeouts and offline fast-fail over real HTTP

use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use futures_util::StreamExt;
use giphy_client::client::QueryOptions;
use giphy_client::config::Reachability;
use giphy_client::{ClientConfig, FailureKind, GiphyClient, GiphyError};
use serde_json::json;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::support::{meta, spawn_server};

fn router() -> Router {
    Router::new()
        .route(
            "/v1/gifs/search",
            get(|| async {
                (
                    StatusCode::UNAUTHORIZED,
                    Json(json!({"message": "Invalid authentication credentials"})),
                )
            }),
        )
        .route(
            "/v1/gifs/trending",
            get(|| async {
                (
                    StatusCode::NOT_FOUND,
                    Json(json!({"data": [], "meta": meta(404, "Not Found")})),
                )
            }),
        )
        .route(
            "/v1/stickers/trending",
            get(|| async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                Json(json!({"data": [], "meta": meta(200, "OK")}))
            }),
        )
        .route("/v1/gifs/translate", get(|| async { "<html>gateway</html>" }))
        .route(
            "/v1/gifs/random",
            get(|| async { Json(json!({"data": {"id": "x", "url": "u"}, "meta": meta(403, "Forbidden")})) }),
        )
}

async fn client_with(config: impl FnOnce(ClientConfig) -> ClientConfig) -> GiphyClient {
    let base_url = spawn_server(router()).await;
    GiphyClient::new(config(ClientConfig::new("test-key").with_base_url(base_url))).unwrap()
}

#[tokio::test]
async fn test_401_without_envelope_is_terminal() {
    let client = client_with(|c| c).await;
    let request = client.search("cats", QueryOptions::default());
    let mut updates = request.subscribe();
    request.trigger_next_page(false);

    let update = updates.next().await.unwrap();
    let err = update.error().unwrap();
    assert_eq!(
        *err,
        GiphyError::Http {
            status: 401,
            message: "Invalid authentication credentials".into()
        }
    );
    assert_eq!(err.kind(), FailureKind::AuthFailed(401));
    assert!(!update.snapshot.is_retry_scheduled());
    assert!(update.snapshot.flags.has_terminal_failure);
}

#[tokio::test]
async fn test_404_envelope_is_not_found() {
    let client = client_with(|c| c).await;
    let request = client.trending(QueryOptions::default());
    let mut updates = request.subscribe();
    request.trigger_next_page(false);

    let update = updates.next().await.unwrap();
    assert_eq!(update.error().unwrap().kind(), FailureKind::NotFound);
    assert_eq!(update.snapshot.retry_count, 0);
    assert!(!request.trigger_next_page(false));
}

#[tokio::test]
async fn test_envelope_status_wins_over_http_200() {
    let client = client_with(|c| c).await;
    let err = client.random("", QueryOptions::default()).await.unwrap_err();
    assert_eq!(err.status_code(), Some(403));
    assert_eq!(err.kind(), FailureKind::AuthFailed(403));
}

#[tokio::test]
async fn test_non_json_body_is_malformed() {
    let client = client_with(|c| c).await;
    let err = client.translate("hi", QueryOptions::default()).await.unwrap_err();
    assert!(matches!(err, GiphyError::MalformedResponse(_)));
    assert_eq!(err.kind(), FailureKind::Malformed);
}

#[tokio::test]
async fn test_slow_response_times_out() {
    let client = client_with(|c| c.with_timeout(Duration::from_millis(100))).await;
    let request = client.trending(QueryOptions::default().media(giphy_client::MediaType::Sticker));
    let mut updates = request.subscribe();
    request.trigger_next_page(false);

    let update = updates.next().await.unwrap();
    assert_eq!(update.error(), Some(&GiphyError::Timeout));
    assert!(update.snapshot.is_retry_scheduled());
    request.cancel();
}

#[tokio::test]
async fn test_per_request_timeout_override() {
    let client = client_with(|c| c).await;
    let request = client
        .trending(QueryOptions::default().media(giphy_client::MediaType::Sticker))
        .with_timeout(Duration::from_millis(50));
    let mut updates = request.subscribe();
    request.trigger_next_page(false);
    assert_eq!(updates.next().await.unwrap().error(), Some(&GiphyError::Timeout));
}

struct Switch {
    online: AtomicBool,
    probes: AtomicUsize,
}

impl Reachability for Switch {
    fn is_reachable(&self) -> bool {
        self.probes.fetch_add(1, Ordering::SeqCst);
        self.online.load(Ordering::SeqCst)
    }
}

#[tokio::test]
async fn test_offline_fails_fast_without_a_call() {
    let switch = Arc::new(Switch {
        online: AtomicBool::new(false),
        probes: AtomicUsize::new(0),
    });
    // Unroutable base URL: any real call would fail differently
    let config = ClientConfig::new("test-key")
        .with_base_url("http://127.0.0.1:9/v1/")
        .with_reachability(switch.clone());
    let client = GiphyClient::new(config).unwrap();

    let err = client.gif_by_id("abc").await.unwrap_err();
    assert_eq!(err, GiphyError::Offline);
    assert_eq!(err.kind(), FailureKind::NetworkOffline);
    assert!(err.is_retryable());
    assert_eq!(switch.probes.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_offline_check_can_be_disabled() {
    let switch = Arc::new(Switch {
        online: AtomicBool::new(false),
        probes: AtomicUsize::new(0),
    });
    let base_url = spawn_server(router()).await;
    let config = ClientConfig::new("test-key")
        .with_base_url(base_url)
        .with_reachability(switch.clone())
        .with_offline_fast_fail(false);
    let client = GiphyClient::new(config).unwrap();

    let err = client.random("", QueryOptions::default()).await.unwrap_err();
    assert_eq!(err.status_code(), Some(403));
    assert_eq!(switch.probes.load(Ordering::SeqCst), 0);
}
