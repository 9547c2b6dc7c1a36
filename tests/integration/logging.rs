//! Structured logging of requests, retries and failures

use axum::routing::get;
use axum::{Json, Router};
use futures_util::StreamExt;
use giphy_client::client::QueryOptions;
use giphy_client::{ClientConfig, GiphyClient};
use serde_json::{json, Value};
use std::io;
use std::sync::{Arc, Mutex};
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::EnvFilter;

use crate::support::{error_body, media_page, meta, scripted_client, spawn_server, ScriptedTransport};

#[derive(Clone, Default)]
struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

impl SharedBuffer {
    fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl io::Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for SharedBuffer {
    type Writer = SharedBuffer;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

fn capture<F: FnOnce()>(json: bool, f: F) -> String {
    let buffer = SharedBuffer::default();
    let filter = EnvFilter::new("giphy_client=debug");
    if json {
        let subscriber = tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(buffer.clone())
            .finish();
        tracing::subscriber::with_default(subscriber, f);
    } else {
        let subscriber = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_ansi(false)
            .with_writer(buffer.clone())
            .finish();
        tracing::subscriber::with_default(subscriber, f);
    }
    buffer.contents()
}

#[test]
fn test_retry_and_recovery_are_logged() {
    let logs = capture(false, || {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .start_paused(true)
            .build()
            .unwrap();
        runtime.block_on(async {
            let transport = ScriptedTransport::new();
            transport.respond(503, error_body(503, "Service Unavailable"));
            transport.respond(200, media_page(5, 50, 0));
            let client = scripted_client(transport);

            let request = client.search("cats", QueryOptions::default().limit(5));
            let mut updates = request.subscribe();
            request.trigger_next_page(false);
            updates.next().await.unwrap();
            updates.next().await.unwrap();
        });
    });

    assert!(logs.contains("page request failed, retry scheduled"), "{logs}");
    assert!(logs.contains("delay_ms=1000"), "{logs}");
    assert!(logs.contains("page received"), "{logs}");
}

#[test]
fn test_api_key_is_not_logged() {
    let logs = capture(false, || {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        runtime.block_on(async {
            let router = Router::new().route(
                "/v1/gifs/{id}",
                get(|| async { Json(json!({"data": {"id": "a", "url": "u"}, "meta": meta(200, "OK")})) }),
            );
            let base_url = spawn_server(router).await;
            let config = ClientConfig::new("super-secret-key").with_base_url(base_url);
            let client = GiphyClient::new(config).unwrap();
            client.gif_by_id("a").await.unwrap();
            assert!(!format!("{:?}", client.config()).contains("super-secret-key"));
        });
    });

    assert!(logs.contains("sending request"), "{logs}");
    assert!(!logs.contains("super-secret-key"), "{logs}");
}

#[test]
fn test_json_format_emits_one_object_per_line() {
    let logs = capture(true, || {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        runtime.block_on(async {
            let transport = ScriptedTransport::new();
            let client = scripted_client(transport);
            let request = client.trending(QueryOptions::default());
            request.reset_request(false);
            request.cancel();
        });
    });

    let lines: Vec<Value> = logs
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    assert!(lines
        .iter()
        .any(|l| l["fields"]["message"] == "request reset" && l["level"] == "INFO"));
}
