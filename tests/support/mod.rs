//! Shared test doubles: a scripted transport, response builders and a local
//! mock API server

#![allow(dead_code)]

use async_trait::async_trait;
use axum::Router;
use giphy_client::endpoint::PreparedRequest;
use giphy_client::transport::{RawResponse, Transport, TransportError};
use giphy_client::{ClientConfig, GiphyClient};
use serde_json::{json, Value};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tokio::sync::oneshot;
use tokio::time::Instant;

/// What the scripted transport answers with next
pub enum Reply {
    /// Respond immediately
    Now(RawResponse),
    /// Fail immediately
    Fail(TransportError),
    /// Respond once the paired sender fires
    Gated(oneshot::Receiver<RawResponse>),
}

/// One call seen by the scripted transport
#[derive(Debug, Clone)]
pub struct SeenCall {
    pub url: String,
    pub at: Instant,
}

/// Transport that answers from a queue and records every call
#[derive(Default)]
pub struct ScriptedTransport {
    replies: Mutex<VecDeque<Reply>>,
    calls: Mutex<Vec<SeenCall>>,
}

impl ScriptedTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn push(&self, reply: Reply) {
        self.replies.lock().unwrap().push_back(reply);
    }

    pub fn respond(&self, status: u16, body: Value) {
        self.push(Reply::Now(RawResponse::new(status, body.to_string())));
    }

    /// Queue a reply that is held until the returned sender is used
    pub fn gate(&self) -> oneshot::Sender<RawResponse> {
        let (tx, rx) = oneshot::channel();
        self.push(Reply::Gated(rx));
        tx
    }

    pub fn calls(&self) -> Vec<SeenCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// Value of query parameter `name` in call `index`
    pub fn query_param(&self, index: usize, name: &str) -> Option<String> {
        let url = self.calls.lock().unwrap().get(index)?.url.clone();
        let query = url.split_once('?')?.1.to_string();
        query.split('&').find_map(|pair| {
            let (k, v) = pair.split_once('=')?;
            (k == name).then(|| v.to_string())
        })
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn send(&self, request: PreparedRequest) -> Result<RawResponse, TransportError> {
        self.calls.lock().unwrap().push(SeenCall {
            url: request.url.clone(),
            at: Instant::now(),
        });
        let reply = self.replies.lock().unwrap().pop_front();
        match reply {
            Some(Reply::Now(response)) => Ok(response),
            Some(Reply::Fail(err)) => Err(err),
            Some(Reply::Gated(rx)) => rx
                .await
                .map_err(|_| TransportError::Network("gate dropped".into())),
            None => Err(TransportError::Connect("no scripted reply".into())),
        }
    }
}

/// Client over `transport` with offline checks disabled
pub fn scripted_client(transport: Arc<ScriptedTransport>) -> GiphyClient {
    let config = ClientConfig::new("test-key").with_offline_fast_fail(false);
    GiphyClient::with_transport(config, transport)
}

pub fn meta(status: u16, message: &str) -> Value {
    json!({"status": status, "msg": message, "response_id": "test-response"})
}

pub fn media_json(id: &str) -> Value {
    json!({
        "type": "gif",
        "id": id,
        "url": format!("https://giphy.com/gifs/{id}"),
        "rating": "g",
        "images": {
            "original": {"url": format!("https://media.giphy.com/media/{id}/giphy.gif"), "width": "480", "height": "270"}
        }
    })
}

/// Media page body with `count` items starting at `offset`
pub fn media_page(count: u32, total: u32, offset: u32) -> Value {
    let data: Vec<Value> = (0..count)
        .map(|i| media_json(&format!("gif-{}", offset + i)))
        .collect();
    json!({
        "data": data,
        "pagination": {"total_count": total, "count": count, "offset": offset},
        "meta": meta(200, "OK")
    })
}

/// Body carrying only an error envelope
pub fn error_body(status: u16, message: &str) -> Value {
    json!({"data": [], "meta": meta(status, message)})
}

/// Serve `router` on an ephemeral local port; returns the API base URL
pub async fn spawn_server(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}/v1/")
}

/// Yield until the transport has seen at least `n` calls
pub async fn wait_for_calls(transport: &ScriptedTransport, n: usize) {
    while transport.call_count() < n {
        tokio::task::yield_now().await;
    }
}

/// Raw response carrying `body`
pub fn raw(status: u16, body: Value) -> RawResponse {
    RawResponse::new(status, body.to_string())
}
