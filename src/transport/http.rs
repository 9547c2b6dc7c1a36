//! reqwest-backed transport

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

use super::{RawResponse, Transport, TransportError, WorkerPool};
use crate::endpoint::{HttpMethod, PreparedRequest};

/// Default per-call timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// HTTP transport over a shared `reqwest::Client` and worker pool
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    pool: WorkerPool,
    default_timeout: Duration,
}

impl HttpTransport {
    /// Build a transport with its own connection pool
    pub fn new(pool: WorkerPool, default_timeout: Duration) -> Result<Self, TransportError> {
        let client = Client::builder()
            .build()
            .map_err(|e| TransportError::Network(format!("failed to build HTTP client: {e}")))?;
        Ok(Self::with_client(client, pool, default_timeout))
    }

    /// Build a transport around an existing client
    pub fn with_client(client: Client, pool: WorkerPool, default_timeout: Duration) -> Self {
        Self {
            client,
            pool,
            default_timeout,
        }
    }

    /// Worker pool shared by this transport
    pub fn pool(&self) -> &WorkerPool {
        &self.pool
    }

    async fn execute(&self, request: PreparedRequest) -> Result<RawResponse, TransportError> {
        let method = match request.method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Put => reqwest::Method::PUT,
            HttpMethod::Delete => reqwest::Method::DELETE,
        };

        let mut builder = self.client.request(method, &request.url);
        for (name, value) in &request.headers {
            builder = builder.header(name, value);
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await.map_err(classify)?;
        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(k, v)| v.to_str().ok().map(|v| (k.as_str().to_string(), v.to_string())))
            .collect();
        let body = response.bytes().await.map_err(classify)?;

        Ok(RawResponse {
            status,
            headers,
            body,
        })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: PreparedRequest) -> Result<RawResponse, TransportError> {
        let _permit = self.pool.acquire().await?;
        let timeout = request.timeout.unwrap_or(self.default_timeout);

        // The query string carries the API key
        let target = request.url.split('?').next().unwrap_or_default();
        debug!(method = %request.method, url = %target, "sending request");

        // Timeout covers the whole exchange including the body read
        match tokio::time::timeout(timeout, self.execute(request)).await {
            Ok(result) => result,
            Err(_) => Err(TransportError::Timeout),
        }
    }
}

fn classify(err: reqwest::Error) -> TransportError {
    if err.is_timeout() {
        TransportError::Timeout
    } else if err.is_connect() {
        TransportError::Connect(err.to_string())
    } else {
        TransportError::Network(err.to_string())
    }
}
