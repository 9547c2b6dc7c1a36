//! HTTP transport
//!
//! A [`Transport`] performs exactly one HTTP call and hands back the raw status,
//! headers and body. It never interprets the body; envelope checks happen in
//! [`crate::response`]. Cancellation is cooperative: dropping or aborting the
//! future that drives [`Transport::send`] abandons the call and nothing is
//! reported for it.

pub mod http;
pub mod pool;

pub use http::HttpTransport;
pub use pool::WorkerPool;

use crate::endpoint::PreparedRequest;
use crate::error::GiphyError;
use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;

/// Raw result of one HTTP exchange
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    /// HTTP status code
    pub status: u16,
    /// Response headers (lower-cased names)
    pub headers: Vec<(String, String)>,
    /// Response body
    pub body: Bytes,
}

impl RawResponse {
    /// Response with no headers
    pub fn new(status: u16, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: body.into(),
        }
    }

    /// Header value by case-insensitive name
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Transport failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// Call exceeded its timeout
    #[error("request timed out")]
    Timeout,

    /// Connection could not be established
    #[error("connection failed: {0}")]
    Connect(String),

    /// Any other transport failure
    #[error("network error: {0}")]
    Network(String),

    /// The worker pool was shut down
    #[error("worker pool closed")]
    PoolClosed,
}

impl From<TransportError> for GiphyError {
    fn from(err: TransportError) -> Self {
        match err {
            TransportError::Timeout => GiphyError::Timeout,
            TransportError::Connect(msg) => GiphyError::Network(format!("connection failed: {msg}")),
            TransportError::Network(msg) => GiphyError::Network(msg),
            TransportError::PoolClosed => GiphyError::Network("worker pool closed".into()),
        }
    }
}

/// Executes prepared requests
#[async_trait]
pub trait Transport: Send + Sync {
    /// Perform one call, honoring `request.timeout` when set
    async fn send(&self, request: PreparedRequest) -> Result<RawResponse, TransportError>;
}
