//! Error types and failure classification.
//!
//! Every failure the client can produce is a [`GiphyError`]. Errors hold owned
//! strings and are `Clone` so a single failure can be handed to every observer of
//! a paginated request. [`FailureKind`] decides whether a failure is transient
//! (retried with backoff) or permanent (surfaced once, request marked failed).

use thiserror::Error;

/// Result alias used across the crate
pub type GiphyResult<T> = Result<T, GiphyError>;

/// Errors produced by transport, decoding, mapping and request building
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GiphyError {
    /// Transport-level failure (connection reset, DNS, TLS, ...)
    #[error("network error: {0}")]
    Network(String),

    /// Call exceeded its timeout
    #[error("request timed out")]
    Timeout,

    /// Host reported as unreachable before the call was attempted
    #[error("network is unreachable")]
    Offline,

    /// HTTP status != 200 and the body carried no usable envelope
    #[error("HTTP {status}: {message}")]
    Http {
        /// HTTP status code
        status: u16,
        /// Best-effort reason text
        message: String,
    },

    /// Envelope decoded but reported a non-200 status
    #[error("API error {status}: {message}")]
    Api {
        /// Status from `meta.status` (or HTTP status when meta reported 200)
        status: u16,
        /// `meta.msg`
        message: String,
    },

    /// Body was not JSON, or not a JSON object
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// Body had no `meta` block or the block lacked required fields
    #[error("missing response envelope: {0}")]
    MissingEnvelope(String),

    /// Envelope was fine but the expected `data` field was absent
    #[error("missing data: {0}")]
    MissingData(String),

    /// `data` was present but could not be mapped into a model
    #[error("mapping error: {0}")]
    Mapping(String),

    /// Caller supplied an argument that cannot form a request
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

impl GiphyError {
    /// Classify this error for retry decisions and logging
    pub fn kind(&self) -> FailureKind {
        match self {
            GiphyError::Network(_) => FailureKind::NetworkGeneric,
            GiphyError::Timeout => FailureKind::NetworkTimeout,
            GiphyError::Offline => FailureKind::NetworkOffline,
            GiphyError::Http { status, .. } | GiphyError::Api { status, .. } => {
                FailureKind::from_status(*status)
            }
            GiphyError::MalformedResponse(_) | GiphyError::MissingEnvelope(_) => {
                FailureKind::Malformed
            }
            GiphyError::MissingData(_) => FailureKind::MissingData,
            GiphyError::Mapping(_) => FailureKind::Mapping,
            GiphyError::InvalidArgument(_) => FailureKind::InvalidRequest,
        }
    }

    /// Whether the failure should be retried with backoff
    pub fn is_retryable(&self) -> bool {
        self.kind().is_retryable()
    }

    /// HTTP or API status associated with this error, if any
    pub fn status_code(&self) -> Option<u16> {
        match self {
            GiphyError::Http { status, .. } | GiphyError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Classification of a failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Call timed out
    NetworkTimeout,
    /// Host unreachable or connection refused
    NetworkOffline,
    /// Any other transport failure
    NetworkGeneric,
    /// HTTP or envelope status 429
    RateLimit,
    /// 5xx status
    ServerError(u16),
    /// 401 / 403
    AuthFailed(u16),
    /// 404
    NotFound,
    /// Any other 4xx (and unexpected non-2xx codes)
    ClientError(u16),
    /// Body not JSON, not an object, or missing the envelope
    Malformed,
    /// Envelope present but `data` missing
    MissingData,
    /// `data` could not be mapped
    Mapping,
    /// Request could not be built from the caller's arguments
    InvalidRequest,
}

impl FailureKind {
    /// Classify a non-200 status code
    pub fn from_status(status: u16) -> Self {
        match status {
            401 | 403 => FailureKind::AuthFailed(status),
            404 => FailureKind::NotFound,
            429 => FailureKind::RateLimit,
            500..=599 => FailureKind::ServerError(status),
            _ => FailureKind::ClientError(status),
        }
    }

    /// Transient failures are retried; everything else is terminal
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            FailureKind::NetworkTimeout
                | FailureKind::NetworkOffline
                | FailureKind::NetworkGeneric
                | FailureKind::RateLimit
                | FailureKind::ServerError(_)
                | FailureKind::MissingData
        )
    }

    /// Short description used in log lines and metric labels
    pub fn description(&self) -> &'static str {
        match self {
            Self::NetworkTimeout => "network timeout",
            Self::NetworkOffline => "network offline",
            Self::NetworkGeneric => "network error",
            Self::RateLimit => "rate limit exceeded",
            Self::ServerError(code) => match code {
                500 => "internal server error",
                502 => "bad gateway",
                503 => "service unavailable",
                504 => "gateway timeout",
                _ => "server error",
            },
            Self::AuthFailed(_) => "authentication failed",
            Self::NotFound => "resource not found",
            Self::ClientError(_) => "client error",
            Self::Malformed => "malformed response",
            Self::MissingData => "missing data",
            Self::Mapping => "mapping error",
            Self::InvalidRequest => "invalid request",
        }
    }

    /// Stable label for metrics
    pub fn label(&self) -> &'static str {
        match self {
            Self::NetworkTimeout => "timeout",
            Self::NetworkOffline => "offline",
            Self::NetworkGeneric => "network",
            Self::RateLimit => "rate_limit",
            Self::ServerError(_) => "server",
            Self::AuthFailed(_) => "auth",
            Self::NotFound => "not_found",
            Self::ClientError(_) => "client",
            Self::Malformed => "malformed",
            Self::MissingData => "missing_data",
            Self::Mapping => "mapping",
            Self::InvalidRequest => "invalid_request",
        }
    }
}

impl std::fmt::Display for FailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.description())
    }
}
