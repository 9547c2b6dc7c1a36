//! Client configuration
//!
//! A [`ClientConfig`] is built by the caller and handed to
//! [`GiphyClient::new`](crate::GiphyClient::new). There is no process-wide
//! client; each client owns its transport and worker pool.

use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

use crate::endpoint::routes::DEFAULT_BASE_URL;
use crate::request::cursor::DEFAULT_PAGE_SIZE;
use crate::transport::http::DEFAULT_TIMEOUT;
use crate::transport::pool::DEFAULT_MAX_CONCURRENT;

/// Environment variable holding the API key
pub const ENV_API_KEY: &str = "GIPHY_API_KEY";
/// Environment variable overriding the base URL
pub const ENV_BASE_URL: &str = "GIPHY_BASE_URL";
/// Environment variable overriding the timeout, in seconds
pub const ENV_TIMEOUT_SECS: &str = "GIPHY_TIMEOUT_SECS";
/// Environment variable overriding the page size
pub const ENV_PAGE_SIZE: &str = "GIPHY_PAGE_SIZE";

/// Reports whether the network is usable before a call is attempted
pub trait Reachability: Send + Sync {
    /// `false` makes calls fail fast with [`GiphyError::Offline`](crate::GiphyError::Offline)
    fn is_reachable(&self) -> bool;
}

/// Reachability that never reports offline
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysReachable;

impl Reachability for AlwaysReachable {
    fn is_reachable(&self) -> bool {
        true
    }
}

/// Configuration errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// Required variable not set
    #[error("environment variable {0} is not set")]
    MissingVar(&'static str),

    /// Variable set but unparseable
    #[error("invalid value for {name}: {value}")]
    InvalidValue {
        /// Variable name
        name: &'static str,
        /// Offending value
        value: String,
    },
}

/// Per-client configuration
#[derive(Clone)]
pub struct ClientConfig {
    /// Static API key sent as `api_key`
    pub api_key: String,
    /// API root, normally [`DEFAULT_BASE_URL`]
    pub base_url: String,
    /// Default per-call timeout
    pub timeout: Duration,
    /// Default `limit` of list endpoints
    pub page_size: u32,
    /// Consult `reachability` before each call
    pub offline_fast_fail: bool,
    /// Maximum concurrent in-flight calls
    pub max_concurrent_requests: usize,
    /// `User-Agent` header value
    pub user_agent: String,
    /// Network reachability probe
    pub reachability: Arc<dyn Reachability>,
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .field("page_size", &self.page_size)
            .field("offline_fast_fail", &self.offline_fast_fail)
            .field("max_concurrent_requests", &self.max_concurrent_requests)
            .field("user_agent", &self.user_agent)
            .finish_non_exhaustive()
    }
}

impl ClientConfig {
    /// Defaults for everything but the API key
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            page_size: DEFAULT_PAGE_SIZE,
            offline_fast_fail: true,
            max_concurrent_requests: DEFAULT_MAX_CONCURRENT,
            user_agent: default_user_agent(),
            reachability: Arc::new(AlwaysReachable),
        }
    }

    /// Load from `GIPHY_*` environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup(ENV_API_KEY)
            .filter(|k| !k.trim().is_empty())
            .ok_or(ConfigError::MissingVar(ENV_API_KEY))?;
        let mut config = Self::new(api_key);

        if let Some(url) = lookup(ENV_BASE_URL) {
            config.base_url = url;
        }
        if let Some(raw) = lookup(ENV_TIMEOUT_SECS) {
            let secs: u64 = raw.parse().map_err(|_| ConfigError::InvalidValue {
                name: ENV_TIMEOUT_SECS,
                value: raw.clone(),
            })?;
            config.timeout = Duration::from_secs(secs);
        }
        if let Some(raw) = lookup(ENV_PAGE_SIZE) {
            config.page_size = raw
                .parse()
                .ok()
                .filter(|n| *n > 0)
                .ok_or(ConfigError::InvalidValue {
                    name: ENV_PAGE_SIZE,
                    value: raw.clone(),
                })?;
        }

        Ok(config)
    }

    /// Override the base URL
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Override the default timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Override the default page size
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// Toggle the offline fast-fail check
    pub fn with_offline_fast_fail(mut self, enabled: bool) -> Self {
        self.offline_fast_fail = enabled;
        self
    }

    /// Override the worker pool size
    pub fn with_max_concurrent_requests(mut self, max: usize) -> Self {
        self.max_concurrent_requests = max;
        self
    }

    /// Override the `User-Agent`
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Install a reachability probe
    pub fn with_reachability(mut self, reachability: Arc<dyn Reachability>) -> Self {
        self.reachability = reachability;
        self
    }
}

fn default_user_agent() -> String {
    format!("giphy-client/{}", env!("CARGO_PKG_VERSION"))
}
