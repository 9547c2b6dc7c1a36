//! One API call: reachability check, transport, envelope check

use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use crate::config::{ClientConfig, Reachability};
use crate::endpoint::Endpoint;
use crate::error::{GiphyError, GiphyResult};
use crate::metrics::RequestMetrics;
use crate::response::{check_response, Envelope};
use crate::transport::Transport;

/// Everything needed to turn an [`Endpoint`] into a checked response.
/// Shared by the client, its paginated requests and its detail calls.
#[derive(Clone)]
pub struct CallContext {
    pub(crate) transport: Arc<dyn Transport>,
    pub(crate) api_key: String,
    pub(crate) base_url: String,
    pub(crate) user_agent: String,
    pub(crate) reachability: Option<Arc<dyn Reachability>>,
}

impl CallContext {
    /// Context for `config` over `transport`
    pub fn new(config: &ClientConfig, transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            api_key: config.api_key.clone(),
            base_url: config.base_url.clone(),
            user_agent: config.user_agent.clone(),
            reachability: config
                .offline_fast_fail
                .then(|| Arc::clone(&config.reachability)),
        }
    }

    /// Issue `endpoint` once and validate the envelope. No retries.
    pub async fn execute(
        &self,
        endpoint: &Endpoint,
        timeout: Option<Duration>,
    ) -> GiphyResult<(Envelope, Value)> {
        if let Some(reachability) = &self.reachability {
            if !reachability.is_reachable() {
                debug!(path = endpoint.path(), "network unreachable, failing fast");
                return Err(GiphyError::Offline);
            }
        }

        let request = endpoint
            .build(&self.api_key, &self.base_url, &self.user_agent)
            .with_timeout(timeout);
        let metrics = RequestMetrics::start(endpoint.path());

        let response = match self.transport.send(request).await {
            Ok(response) => response,
            Err(e) => {
                metrics.record_network_error();
                return Err(e.into());
            }
        };
        metrics.record_complete(response.status);

        check_response(response.status, &response.body)
    }
}

impl std::fmt::Debug for CallContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CallContext")
            .field("base_url", &self.base_url)
            .field("user_agent", &self.user_agent)
            .field("offline_fast_fail", &self.reachability.is_some())
            .finish_non_exhaustive()
    }
}
