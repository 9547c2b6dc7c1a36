//! Client metrics
//!
//! Counters and histograms for API calls, retries, failures and stale responses,
//! emitted through the `metrics` facade. Nothing is recorded anywhere until a
//! recorder is installed; [`init_metrics`] installs the Prometheus exporter.
//!
//! ## Metrics
//!
//! - `giphy_requests_total{path,status}`
//! - `giphy_request_duration_seconds{path}`
//! - `giphy_retries_total`, `giphy_retry_backoff_seconds`
//! - `giphy_failures_total{kind}`
//! - `giphy_stale_responses_total`
//! - `giphy_pool_available_slots`

use metrics::{
    counter, describe_counter, describe_gauge, describe_histogram, gauge, histogram, Unit,
};
use metrics_exporter_prometheus::PrometheusBuilder;
use once_cell::sync::Lazy;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::error::FailureKind;

static METRICS_INITIALIZED: Lazy<Arc<RwLock<bool>>> = Lazy::new(|| Arc::new(RwLock::new(false)));

static CORRELATION_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Install the Prometheus exporter on `addr`.
///
/// Idempotent: later calls are no-ops.
pub async fn init_metrics(addr: SocketAddr) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let mut initialized = METRICS_INITIALIZED.write().await;
    if *initialized {
        debug!("Metrics already initialized, skipping");
        return Ok(());
    }

    info!("Initializing metrics exporter on {}", addr);

    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .map_err(|e| format!("Failed to install Prometheus exporter: {e}"))?;

    describe_counter!(
        "giphy_requests_total",
        Unit::Count,
        "Total number of API calls, labelled by path and status"
    );
    describe_histogram!(
        "giphy_request_duration_seconds",
        Unit::Seconds,
        "API call duration in seconds"
    );
    describe_counter!(
        "giphy_retries_total",
        Unit::Count,
        "Total number of retries scheduled"
    );
    describe_histogram!(
        "giphy_retry_backoff_seconds",
        Unit::Seconds,
        "Backoff delay before each retry"
    );
    describe_counter!(
        "giphy_failures_total",
        Unit::Count,
        "Total number of failed calls, labelled by failure kind"
    );
    describe_counter!(
        "giphy_stale_responses_total",
        Unit::Count,
        "Responses dropped because the request was reset or cancelled"
    );
    describe_gauge!(
        "giphy_pool_available_slots",
        Unit::Count,
        "Free slots in the transport worker pool"
    );

    *initialized = true;
    Ok(())
}

/// Whether [`init_metrics`] has completed
pub async fn is_initialized() -> bool {
    *METRICS_INITIALIZED.read().await
}

/// Next correlation id for request tracing (`req-0000002a`)
pub fn next_correlation_id() -> String {
    let id = CORRELATION_COUNTER.fetch_add(1, Ordering::Relaxed) + 1;
    format!("req-{id:08x}")
}

/// Timing and outcome of one API call
#[derive(Debug)]
pub struct RequestMetrics {
    path: String,
    start_time: Instant,
    correlation_id: String,
}

impl RequestMetrics {
    /// Start timing a call to `path`
    pub fn start(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            start_time: Instant::now(),
            correlation_id: next_correlation_id(),
        }
    }

    /// Correlation id attached to log lines for this call
    pub fn correlation_id(&self) -> &str {
        &self.correlation_id
    }

    /// Record a call that produced an HTTP status
    pub fn record_complete(&self, status: u16) {
        let duration = self.start_time.elapsed();

        counter!(
            "giphy_requests_total",
            "path" => self.path.clone(),
            "status" => status.to_string(),
        )
        .increment(1);
        histogram!("giphy_request_duration_seconds", "path" => self.path.clone())
            .record(duration.as_secs_f64());

        debug!(
            correlation_id = %self.correlation_id,
            path = %self.path,
            status,
            duration_ms = duration.as_millis() as u64,
            "API call completed"
        );
    }

    /// Record a call that failed before any status arrived
    pub fn record_network_error(&self) {
        let duration = self.start_time.elapsed();

        counter!(
            "giphy_requests_total",
            "path" => self.path.clone(),
            "status" => "network_error",
        )
        .increment(1);
        histogram!("giphy_request_duration_seconds", "path" => self.path.clone())
            .record(duration.as_secs_f64());

        warn!(
            correlation_id = %self.correlation_id,
            path = %self.path,
            duration_ms = duration.as_millis() as u64,
            "API call failed without a response"
        );
    }
}

/// Record a scheduled retry and its delay
pub fn record_retry_backoff(delay: Duration) {
    counter!("giphy_retries_total").increment(1);
    histogram!("giphy_retry_backoff_seconds").record(delay.as_secs_f64());
}

/// Record a failure by kind
pub fn record_failure(kind: FailureKind) {
    counter!("giphy_failures_total", "kind" => kind.label()).increment(1);
}

/// Record a dropped stale response
pub fn record_stale_response() {
    counter!("giphy_stale_responses_total").increment(1);
}

/// Update the free-slot gauge of the worker pool
pub fn record_pool_available(available: usize) {
    gauge!("giphy_pool_available_slots").set(available as f64);
}
