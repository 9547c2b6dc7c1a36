//! Retry backoff schedule

use std::time::Duration;

/// Base delay in seconds
pub const BASE_DELAY_SECS: f64 = 1.0;

/// Exponent applied to the retry count
pub const BACKOFF_POWER: f64 = 2.0;

/// Delay before retry number `retry_count` (1-based): `base * retry_count^power`.
///
/// Retries are uncapped, so a long-failing request backs off quadratically
/// without limit. `Duration` saturates rather than panicking on overflow.
pub fn backoff_delay(retry_count: u32) -> Duration {
    let secs = BASE_DELAY_SECS * f64::from(retry_count).powf(BACKOFF_POWER);
    Duration::try_from_secs_f64(secs).unwrap_or(Duration::MAX)
}
