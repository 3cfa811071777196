//! Retry and backoff policy for venue requests
//!
//! Two distinct backoff schedules apply:
//! - rate limiting (HTTP 429): exponential, the session is kept open
//! - connection failure (timeout, reset): linear, the session is discarded
//!   and recreated before the next attempt

use std::time::Duration;

/// Retry policy shared by every network call
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Maximum number of attempts per request
    pub max_attempts: u32,
    /// Base delay for the connection-recreate path
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_secs(5),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts,
            base_delay,
        }
    }

    /// Backoff after a 429 response: `2^attempt` seconds
    pub fn rate_limit_delay(&self, attempt: u32) -> Duration {
        Duration::from_secs(1 << attempt.min(16))
    }

    /// Backoff after a connection-level failure: `base * (attempt + 1)`
    pub fn reconnect_delay(&self, attempt: u32) -> Duration {
        self.base_delay * (attempt + 1)
    }
}
