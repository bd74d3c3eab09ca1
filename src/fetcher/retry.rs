//! Retry policy for archive requests
//!
//! The policy is an immutable value handed to the HTTP client at
//! construction; nothing mutates retry state on a live client.

use std::time::Duration;

/// Default number of attempts per request.
pub const DEFAULT_RETRY_TIMES: u32 = 3;

/// Default backoff factor in seconds.
pub const DEFAULT_BACKOFF_FACTOR: f64 = 1.0;

/// HTTP status codes that trigger a retry; anything else in the 4xx/5xx
/// ranges propagates immediately.
pub const RETRYABLE_STATUS: [u16; 5] = [429, 500, 502, 503, 504];

/// Bounded exponential backoff policy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryPolicy {
    /// Total attempts per request, the first one included.
    pub max_attempts: u32,
    /// Multiplier applied to the exponential delay, in seconds.
    pub backoff_factor: f64,
}

impl RetryPolicy {
    /// Create a policy with the given attempt count and backoff factor.
    pub fn new(max_attempts: u32, backoff_factor: f64) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            backoff_factor,
        }
    }

    /// Delay to sleep after the given failed attempt (1-based):
    /// `backoff_factor * 2^(attempt - 1)` seconds.
    pub fn delay(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(31);
        Duration::from_secs_f64(self.backoff_factor * f64::from(2u32.pow(exponent)))
    }

    /// Whether the given HTTP status code warrants another attempt.
    pub fn is_retryable_status(&self, status: u16) -> bool {
        RETRYABLE_STATUS.contains(&status)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_RETRY_TIMES, DEFAULT_BACKOFF_FACTOR)
    }
}
