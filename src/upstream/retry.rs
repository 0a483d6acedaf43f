//! Bounded exponential backoff for streaming-platform calls.

use std::time::Duration;

use crate::error::UpstreamError;

/// Retry limits: at most `max_retries` retries after the first attempt, with
/// `min(base_delay * 2^attempt, max_delay)` between attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay: Duration::from_millis(250),
            max_delay: Duration::from_secs(10),
        }
    }
}

impl RetryPolicy {
    /// Backoff before retry number `attempt` (zero-based).
    pub fn backoff(&self, attempt: u32) -> Duration {
        let factor = 1u32.checked_shl(attempt).unwrap_or(u32::MAX);
        self.base_delay.saturating_mul(factor).min(self.max_delay)
    }

    /// Delay before retrying after `error`. A server-provided `Retry-After`
    /// hint wins over the computed backoff but is still capped.
    pub fn delay_for(&self, attempt: u32, error: &UpstreamError) -> Duration {
        match error {
            UpstreamError::RateLimited {
                retry_after: Some(hint),
            } => (*hint).min(self.max_delay),
            _ => self.backoff(attempt),
        }
    }
}
