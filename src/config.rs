//! Configuration Module
//!
//! Handles loading cache, retry and server settings from environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::cache::NonFinitePolicy;
use crate::upstream::RetryPolicy;

/// Runtime configuration.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Maximum number of cache entries
    pub max_keys: usize,
    /// Default TTL in seconds for generated results (0 = no expiry)
    pub default_ttl: u64,
    /// TTL in seconds for per-track audio features (0 = no expiry)
    pub audio_features_ttl: u64,
    /// Interval in seconds between expiry sweeps
    pub check_period: u64,
    /// Refuse to cache keys holding NaN or infinite numbers
    pub strict_keys: bool,
    /// HTTP admin server port
    pub server_port: u16,
    /// Maximum retries for a streaming-platform call
    pub max_retries: u32,
    /// Base delay in milliseconds for exponential backoff
    pub retry_base_delay_ms: u64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `MAX_KEYS` - Maximum cache entries (default: 1000)
    /// - `DEFAULT_TTL` - Default TTL in seconds (default: 3600)
    /// - `AUDIO_FEATURES_TTL` - Audio feature TTL in seconds (default: 86400)
    /// - `CHECK_PERIOD` - Expiry sweep frequency in seconds (default: 120)
    /// - `STRICT_KEYS` - Skip caching of non-finite criteria (default: false)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `MAX_RETRIES` - Upstream retry limit (default: 3)
    /// - `RETRY_BASE_DELAY_MS` - Backoff base delay (default: 250)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            max_keys: env_or("MAX_KEYS", defaults.max_keys),
            default_ttl: env_or("DEFAULT_TTL", defaults.default_ttl),
            audio_features_ttl: env_or("AUDIO_FEATURES_TTL", defaults.audio_features_ttl),
            check_period: env_or("CHECK_PERIOD", defaults.check_period),
            strict_keys: env_or("STRICT_KEYS", defaults.strict_keys),
            server_port: env_or("SERVER_PORT", defaults.server_port),
            max_retries: env_or("MAX_RETRIES", defaults.max_retries),
            retry_base_delay_ms: env_or("RETRY_BASE_DELAY_MS", defaults.retry_base_delay_ms),
        }
    }

    pub fn default_ttl(&self) -> Duration {
        Duration::from_secs(self.default_ttl)
    }

    pub fn audio_features_ttl(&self) -> Duration {
        Duration::from_secs(self.audio_features_ttl)
    }

    /// Sweep interval, never shorter than one second.
    pub fn check_period(&self) -> Duration {
        Duration::from_secs(self.check_period.max(1))
    }

    pub fn non_finite_policy(&self) -> NonFinitePolicy {
        if self.strict_keys {
            NonFinitePolicy::Skip
        } else {
            NonFinitePolicy::Opaque
        }
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_retries: self.max_retries,
            base_delay: Duration::from_millis(self.retry_base_delay_ms),
            ..RetryPolicy::default()
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_keys: 1000,
            default_ttl: 3600,
            audio_features_ttl: 86_400,
            check_period: 120,
            strict_keys: false,
            server_port: 3000,
            max_retries: 3,
            retry_base_delay_ms: 250,
        }
    }
}

fn env_or<T: FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}
