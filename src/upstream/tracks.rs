//! Memoized audio-feature lookups with retry and single-flight token refresh.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use serde_json::Value;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::cache::{duration_ms, CacheKey, SharedCache};
use crate::error::UpstreamError;
use crate::upstream::{RetryPolicy, StreamingPlatform};

/// Caches per-track audio features keyed by track id.
///
/// Transient failures are retried per the `RetryPolicy`. A `401` triggers one
/// token refresh shared by every caller that saw the same stale token; the
/// refresh itself counts as an attempt.
pub struct CachedTracks<S> {
    platform: S,
    cache: SharedCache,
    ttl: Duration,
    retry: RetryPolicy,
    /// Bumped after every successful token refresh
    auth_epoch: AtomicU64,
    refresh_lock: Mutex<()>,
}

impl<S: StreamingPlatform> CachedTracks<S> {
    pub fn new(platform: S, cache: SharedCache, ttl: Duration, retry: RetryPolicy) -> Self {
        Self {
            platform,
            cache,
            ttl,
            retry,
            auth_epoch: AtomicU64::new(0),
            refresh_lock: Mutex::new(()),
        }
    }

    pub fn inner(&self) -> &S {
        &self.platform
    }

    /// Number of token refreshes performed so far.
    pub fn refresh_count(&self) -> u64 {
        self.auth_epoch.load(Ordering::Acquire)
    }

    // == Audio Features ==
    pub async fn audio_features(&self, track_id: &str) -> Result<Value, UpstreamError> {
        let key = CacheKey::track(track_id);

        let cached = self.cache.write().await.get_value(&key);
        if let Some(value) = cached {
            return Ok(value);
        }

        let features = self.fetch_with_retry(track_id).await?;
        self.cache.write().await.set_with_ttl(&key, &features, self.ttl);
        Ok(features)
    }

    async fn fetch_with_retry(&self, track_id: &str) -> Result<Value, UpstreamError> {
        let mut attempt = 0;
        loop {
            let epoch = self.auth_epoch.load(Ordering::Acquire);
            let error = match self.platform.audio_features(track_id).await {
                Ok(features) => return Ok(features),
                Err(e) => e,
            };

            if attempt >= self.retry.max_retries {
                warn!(track_id, attempt, error = %error, "Giving up on audio features");
                return Err(error);
            }

            if matches!(error, UpstreamError::Unauthorized(_)) {
                debug!(track_id, "Access token rejected");
                self.reauthenticate(epoch).await?;
            } else if error.is_retryable() {
                let delay = self.retry.delay_for(attempt, &error);
                warn!(
                    track_id,
                    attempt,
                    delay_ms = duration_ms(delay),
                    error = %error,
                    "Retrying audio features"
                );
                tokio::time::sleep(delay).await;
            } else {
                return Err(error);
            }
            attempt += 1;
        }
    }

    /// Refreshes the access token unless another caller already did so since
    /// `seen_epoch` was read.
    async fn reauthenticate(&self, seen_epoch: u64) -> Result<(), UpstreamError> {
        let _guard = self.refresh_lock.lock().await;
        if self.auth_epoch.load(Ordering::Acquire) != seen_epoch {
            debug!("Token already refreshed by a concurrent caller");
            return Ok(());
        }

        self.platform.refresh_access_token().await?;
        self.auth_epoch.fetch_add(1, Ordering::AcqRel);
        info!("Streaming platform access token refreshed");
        Ok(())
    }
}
