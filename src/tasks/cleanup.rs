//! TTL Cleanup Task
//!
//! Background task that periodically removes expired cache entries.

use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::SharedCache;

/// Maximum number of entries removed per write-lock acquisition.
pub const SWEEP_BATCH: usize = 256;

/// Spawns a background task that periodically cleans up expired cache entries.
///
/// Each run removes expired entries in batches of at most [`SWEEP_BATCH`],
/// releasing the write lock and yielding between batches so `get`/`set`
/// callers are never blocked for longer than one batch.
///
/// Returns a JoinHandle that can be used to abort the task during shutdown.
///
/// # Example
/// ```ignore
/// let cache = FingerprintCache::new(1000, Duration::from_secs(3600)).into_shared();
/// let cleanup_handle = spawn_cleanup_task(cache.clone(), Duration::from_secs(120));
/// // Later, during shutdown:
/// cleanup_handle.abort();
/// ```
pub fn spawn_cleanup_task(cache: SharedCache, interval: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!(
            "Starting TTL cleanup task with interval of {} ms",
            interval.as_millis()
        );

        loop {
            tokio::time::sleep(interval).await;

            let removed = sweep(&cache).await;
            if removed > 0 {
                info!("TTL cleanup: removed {} expired entries", removed);
            } else {
                debug!("TTL cleanup: no expired entries found");
            }
        }
    })
}

/// Runs one full sweep in batches. Returns the number of entries removed.
pub async fn sweep(cache: &SharedCache) -> usize {
    let mut total = 0;
    loop {
        let removed = cache.write().await.sweep_expired(SWEEP_BATCH);
        total += removed;
        if removed < SWEEP_BATCH {
            return total;
        }
        tokio::task::yield_now().await;
    }
}
