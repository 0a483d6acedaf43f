//! Fingerprint Cache Module
//!
//! Main cache engine: fingerprint-keyed storage with TTL expiration and
//! oldest-first eviction. No operation returns an error; unusable keys and
//! unserializable values degrade to a miss or a skipped write.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::cache::entry::{current_timestamp_ms, duration_ms};
use crate::cache::{
    CacheEntry, CacheKey, CacheStats, Fingerprint, InsertionOrder, NonFinitePolicy,
};
use crate::config::Config;

/// Cache shared between the memoizing wrappers, the sweeper and the admin API.
pub type SharedCache = Arc<RwLock<FingerprintCache>>;

// == Fingerprint Cache ==
#[derive(Debug)]
pub struct FingerprintCache {
    /// Fingerprint-keyed storage
    entries: HashMap<Fingerprint, CacheEntry>,
    /// Insertion order for eviction
    order: InsertionOrder,
    stats: CacheStats,
    /// Maximum number of entries, at least 1
    max_keys: usize,
    /// TTL applied by `set`; zero means no expiry
    default_ttl: Duration,
    policy: NonFinitePolicy,
}

impl FingerprintCache {
    // == Constructor ==
    /// Creates a cache holding at most `max_keys` entries (clamped to 1).
    pub fn new(max_keys: usize, default_ttl: Duration) -> Self {
        Self {
            entries: HashMap::new(),
            order: InsertionOrder::new(),
            stats: CacheStats::new(),
            max_keys: max_keys.max(1),
            default_ttl,
            policy: NonFinitePolicy::default(),
        }
    }

    /// Creates a cache from the loaded configuration.
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.max_keys, config.default_ttl())
            .with_policy(config.non_finite_policy())
    }

    pub fn with_policy(mut self, policy: NonFinitePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Wraps the cache for sharing across tasks.
    pub fn into_shared(self) -> SharedCache {
        Arc::new(RwLock::new(self))
    }

    pub fn max_keys(&self) -> usize {
        self.max_keys
    }

    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    fn fingerprint(&self, key: &CacheKey) -> Option<Fingerprint> {
        let fingerprint = key.fingerprint_with(self.policy);
        if fingerprint.is_none() {
            debug!(kind = %key.kind, "Key holds non-finite numbers, not cacheable");
        }
        fingerprint
    }

    // == Get ==
    /// Returns an owned copy of the stored value.
    ///
    /// Expired entries are removed and reported as misses.
    pub fn get_value(&mut self, key: &CacheKey) -> Option<Value> {
        let Some(fingerprint) = self.fingerprint(key) else {
            self.stats.record_miss();
            return None;
        };

        match self.live_entry(&fingerprint) {
            Some(entry) => {
                let value = entry.value.clone();
                self.stats.record_hit();
                debug!(kind = %key.kind, key = %fingerprint.short(), "Cache hit");
                Some(value)
            }
            None => {
                self.stats.record_miss();
                debug!(kind = %key.kind, key = %fingerprint.short(), "Cache miss");
                None
            }
        }
    }

    /// Typed lookup. A stored value that does not deserialize into `T` is
    /// treated as a miss.
    pub fn get<T: DeserializeOwned>(&mut self, key: &CacheKey) -> Option<T> {
        let value = self.get_value(key)?;
        match serde_json::from_value(value) {
            Ok(typed) => Some(typed),
            Err(e) => {
                warn!(kind = %key.kind, error = %e, "Cached value has unexpected shape");
                self.stats.hits = self.stats.hits.saturating_sub(1);
                self.stats.record_miss();
                None
            }
        }
    }

    /// Returns true if a live entry exists, without touching counters.
    pub fn contains(&self, key: &CacheKey) -> bool {
        let now = current_timestamp_ms();
        self.fingerprint(key)
            .and_then(|fp| self.entries.get(&fp))
            .is_some_and(|entry| !entry.is_expired_at(now))
    }

    /// Looks up a live entry, dropping it first if it has expired.
    fn live_entry(&mut self, fingerprint: &Fingerprint) -> Option<&CacheEntry> {
        let expired = self.entries.get(fingerprint)?.is_expired();
        if expired {
            self.remove_entry(fingerprint);
            self.stats.record_expiration();
            return None;
        }
        self.entries.get(fingerprint)
    }

    // == Set ==
    /// Stores `value` under `key` with the default TTL.
    ///
    /// Overwrites any existing entry and restarts its TTL. If the value cannot
    /// be serialized the write is skipped.
    pub fn set<T: Serialize + ?Sized>(&mut self, key: &CacheKey, value: &T) {
        let ttl = self.default_ttl;
        self.set_with_ttl(key, value, ttl);
    }

    /// Stores `value` under `key` with an explicit TTL (zero = no expiry).
    pub fn set_with_ttl<T: Serialize + ?Sized>(&mut self, key: &CacheKey, value: &T, ttl: Duration) {
        let Some(fingerprint) = self.fingerprint(key) else {
            return;
        };

        let value = match serde_json::to_value(value) {
            Ok(value) => value,
            Err(e) => {
                warn!(kind = %key.kind, error = %e, "Value not serializable, skipping cache write");
                return;
            }
        };

        debug!(kind = %key.kind, key = %fingerprint.short(), ttl_ms = duration_ms(ttl), "Cache set");
        self.insert(fingerprint, value, ttl);
    }

    fn insert(&mut self, fingerprint: Fingerprint, value: Value, ttl: Duration) {
        let size_bytes = value.to_string().len();
        let entry = CacheEntry::new(value, size_bytes, Some(ttl));

        if let Some(old) = self.entries.get_mut(&fingerprint) {
            self.stats.replace_value(old.size_bytes, size_bytes);
            *old = entry;
            self.order.push(&fingerprint);
            return;
        }

        if self.entries.len() >= self.max_keys {
            self.make_room();
        }

        self.stats.add_entry(fingerprint.len(), size_bytes);
        self.order.push(&fingerprint);
        self.entries.insert(fingerprint, entry);
    }

    /// Frees one slot: expired entries go first, then the oldest insertion.
    fn make_room(&mut self) {
        if self.cleanup_expired() > 0 && self.entries.len() < self.max_keys {
            return;
        }

        while self.entries.len() >= self.max_keys {
            let Some(oldest) = self.order.pop_oldest() else {
                break;
            };
            if self.remove_entry(&oldest).is_some() {
                self.stats.record_eviction();
                debug!(key = %oldest.short(), "Evicted oldest entry");
            }
        }
    }

    // == Invalidate ==
    /// Removes the entry for `key`. Returns true if something was removed.
    pub fn invalidate(&mut self, key: &CacheKey) -> bool {
        let Some(fingerprint) = self.fingerprint(key) else {
            return false;
        };
        let removed = self.remove_entry(&fingerprint).is_some();
        if removed {
            debug!(kind = %key.kind, key = %fingerprint.short(), "Cache entry invalidated");
        }
        removed
    }

    // == Clear ==
    /// Removes every entry and resets all counters. Returns the number of
    /// entries removed.
    pub fn clear(&mut self) -> usize {
        let removed = self.entries.len();
        self.entries.clear();
        self.order.clear();
        self.stats = CacheStats::new();
        info!(removed, "Cache cleared");
        removed
    }

    // == Stats ==
    pub fn stats(&self) -> CacheStats {
        self.stats.clone()
    }

    // == Cleanup Expired ==
    /// Removes all expired entries. Returns the number removed.
    pub fn cleanup_expired(&mut self) -> usize {
        self.sweep_expired(usize::MAX)
    }

    /// Removes at most `limit` expired entries. Returns the number removed.
    pub fn sweep_expired(&mut self, limit: usize) -> usize {
        let now = current_timestamp_ms();
        let expired: Vec<Fingerprint> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_expired_at(now))
            .map(|(fp, _)| fp.clone())
            .take(limit)
            .collect();

        for fingerprint in &expired {
            self.remove_entry(fingerprint);
            self.stats.record_expiration();
        }
        expired.len()
    }

    fn remove_entry(&mut self, fingerprint: &Fingerprint) -> Option<CacheEntry> {
        let entry = self.entries.remove(fingerprint)?;
        self.order.remove(fingerprint);
        self.stats.remove_entry(fingerprint.len(), entry.size_bytes);
        Some(entry)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
