//! Cache Statistics Module
//!
//! Tracks hit/miss counters and approximate memory footprint.

use serde::Serialize;

// == Cache Stats ==
/// Cache counters since construction or the last `clear()`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CacheStats {
    /// Lookups that returned a live entry
    pub hits: u64,
    /// Lookups that found nothing, found an expired entry, or had an unusable key
    pub misses: u64,
    /// Entries removed to respect `max_keys`
    pub evictions: u64,
    /// Entries removed because their TTL elapsed
    pub expirations: u64,
    /// Current number of entries
    pub entry_count: usize,
    /// Sum of physical key lengths
    pub approx_key_bytes: usize,
    /// Sum of serialized value sizes
    pub approx_value_bytes: usize,
}

impl CacheStats {
    pub fn new() -> Self {
        Self::default()
    }

    // == Hit Rate ==
    /// Returns hits / (hits + misses), or 0.0 if no lookups have been made.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    pub fn record_eviction(&mut self) {
        self.evictions += 1;
    }

    pub fn record_expiration(&mut self) {
        self.expirations += 1;
    }

    // == Footprint ==
    /// Accounts for a newly stored entry.
    pub fn add_entry(&mut self, key_bytes: usize, value_bytes: usize) {
        self.entry_count += 1;
        self.approx_key_bytes += key_bytes;
        self.approx_value_bytes += value_bytes;
    }

    /// Accounts for a removed entry.
    pub fn remove_entry(&mut self, key_bytes: usize, value_bytes: usize) {
        self.entry_count = self.entry_count.saturating_sub(1);
        self.approx_key_bytes = self.approx_key_bytes.saturating_sub(key_bytes);
        self.approx_value_bytes = self.approx_value_bytes.saturating_sub(value_bytes);
    }

    /// Accounts for an overwrite that replaced a value in place.
    pub fn replace_value(&mut self, old_bytes: usize, new_bytes: usize) {
        self.approx_value_bytes = self.approx_value_bytes.saturating_sub(old_bytes) + new_bytes;
    }
}
