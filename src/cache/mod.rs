//! Cache Module
//!
//! Request-fingerprint cache: criteria normalization, SHA-256 fingerprints,
//! TTL expiration and oldest-first eviction.

mod entry;
mod fingerprint;
mod key;
mod order;
mod stats;
mod store;
mod value;


// Re-export public types
pub use entry::{duration_ms, CacheEntry};
pub use fingerprint::{canonical_string, normalize, normalize_value, Fingerprint, NonFinitePolicy};
pub use key::{CacheKey, AUDIO_FEATURES_KIND};
pub use order::InsertionOrder;
pub use stats::CacheStats;
pub use store::{FingerprintCache, SharedCache};
pub use value::{Criteria, CriteriaMap, CriteriaValue};
