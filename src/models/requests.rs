//! Request DTOs for the admin API
//!
//! Lookup and invalidation take a bare `CacheKey` body; only writes need a
//! dedicated request type.

use serde::Deserialize;
use serde_json::Value;

use crate::cache::{CacheKey, Criteria};

/// Maximum accepted length of a `kind` tag in bytes
pub const MAX_KIND_LENGTH: usize = 64;

/// Request body for `PUT /cache`
#[derive(Debug, Clone, Deserialize)]
pub struct SetRequest {
    /// Request kind tag
    pub kind: String,
    /// Request criteria
    #[serde(default)]
    pub criteria: Criteria,
    /// Result to store
    pub value: Value,
    /// Optional TTL in seconds (uses the cache default if not specified)
    #[serde(default)]
    pub ttl: Option<u64>,
}

impl SetRequest {
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        validate_kind(&self.kind)
    }

    pub fn key(&self) -> CacheKey {
        CacheKey::new(self.kind.clone(), self.criteria.clone())
    }
}

/// Validates a key received over HTTP.
pub fn validate_key(key: &CacheKey) -> Option<String> {
    validate_kind(&key.kind)
}

fn validate_kind(kind: &str) -> Option<String> {
    if kind.trim().is_empty() {
        return Some("Kind cannot be empty".to_string());
    }
    if kind.len() > MAX_KIND_LENGTH {
        return Some(format!(
            "Kind exceeds maximum length of {} characters",
            MAX_KIND_LENGTH
        ));
    }
    None
}
