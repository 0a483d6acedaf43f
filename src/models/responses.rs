//! Response DTOs for the admin API

use serde::Serialize;
use serde_json::Value;

use crate::cache::CacheStats;

/// Response body for `POST /cache/lookup`
#[derive(Debug, Clone, Serialize)]
pub struct GetResponse {
    /// Physical key the value was found under
    pub fingerprint: String,
    /// The cached result
    pub value: Value,
}

impl GetResponse {
    pub fn new(fingerprint: impl Into<String>, value: Value) -> Self {
        Self {
            fingerprint: fingerprint.into(),
            value,
        }
    }
}

/// Response body for `PUT /cache`
#[derive(Debug, Clone, Serialize)]
pub struct SetResponse {
    pub message: String,
    pub fingerprint: String,
}

impl SetResponse {
    pub fn new(fingerprint: impl Into<String>) -> Self {
        let fingerprint = fingerprint.into();
        Self {
            message: format!("Entry '{}' stored successfully", fingerprint),
            fingerprint,
        }
    }
}

/// Response body for `POST /cache/invalidate`
#[derive(Debug, Clone, Serialize)]
pub struct InvalidateResponse {
    pub message: String,
    pub fingerprint: String,
    /// Whether an entry existed and was removed
    pub removed: bool,
}

impl InvalidateResponse {
    pub fn new(fingerprint: impl Into<String>, removed: bool) -> Self {
        let fingerprint = fingerprint.into();
        let message = if removed {
            format!("Entry '{}' invalidated", fingerprint)
        } else {
            format!("No entry for '{}'", fingerprint)
        };
        Self {
            message,
            fingerprint,
            removed,
        }
    }
}

/// Response body for `DELETE /cache`
#[derive(Debug, Clone, Serialize)]
pub struct ClearResponse {
    pub message: String,
    /// Number of entries removed
    pub removed: usize,
}

impl ClearResponse {
    pub fn new(removed: usize) -> Self {
        Self {
            message: format!("Cache cleared, {} entries removed", removed),
            removed,
        }
    }
}

/// Response body for `GET /stats`
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
    pub expirations: u64,
    pub entry_count: usize,
    pub approx_key_bytes: usize,
    pub approx_value_bytes: usize,
    /// hits / (hits + misses)
    pub hit_rate: f64,
}

impl From<CacheStats> for StatsResponse {
    fn from(stats: CacheStats) -> Self {
        Self {
            hit_rate: stats.hit_rate(),
            hits: stats.hits,
            misses: stats.misses,
            evictions: stats.evictions,
            expirations: stats.expirations,
            entry_count: stats.entry_count,
            approx_key_bytes: stats.approx_key_bytes,
            approx_value_bytes: stats.approx_value_bytes,
        }
    }
}

/// Response body for `GET /health`
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}
