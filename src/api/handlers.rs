//! API Handlers
//!
//! HTTP request handlers for the cache admin endpoints.

use std::time::Duration;

use axum::{extract::State, Json};

use crate::cache::{CacheKey, FingerprintCache, SharedCache};
use crate::config::Config;
use crate::error::{CacheError, Result};
use crate::models::{
    validate_key, ClearResponse, GetResponse, HealthResponse, InvalidateResponse, SetRequest,
    SetResponse, StatsResponse,
};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Shared fingerprint cache
    pub cache: SharedCache,
}

impl AppState {
    pub fn new(cache: FingerprintCache) -> Self {
        Self {
            cache: cache.into_shared(),
        }
    }

    /// Wraps an already shared cache, e.g. one also used by the memoizing
    /// wrappers.
    pub fn from_shared(cache: SharedCache) -> Self {
        Self { cache }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(FingerprintCache::from_config(config))
    }
}

/// Handler for POST /cache/lookup
pub async fn lookup_handler(
    State(state): State<AppState>,
    Json(key): Json<CacheKey>,
) -> Result<Json<GetResponse>> {
    if let Some(error_msg) = validate_key(&key) {
        return Err(CacheError::InvalidRequest(error_msg));
    }

    let fingerprint = key.fingerprint();
    // Write lock: lookups update counters and drop expired entries
    let value = state.cache.write().await.get_value(&key);

    match value {
        Some(value) => Ok(Json(GetResponse::new(fingerprint.as_str(), value))),
        None => Err(CacheError::NotFound(fingerprint.to_string())),
    }
}

/// Handler for PUT /cache
pub async fn set_handler(
    State(state): State<AppState>,
    Json(req): Json<SetRequest>,
) -> Result<Json<SetResponse>> {
    if let Some(error_msg) = req.validate() {
        return Err(CacheError::InvalidRequest(error_msg));
    }

    let key = req.key();
    let fingerprint = key.fingerprint();

    let mut cache = state.cache.write().await;
    match req.ttl {
        Some(ttl) => cache.set_with_ttl(&key, &req.value, Duration::from_secs(ttl)),
        None => cache.set(&key, &req.value),
    }

    Ok(Json(SetResponse::new(fingerprint.as_str())))
}

/// Handler for POST /cache/invalidate
///
/// Invalidating a missing key is not an error.
pub async fn invalidate_handler(
    State(state): State<AppState>,
    Json(key): Json<CacheKey>,
) -> Result<Json<InvalidateResponse>> {
    if let Some(error_msg) = validate_key(&key) {
        return Err(CacheError::InvalidRequest(error_msg));
    }

    let fingerprint = key.fingerprint();
    let removed = state.cache.write().await.invalidate(&key);

    Ok(Json(InvalidateResponse::new(fingerprint.as_str(), removed)))
}

/// Handler for DELETE /cache
pub async fn clear_handler(State(state): State<AppState>) -> Json<ClearResponse> {
    let removed = state.cache.write().await.clear();
    Json(ClearResponse::new(removed))
}

/// Handler for GET /stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    let stats = state.cache.read().await.stats();
    Json(StatsResponse::from(stats))
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::Criteria;
    use serde_json::json;

    fn test_state() -> AppState {
        AppState::new(FingerprintCache::new(100, Duration::from_secs(300)))
    }

    fn set_request(kind: &str, criteria: Criteria) -> SetRequest {
        SetRequest {
            kind: kind.to_string(),
            criteria,
            value: json!({"songs": ["Song A"]}),
            ttl: None,
        }
    }

    #[tokio::test]
    async fn test_set_and_lookup_handler() {
        let state = test_state();
        let criteria = Criteria::new().with("genres", vec!["rock", "indie"]);

        let result = set_handler(State(state.clone()), Json(set_request("playlist", criteria))).await;
        assert!(result.is_ok());

        let reordered = CacheKey::new("playlist", Criteria::new().with("genres", vec!["indie", "rock"]));
        let response = lookup_handler(State(state), Json(reordered)).await.unwrap();
        assert_eq!(response.value, json!({"songs": ["Song A"]}));
        assert_eq!(response.fingerprint.len(), 64);
    }

    #[tokio::test]
    async fn test_lookup_missing_key() {
        let state = test_state();
        let result = lookup_handler(State(state), Json(CacheKey::new("trend", Criteria::new()))).await;
        assert!(matches!(result, Err(CacheError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_invalidate_handler() {
        let state = test_state();
        let criteria = Criteria::new().with("mood", "calm");
        set_handler(State(state.clone()), Json(set_request("playlist", criteria.clone())))
            .await
            .unwrap();

        let key = CacheKey::new("playlist", criteria);
        let response = invalidate_handler(State(state.clone()), Json(key.clone())).await.unwrap();
        assert!(response.removed);

        let response = invalidate_handler(State(state.clone()), Json(key.clone())).await.unwrap();
        assert!(!response.removed);

        assert!(lookup_handler(State(state), Json(key)).await.is_err());
    }

    #[tokio::test]
    async fn test_clear_handler() {
        let state = test_state();
        set_handler(State(state.clone()), Json(set_request("trend", Criteria::new())))
            .await
            .unwrap();

        let response = clear_handler(State(state.clone())).await;
        assert_eq!(response.removed, 1);
        assert_eq!(stats_handler(State(state)).await.entry_count, 0);
    }

    #[tokio::test]
    async fn test_stats_handler() {
        let response = stats_handler(State(test_state())).await;
        assert_eq!(response.hits, 0);
        assert_eq!(response.misses, 0);
    }

    #[tokio::test]
    async fn test_health_handler() {
        let response = health_handler().await;
        assert_eq!(response.status, "healthy");
    }

    #[tokio::test]
    async fn test_set_invalid_request() {
        let result = set_handler(State(test_state()), Json(set_request("", Criteria::new()))).await;
        assert!(matches!(result, Err(CacheError::InvalidRequest(_))));
    }
}
