//! Memoized text generation.

use serde_json::Value;
use tracing::debug;

use crate::cache::{CacheKey, Criteria, SharedCache};
use crate::error::UpstreamError;
use crate::upstream::{RequestKind, TextGenerator};

/// Routes text-generation requests through the fingerprint cache.
///
/// Results are cached with the cache's default TTL. Failed generations are
/// returned unchanged and leave the cache untouched.
pub struct CachedGenerator<G> {
    generator: G,
    cache: SharedCache,
}

impl<G: TextGenerator> CachedGenerator<G> {
    pub fn new(generator: G, cache: SharedCache) -> Self {
        Self { generator, cache }
    }

    pub fn cache(&self) -> &SharedCache {
        &self.cache
    }

    pub fn inner(&self) -> &G {
        &self.generator
    }

    /// Returns the cached result for `(kind, criteria)` or generates and
    /// caches a fresh one.
    pub async fn generate(&self, kind: RequestKind, criteria: &Criteria) -> Result<Value, UpstreamError> {
        let key = CacheKey::new(kind.as_str(), criteria.clone());

        let cached = self.cache.write().await.get_value(&key);
        if let Some(value) = cached {
            return Ok(value);
        }

        debug!(kind = %kind, "Generating upstream result");
        let value = self.generator.generate(kind, criteria).await?;
        self.cache.write().await.set(&key, &value);
        Ok(value)
    }

    pub async fn playlist(&self, criteria: &Criteria) -> Result<Value, UpstreamError> {
        self.generate(RequestKind::Playlist, criteria).await
    }

    pub async fn song_analysis(&self, criteria: &Criteria) -> Result<Value, UpstreamError> {
        self.generate(RequestKind::SongAnalysis, criteria).await
    }

    pub async fn similar_artists(&self, criteria: &Criteria) -> Result<Value, UpstreamError> {
        self.generate(RequestKind::SimilarArtists, criteria).await
    }

    pub async fn trend(&self, criteria: &Criteria) -> Result<Value, UpstreamError> {
        self.generate(RequestKind::Trend, criteria).await
    }

    pub async fn user_taste_analysis(&self, criteria: &Criteria) -> Result<Value, UpstreamError> {
        self.generate(RequestKind::UserTasteAnalysis, criteria).await
    }

    /// Drops the cached result for `(kind, criteria)`, forcing the next call
    /// to regenerate.
    pub async fn invalidate(&self, kind: RequestKind, criteria: &Criteria) -> bool {
        let key = CacheKey::new(kind.as_str(), criteria.clone());
        self.cache.write().await.invalidate(&key)
    }
}
