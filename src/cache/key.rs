//! Cache Key Module
//!
//! Tagged request descriptor: a `kind` plus the request's criteria.

use serde::{Deserialize, Serialize};

use crate::cache::fingerprint::{canonical_string, Fingerprint, NonFinitePolicy};
use crate::cache::Criteria;

/// Kind tag used for per-track audio feature lookups.
pub const AUDIO_FEATURES_KIND: &str = "audio_features";

// == Cache Key ==
/// Logical cache key. Two keys are equivalent when their kinds are equal and
/// their criteria normalize to the same structure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheKey {
    /// Request kind, e.g. `playlist` or `song_analysis`
    pub kind: String,
    /// Request parameters
    #[serde(default)]
    pub criteria: Criteria,
}

impl CacheKey {
    pub fn new(kind: impl Into<String>, criteria: Criteria) -> Self {
        Self {
            kind: kind.into(),
            criteria,
        }
    }

    /// Key for a single track's audio features.
    pub fn track(track_id: impl Into<String>) -> Self {
        Self::new(
            AUDIO_FEATURES_KIND,
            Criteria::new().with("track_id", track_id.into()),
        )
    }

    /// Canonical encoding with non-finite numbers treated as opaque scalars.
    pub fn canonical(&self) -> String {
        // Opaque policy never refuses
        canonical_string(&self.kind, &self.criteria, NonFinitePolicy::Opaque).unwrap_or_default()
    }

    /// Physical lookup key with non-finite numbers treated as opaque scalars.
    pub fn fingerprint(&self) -> Fingerprint {
        Fingerprint::of_canonical(&self.canonical())
    }

    /// Physical lookup key under the given policy.
    pub fn fingerprint_with(&self, policy: NonFinitePolicy) -> Option<Fingerprint> {
        canonical_string(&self.kind, &self.criteria, policy)
            .map(|canonical| Fingerprint::of_canonical(&canonical))
    }
}
