//! Upstream Module
//!
//! Narrow interfaces to the text-generation and streaming-platform services,
//! and memoizing wrappers that route their calls through the fingerprint
//! cache.
//!
//! The wrappers follow "check cache, else fetch, then populate". The cache
//! lock is not held across the fetch, so concurrent callers with the same key
//! may both reach the upstream service; no in-flight de-duplication is done.

mod generator;
mod retry;
mod tracks;

use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::cache::Criteria;
use crate::error::UpstreamError;

pub use generator::CachedGenerator;
pub use retry::RetryPolicy;
pub use tracks::CachedTracks;

// == Request Kind ==
/// Kind of text-generation request; doubles as the cache key's `kind` tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestKind {
    Playlist,
    SongAnalysis,
    SimilarArtists,
    Trend,
    UserTasteAnalysis,
}

impl RequestKind {
    pub const ALL: [RequestKind; 5] = [
        RequestKind::Playlist,
        RequestKind::SongAnalysis,
        RequestKind::SimilarArtists,
        RequestKind::Trend,
        RequestKind::UserTasteAnalysis,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RequestKind::Playlist => "playlist",
            RequestKind::SongAnalysis => "song_analysis",
            RequestKind::SimilarArtists => "similar_artists",
            RequestKind::Trend => "trend",
            RequestKind::UserTasteAnalysis => "user_taste_analysis",
        }
    }
}

impl fmt::Display for RequestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RequestKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RequestKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| format!("unknown request kind '{}'", s))
    }
}

// == Collaborators ==
/// Text-generation service: turns request criteria into a structured result
/// (song list, per-song feature analysis, trend summary, ...).
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, kind: RequestKind, criteria: &Criteria) -> Result<Value, UpstreamError>;
}

/// Streaming-platform service. Only the calls the cache memoizes or needs for
/// re-authentication are modelled here.
#[async_trait]
pub trait StreamingPlatform: Send + Sync {
    /// Audio features (tempo, energy, valence, ...) for one track.
    async fn audio_features(&self, track_id: &str) -> Result<Value, UpstreamError>;

    /// Exchanges the stored refresh token for a new access token.
    async fn refresh_access_token(&self) -> Result<(), UpstreamError>;
}
