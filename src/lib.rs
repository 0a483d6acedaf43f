//! Playlist Cache - request-fingerprint cache for playlist generation
//!
//! Memoizes text-generation and streaming-platform calls behind a cache keyed
//! by the normalized content of each request, so requests that differ only in
//! field or array order share one entry.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod tasks;
pub mod upstream;

pub use api::AppState;
pub use cache::{CacheKey, Criteria, FingerprintCache, SharedCache};
pub use config::Config;
pub use tasks::spawn_cleanup_task;
pub use upstream::{CachedGenerator, CachedTracks, RequestKind};
