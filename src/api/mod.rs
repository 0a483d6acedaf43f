//! API Module
//!
//! HTTP admin surface for inspecting and managing a running cache.
//!
//! # Endpoints
//! - `POST /cache/lookup` - Look up a value by logical key
//! - `PUT /cache` - Store a value under a logical key
//! - `POST /cache/invalidate` - Remove the entry for a logical key
//! - `DELETE /cache` - Clear the cache
//! - `GET /stats` - Cache statistics
//! - `GET /health` - Health check

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
