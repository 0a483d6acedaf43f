//! API Routes
//!
//! Configures the Axum router with the cache admin endpoints.

use axum::{
    routing::{get, post, put},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    clear_handler, health_handler, invalidate_handler, lookup_handler, set_handler,
    stats_handler, AppState,
};

/// Creates the admin router.
///
/// # Endpoints
/// - `POST /cache/lookup` - Look up a value by logical key
/// - `PUT /cache` - Store a value under a logical key
/// - `POST /cache/invalidate` - Remove the entry for a logical key
/// - `DELETE /cache` - Remove every entry and reset counters
/// - `GET /stats` - Cache statistics
/// - `GET /health` - Health check
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/cache", put(set_handler).delete(clear_handler))
        .route("/cache/lookup", post(lookup_handler))
        .route("/cache/invalidate", post(invalidate_handler))
        .route("/stats", get(stats_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
