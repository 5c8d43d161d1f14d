//! API Routes
//!
//! Configures the Axum router with all diagnostics endpoints.

use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, post, put},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    cleanup_handler, clear_handler, delete_handler, get_handler, health_handler, set_handler,
    shrink_handler, stats_handler, AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `PUT /payload/:key` - Cache a raw payload
/// - `GET /payload/:key` - Fetch a cached payload
/// - `DELETE /payload/:key` - Remove a payload
/// - `DELETE /payload` - Clear the cache
/// - `POST /cleanup` - Remove expired payloads
/// - `POST /shrink` - Evict down to a byte target
/// - `GET /stats` - Cache statistics
/// - `GET /health` - Health check endpoint
///
/// # Middleware
/// - Body limit: one byte past the cache ceiling, so the cache reports the rejection
/// - CORS: Allows any origin
/// - Tracing: Logs all requests
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let body_limit = DefaultBodyLimit::max(state.max_payload_bytes.saturating_add(1));

    Router::new()
        .route(
            "/payload/:key",
            put(set_handler).get(get_handler).delete(delete_handler),
        )
        .route("/payload", delete(clear_handler))
        .route("/cleanup", post(cleanup_handler))
        .route("/shrink", post(shrink_handler))
        .route("/stats", get(stats_handler))
        .route("/health", get(health_handler))
        .layer(body_limit)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
