//! API Handlers
//!
//! HTTP request handlers for the cache diagnostics endpoints.

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use tracing::debug;

use crate::cache::{shared, BoundedByteCache, ByteCacheStats, SharedByteCache};
use crate::config::Config;
use crate::error::{CacheError, Result};
use crate::models::{
    validate_key, CleanupResponse, ClearResponse, DeleteResponse, HealthResponse, SetResponse,
    ShrinkRequest, ShrinkResponse,
};

/// Application state shared across all handlers.
///
/// Contains the byte cache wrapped in Arc<RwLock<>> for thread-safe access.
#[derive(Clone)]
pub struct AppState {
    /// Thread-safe payload cache
    pub cache: SharedByteCache,
    /// Byte ceiling of the cache, used to size the request body limit
    pub max_payload_bytes: usize,
}

impl AppState {
    /// Creates a new AppState around the given cache.
    pub fn new(cache: BoundedByteCache) -> Self {
        let max_payload_bytes = cache.max_total_bytes();
        Self {
            cache: shared(cache),
            max_payload_bytes,
        }
    }

    /// Creates a new AppState from configuration.
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.build_cache())
    }
}

/// Handler for PUT /payload/:key
///
/// Caches the raw request body under `key`.
pub async fn set_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
    body: Bytes,
) -> Result<Json<SetResponse>> {
    if let Some(error_msg) = validate_key(&key) {
        return Err(CacheError::InvalidRequest(error_msg));
    }

    let size = body.len();
    let mut cache = state.cache.write().await;
    cache.set(key.clone(), body.to_vec())?;

    Ok(Json(SetResponse::new(key, size)))
}

/// Handler for GET /payload/:key
///
/// Returns the cached payload as `application/octet-stream`.
pub async fn get_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Response> {
    // Write lock: a hit refreshes recency, an expired entry is removed
    let payload = state.cache.write().await.get(key.as_str());

    match payload {
        Some(payload) => Ok((
            [(header::CONTENT_TYPE, "application/octet-stream")],
            Bytes::from_owner(payload),
        )
            .into_response()),
        None => Err(CacheError::NotFound(key)),
    }
}

/// Handler for DELETE /payload/:key
///
/// Removing an absent key succeeds with `removed: false`.
pub async fn delete_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Json<DeleteResponse> {
    let removed = state.cache.write().await.remove(key.as_str());
    Json(DeleteResponse::new(key, removed))
}

/// Handler for DELETE /payload
pub async fn clear_handler(State(state): State<AppState>) -> Json<ClearResponse> {
    let mut cache = state.cache.write().await;
    let cleared = cache.len();
    cache.clear();

    debug!(cleared, "Cache cleared");
    Json(ClearResponse { cleared })
}

/// Handler for POST /cleanup
pub async fn cleanup_handler(State(state): State<AppState>) -> Json<CleanupResponse> {
    let removed = state.cache.write().await.cleanup_expired();
    Json(CleanupResponse { removed })
}

/// Handler for POST /shrink
pub async fn shrink_handler(
    State(state): State<AppState>,
    Json(req): Json<ShrinkRequest>,
) -> Json<ShrinkResponse> {
    let mut cache = state.cache.write().await;
    let evicted = cache.shrink_to(req.target_bytes);

    Json(ShrinkResponse {
        evicted,
        total_bytes: cache.total_bytes(),
    })
}

/// Handler for GET /stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<ByteCacheStats> {
    // Read lock: stats never mutate the cache
    let cache = state.cache.read().await;
    Json(cache.get_stats())
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
