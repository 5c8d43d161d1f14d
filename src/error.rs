//! Error types for the cache crate
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::models::ErrorResponse;

// == Cache Error Enum ==
/// Unified error type for the caches and the diagnostics server.
///
/// Misses and expiry are not errors; the only failure a cache signals is
/// `PayloadTooLarge`.
#[derive(Error, Debug)]
pub enum CacheError {
    /// A single payload exceeds the byte cache's total ceiling
    #[error("Payload of {size} bytes exceeds the cache limit of {max} bytes")]
    PayloadTooLarge { size: usize, max: usize },

    /// Key not present (HTTP surface only)
    #[error("Key not found: {0}")]
    NotFound(String),

    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

// == IntoResponse Implementation ==
impl IntoResponse for CacheError {
    fn into_response(self) -> Response {
        let status = match &self {
            CacheError::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            CacheError::NotFound(_) => StatusCode::NOT_FOUND,
            CacheError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
        };

        let body = Json(ErrorResponse::new(self.to_string()));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the cache crate.
pub type Result<T> = std::result::Result<T, CacheError>;
