//! Response DTOs for the diagnostics API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;

/// Response body for PUT /payload/:key
#[derive(Debug, Clone, Serialize)]
pub struct SetResponse {
    /// Status message
    pub message: String,
    /// The key that was written
    pub key: String,
    /// Payload size in bytes
    pub size: usize,
    /// False when the payload was empty and therefore not cached
    pub stored: bool,
}

impl SetResponse {
    pub fn new(key: impl Into<String>, size: usize) -> Self {
        let key = key.into();
        let stored = size > 0;
        let message = if stored {
            format!("Key '{}' cached ({} bytes)", key, size)
        } else {
            format!("Key '{}' ignored: empty payload", key)
        };
        Self {
            message,
            key,
            size,
            stored,
        }
    }
}

/// Response body for DELETE /payload/:key
#[derive(Debug, Clone, Serialize)]
pub struct DeleteResponse {
    /// The key that was targeted
    pub key: String,
    /// Whether an entry was actually removed
    pub removed: bool,
}

impl DeleteResponse {
    pub fn new(key: impl Into<String>, removed: bool) -> Self {
        Self {
            key: key.into(),
            removed,
        }
    }
}

/// Response body for DELETE /payload
#[derive(Debug, Clone, Serialize)]
pub struct ClearResponse {
    /// Number of entries dropped
    pub cleared: usize,
}

/// Response body for POST /cleanup
#[derive(Debug, Clone, Serialize)]
pub struct CleanupResponse {
    /// Number of expired entries removed
    pub removed: usize,
}

/// Response body for POST /shrink
#[derive(Debug, Clone, Serialize)]
pub struct ShrinkResponse {
    /// Number of entries evicted
    pub evicted: usize,
    /// Bytes held after shrinking
    pub total_bytes: usize,
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Error response body for all error conditions
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Error message describing what went wrong
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
