//! Request DTOs for the diagnostics API
//!
//! Defines incoming request bodies and key validation.

use serde::Deserialize;

use crate::cache::MAX_KEY_LENGTH;

/// Request body for POST /shrink
#[derive(Debug, Clone, Deserialize)]
pub struct ShrinkRequest {
    /// Evict least recently used payloads until at most this many bytes remain
    pub target_bytes: usize,
}

/// Validates a payload key taken from the request path.
///
/// Returns an error message if validation fails, None if valid.
pub fn validate_key(key: &str) -> Option<String> {
    if key.is_empty() {
        return Some("Key cannot be empty".to_string());
    }
    if key.len() > MAX_KEY_LENGTH {
        return Some(format!(
            "Key exceeds maximum length of {} bytes",
            MAX_KEY_LENGTH
        ));
    }
    None
}
