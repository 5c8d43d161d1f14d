//! Logcard Cache - bounded caches for resolved image payloads
//!
//! Provides a TTL-aware LRU cache, a byte-bounded payload cache built on it,
//! and a small HTTP diagnostics server around a shared instance.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod tasks;

pub use api::AppState;
pub use cache::{BoundedByteCache, CachedResolver, PayloadSource, TimedLruCache};
pub use config::Config;
pub use error::CacheError;
pub use tasks::spawn_cleanup_task;
