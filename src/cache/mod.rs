//! Cache Module
//!
//! Bounded in-memory caches with lazy TTL expiry and LRU eviction, plus the
//! resolver that memoizes resolved image payloads through them.

mod byte_cache;
mod clock;
mod entry;
mod fault;
mod lru;
mod resolver;
mod stats;
mod timed;

#[cfg(test)]
mod property_tests;

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;

// Re-export public types
pub use byte_cache::{BoundedByteCache, Payload};
pub use clock::{Clock, MockClock, SystemClock};
pub use entry::CacheEntry;
pub use fault::{FaultReporter, NullFaultReporter, TracingFaultReporter};
pub use lru::LruTracker;
pub use resolver::{CachedResolver, PayloadSource};
pub use stats::{AgeSummary, ByteCacheStats, CacheCounters, CacheStats};
pub use timed::TimedLruCache;

/// Byte cache shared between request handlers and the maintenance task.
pub type SharedByteCache = Arc<RwLock<BoundedByteCache>>;

// == Public Constants ==
/// Default entry bound of a [`TimedLruCache`]
pub const DEFAULT_MAX_ENTRIES: usize = 100;

/// Default age bound of a [`TimedLruCache`]
pub const DEFAULT_MAX_AGE: Duration = Duration::from_secs(3600);

/// Default entry bound of a [`BoundedByteCache`]
pub const DEFAULT_BYTE_MAX_ENTRIES: usize = 50;

/// Default age bound of a [`BoundedByteCache`]
pub const DEFAULT_BYTE_MAX_AGE: Duration = Duration::from_secs(24 * 3600);

/// Default byte ceiling of a [`BoundedByteCache`]
pub const DEFAULT_MAX_TOTAL_BYTES: usize = 100 * 1024 * 1024; // 100 MiB

/// Maximum allowed key length in bytes
pub const MAX_KEY_LENGTH: usize = 256;

/// Wraps a byte cache for shared use.
pub fn shared(cache: BoundedByteCache) -> SharedByteCache {
    Arc::new(RwLock::new(cache))
}
