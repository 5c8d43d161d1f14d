//! Bounded Byte Cache Module
//!
//! Binary payload cache that adds a total byte ceiling on top of the entry
//! count and age bounds of [`TimedLruCache`].

use std::borrow::Borrow;
use std::hash::Hash;
use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use crate::cache::timed::Lookup;
use crate::cache::{
    ByteCacheStats, CacheCounters, Clock, FaultReporter, SystemClock, TimedLruCache,
    DEFAULT_BYTE_MAX_AGE, DEFAULT_BYTE_MAX_ENTRIES, DEFAULT_MAX_TOTAL_BYTES,
};
use crate::error::{CacheError, Result};

/// Shared, immutable payload handed out on hits.
pub type Payload = Arc<[u8]>;

// == Bounded Byte Cache ==
/// Payload cache bounded by entry count, entry age and total bytes.
///
/// Invariant: `total_bytes` always equals the summed length of the stored
/// payloads and never exceeds `max_total_bytes`.
#[derive(Debug)]
pub struct BoundedByteCache<K = String, C = SystemClock> {
    inner: TimedLruCache<K, Payload, C>,
    /// Bytes currently stored
    total_bytes: usize,
    /// Byte ceiling across all payloads
    max_total_bytes: usize,
}

impl<K> BoundedByteCache<K, SystemClock>
where
    K: Eq + Hash + Clone,
{
    // == Constructor ==
    /// Creates a byte cache on the system clock.
    ///
    /// # Arguments
    /// * `max_entries` - Maximum number of payloads
    /// * `max_age` - Age after which a payload expires
    /// * `max_total_bytes` - Ceiling on the summed payload sizes
    pub fn new(max_entries: usize, max_age: Duration, max_total_bytes: usize) -> Self {
        Self::with_clock(max_entries, max_age, max_total_bytes, SystemClock)
    }
}

impl<K> Default for BoundedByteCache<K, SystemClock>
where
    K: Eq + Hash + Clone,
{
    fn default() -> Self {
        Self::new(
            DEFAULT_BYTE_MAX_ENTRIES,
            DEFAULT_BYTE_MAX_AGE,
            DEFAULT_MAX_TOTAL_BYTES,
        )
    }
}

impl<K, C> BoundedByteCache<K, C>
where
    K: Eq + Hash + Clone,
    C: Clock,
{
    pub fn with_clock(
        max_entries: usize,
        max_age: Duration,
        max_total_bytes: usize,
        clock: C,
    ) -> Self {
        Self {
            inner: TimedLruCache::with_clock(max_entries, max_age, clock),
            total_bytes: 0,
            max_total_bytes,
        }
    }

    pub fn with_fault_reporter(mut self, faults: Arc<dyn FaultReporter>) -> Self {
        self.inner = self.inner.with_fault_reporter(faults);
        self
    }

    // == Get ==
    /// Retrieves a payload and marks it most recently used.
    ///
    /// Expired payloads are dropped, their bytes released, and None returned.
    pub fn get<Q>(&mut self, key: &Q) -> Option<Payload>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        match self.inner.lookup(key) {
            Lookup::Hit(payload) => Some(payload),
            Lookup::Expired(entry) => {
                self.release(entry.value.len());
                None
            }
            Lookup::Miss => None,
        }
    }

    pub fn peek<Q>(&self, key: &Q) -> Option<&Payload>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.inner.peek(key)
    }

    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.inner.contains_key(key)
    }

    // == Set ==
    /// Stores a payload.
    ///
    /// - An empty payload is ignored.
    /// - A payload larger than `max_total_bytes` is rejected with
    ///   [`CacheError::PayloadTooLarge`] and the cache is left untouched.
    /// - Otherwise least recently used payloads are evicted until the new one
    ///   fits, regardless of their age, then the entry bound applies as usual.
    pub fn set(&mut self, key: K, payload: impl Into<Vec<u8>>) -> Result<()> {
        self.set_shared(key, Payload::from(payload.into()))
    }

    /// Same as [`set`](Self::set) for a payload the caller keeps a handle to.
    pub fn set_shared(&mut self, key: K, payload: Payload) -> Result<()> {
        let size = payload.len();

        if size == 0 {
            return Ok(());
        }
        if size > self.max_total_bytes {
            return Err(CacheError::PayloadTooLarge {
                size,
                max: self.max_total_bytes,
            });
        }

        if let Some(previous) = self.inner.take(&key) {
            self.release(previous.value.len());
        }
        self.make_room(size);

        for displaced in self.inner.insert(key, payload) {
            self.release(displaced.value.len());
        }
        self.total_bytes += size;

        Ok(())
    }

    /// Evicts LRU payloads until `size` more bytes fit under the ceiling.
    fn make_room(&mut self, size: usize) {
        while self.total_bytes + size > self.max_total_bytes {
            match self.inner.pop_lru() {
                Some((_, evicted)) => {
                    debug!(
                        freed = evicted.value.len(),
                        needed = size,
                        "Evicted payload under byte pressure"
                    );
                    self.release(evicted.value.len());
                }
                None => {
                    if self.total_bytes != 0 {
                        self.inner
                            .report_fault("set", "byte counter nonzero on an empty cache");
                        self.total_bytes = 0;
                    }
                    break;
                }
            }
        }
    }

    /// Subtracts freed bytes, recounting if the counter would underflow.
    fn release(&mut self, bytes: usize) {
        match self.total_bytes.checked_sub(bytes) {
            Some(remaining) => self.total_bytes = remaining,
            None => {
                self.inner
                    .report_fault("release", "byte counter underflow, recounting");
                self.total_bytes = self.stored_bytes();
            }
        }
    }

    // == Remove ==
    /// Removes a payload and releases its bytes. Absent keys are a no-op.
    pub fn remove<Q>(&mut self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        match self.inner.take(key) {
            Some(entry) => {
                self.release(entry.value.len());
                true
            }
            None => false,
        }
    }

    // == Clear ==
    pub fn clear(&mut self) {
        self.inner.clear();
        self.total_bytes = 0;
    }

    // == Cleanup Expired ==
    /// Removes every expired payload and releases its bytes.
    ///
    /// Returns the number of payloads removed.
    pub fn cleanup_expired(&mut self) -> usize {
        let drained = self.inner.drain_expired();
        for entry in &drained {
            self.release(entry.value.len());
        }

        if !drained.is_empty() {
            debug!(
                removed = drained.len(),
                total_bytes = self.total_bytes,
                "Removed expired payloads"
            );
        }
        drained.len()
    }

    // == Shrink ==
    /// Evicts least recently used payloads until at most `target_bytes` remain.
    ///
    /// Returns the number of payloads evicted.
    pub fn shrink_to(&mut self, target_bytes: usize) -> usize {
        let mut evicted = 0;
        while self.total_bytes > target_bytes {
            match self.inner.pop_lru() {
                Some((_, entry)) => {
                    self.release(entry.value.len());
                    evicted += 1;
                }
                None => break,
            }
        }
        evicted
    }

    // == Stats ==
    /// Returns a snapshot including byte usage. Never mutates state.
    pub fn get_stats(&self) -> ByteCacheStats {
        ByteCacheStats::new(
            self.inner.get_stats(),
            self.total_bytes,
            self.max_total_bytes,
            self.inner.age_summary(),
        )
    }

    /// Summed length of the stored payloads, computed from the entries.
    pub(crate) fn stored_bytes(&self) -> usize {
        self.inner.entries().map(|entry| entry.value.len()).sum()
    }

    // == Accessors ==
    pub fn total_bytes(&self) -> usize {
        self.total_bytes
    }

    pub fn max_total_bytes(&self) -> usize {
        self.max_total_bytes
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn max_entries(&self) -> usize {
        self.inner.max_entries()
    }

    pub fn max_age(&self) -> Duration {
        self.inner.max_age()
    }

    pub fn counters(&self) -> CacheCounters {
        self.inner.counters()
    }
}
