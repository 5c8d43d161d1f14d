//! Cache Entry Module
//!
//! Defines the structure for individual cache entries with age tracking.

use std::time::{Duration, Instant};

// == Cache Entry ==
/// Represents a single cache entry with value and timestamps.
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    /// The stored value
    pub value: V,
    /// Set on insertion and on overwrite; age is measured from here
    pub inserted_at: Instant,
    /// Set on insertion, overwrite and every successful read
    pub last_touched_at: Instant,
    /// Cache-wide sequence number of the last insert or read, orders ties
    /// between equal `last_touched_at` stamps
    pub touch_seq: u64,
}

impl<V> CacheEntry<V> {
    // == Constructor ==
    /// Creates a new entry stamped at `now`.
    pub fn new(value: V, now: Instant, seq: u64) -> Self {
        Self {
            value,
            inserted_at: now,
            last_touched_at: now,
            touch_seq: seq,
        }
    }

    // == Age ==
    /// Time elapsed since insertion, saturating at zero.
    pub fn age(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.inserted_at)
    }

    // == Is Expired ==
    /// Checks if the entry has outlived `max_age`.
    ///
    /// Boundary condition: an entry whose age equals `max_age` exactly is
    /// still valid. It expires only once its age is strictly greater.
    pub fn is_expired(&self, now: Instant, max_age: Duration) -> bool {
        self.age(now) > max_age
    }

    // == Touch ==
    /// Records a successful read.
    pub fn touch(&mut self, now: Instant, seq: u64) {
        self.last_touched_at = now;
        self.touch_seq = seq;
    }
}
