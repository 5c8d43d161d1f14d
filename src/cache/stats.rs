//! Cache Statistics Module
//!
//! Read-only snapshots of cache health plus the running hit/miss counters.

use std::fmt;
use std::time::Duration;

use serde::Serialize;

const MIB: f64 = 1024.0 * 1024.0;

// == Cache Counters ==
/// Running operation counters, updated by mutating cache operations only.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CacheCounters {
    /// Successful retrievals
    pub hits: u64,
    /// Retrievals of absent or expired keys
    pub misses: u64,
    /// Entries dropped to honor the entry or byte bounds
    pub evictions: u64,
    /// Entries dropped because they outlived `max_age`
    pub expirations: u64,
}

impl CacheCounters {
    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    pub fn record_eviction(&mut self) {
        self.evictions += 1;
    }

    pub fn record_expirations(&mut self, count: usize) {
        self.expirations += count as u64;
    }

    // == Hit Rate ==
    /// Returns hits / (hits + misses), or 0.0 if no requests have been made.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

// == Age Summary ==
/// Min/max/average age in seconds across surviving entries. All zero when empty.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct AgeSummary {
    pub min: f64,
    pub max: f64,
    pub avg: f64,
}

impl AgeSummary {
    pub fn from_ages<I>(ages: I) -> Self
    where
        I: IntoIterator<Item = Duration>,
    {
        let mut count = 0usize;
        let mut min = Duration::MAX;
        let mut max = Duration::ZERO;
        let mut sum = Duration::ZERO;

        for age in ages {
            count += 1;
            min = min.min(age);
            max = max.max(age);
            sum += age;
        }

        if count == 0 {
            return Self::default();
        }

        Self {
            min: min.as_secs_f64(),
            max: max.as_secs_f64(),
            avg: sum.as_secs_f64() / count as f64,
        }
    }
}

// == Cache Stats ==
/// Snapshot of a [`TimedLruCache`](crate::cache::TimedLruCache).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CacheStats {
    /// Current number of entries
    pub total_items: usize,
    /// Configured entry bound
    pub max_entries: usize,
    /// `total_items / max_entries`
    pub utilization: f64,
    /// Age in seconds of the oldest surviving entry (0 if empty)
    pub oldest_item_age: f64,
    /// Age in seconds of the newest surviving entry (0 if empty)
    pub newest_item_age: f64,
    #[serde(flatten)]
    pub counters: CacheCounters,
}

impl CacheStats {
    pub fn new(
        total_items: usize,
        max_entries: usize,
        ages: AgeSummary,
        counters: CacheCounters,
    ) -> Self {
        Self {
            total_items,
            max_entries,
            utilization: ratio(total_items as f64, max_entries as f64),
            oldest_item_age: ages.max,
            newest_item_age: ages.min,
            counters,
        }
    }

    pub fn hit_rate(&self) -> f64 {
        self.counters.hit_rate()
    }
}

// == Byte Cache Stats ==
/// Snapshot of a [`BoundedByteCache`](crate::cache::BoundedByteCache).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ByteCacheStats {
    #[serde(flatten)]
    pub base: CacheStats,
    /// Bytes currently held
    pub total_bytes: usize,
    /// Configured byte ceiling
    pub max_total_bytes: usize,
    /// `total_bytes / max_total_bytes`
    pub byte_utilization: f64,
    pub item_age: AgeSummary,
}

impl ByteCacheStats {
    pub fn new(
        base: CacheStats,
        total_bytes: usize,
        max_total_bytes: usize,
        item_age: AgeSummary,
    ) -> Self {
        Self {
            base,
            total_bytes,
            max_total_bytes,
            byte_utilization: ratio(total_bytes as f64, max_total_bytes as f64),
            item_age,
        }
    }
}

impl fmt::Display for ByteCacheStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Cache status:")?;
        writeln!(f, "  Items: {}", self.base.total_items)?;
        writeln!(f, "  Max items: {}", self.base.max_entries)?;
        writeln!(f, "  Utilization: {:.1}%", self.base.utilization * 100.0)?;
        writeln!(f, "  Total size: {:.2}MB", self.total_bytes as f64 / MIB)?;
        writeln!(f, "  Max size: {:.2}MB", self.max_total_bytes as f64 / MIB)?;
        writeln!(f, "  Size utilization: {:.1}%", self.byte_utilization * 100.0)?;
        writeln!(f, "  Oldest item: {:.1}s", self.base.oldest_item_age)?;
        write!(f, "  Newest item: {:.1}s", self.base.newest_item_age)
    }
}

fn ratio(part: f64, whole: f64) -> f64 {
    if whole == 0.0 {
        0.0
    } else {
        part / whole
    }
}
