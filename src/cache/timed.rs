//! Timed LRU Cache Module
//!
//! Generic key/value store bounded by entry count and per-entry age.

use std::borrow::Borrow;
use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::debug;

use crate::cache::{
    AgeSummary, CacheCounters, CacheEntry, CacheStats, Clock, FaultReporter, LruTracker,
    SystemClock, TracingFaultReporter, DEFAULT_MAX_AGE, DEFAULT_MAX_ENTRIES,
};

// == Lookup ==
/// Outcome of a lookup, for wrappers that must mirror removals.
#[derive(Debug)]
pub(crate) enum Lookup<V> {
    Hit(V),
    /// The entry was expired and has been removed
    Expired(CacheEntry<V>),
    Miss,
}

// == Timed LRU Cache ==
/// Key/value cache with LRU eviction and lazy age expiry.
///
/// - At most `max_entries` entries are held; inserting a new key into a
///   full cache evicts the least recently used entry first.
/// - An entry older than `max_age` (measured from its last insertion) is
///   treated as a miss on `get` and removed on the spot.
/// - Missing or expired keys are never errors.
#[derive(Debug)]
pub struct TimedLruCache<K, V, C = SystemClock> {
    /// Key-value storage
    entries: HashMap<K, CacheEntry<V>>,
    /// LRU access tracker
    lru: LruTracker<K>,
    /// Hit/miss/eviction counters
    counters: CacheCounters,
    /// Maximum number of entries allowed
    max_entries: usize,
    /// Maximum entry age before it is considered expired
    max_age: Duration,
    /// Next value for `CacheEntry::touch_seq`
    next_seq: u64,
    clock: C,
    faults: Arc<dyn FaultReporter>,
}

impl<K, V> TimedLruCache<K, V, SystemClock>
where
    K: Eq + Hash + Clone,
{
    // == Constructor ==
    /// Creates a cache on the system clock.
    ///
    /// # Arguments
    /// * `max_entries` - Maximum number of entries (0 is treated as 1)
    /// * `max_age` - Age after which an entry expires
    pub fn new(max_entries: usize, max_age: Duration) -> Self {
        Self::with_clock(max_entries, max_age, SystemClock)
    }
}

impl<K, V> Default for TimedLruCache<K, V, SystemClock>
where
    K: Eq + Hash + Clone,
{
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ENTRIES, DEFAULT_MAX_AGE)
    }
}

impl<K, V, C> TimedLruCache<K, V, C>
where
    K: Eq + Hash + Clone,
    C: Clock,
{
    /// Creates a cache driven by a custom clock.
    pub fn with_clock(max_entries: usize, max_age: Duration, clock: C) -> Self {
        Self {
            entries: HashMap::new(),
            lru: LruTracker::new(),
            counters: CacheCounters::default(),
            max_entries: max_entries.max(1),
            max_age,
            next_seq: 0,
            clock,
            faults: Arc::new(TracingFaultReporter),
        }
    }

    /// Replaces the fault reporter (defaults to [`TracingFaultReporter`]).
    pub fn with_fault_reporter(mut self, faults: Arc<dyn FaultReporter>) -> Self {
        self.faults = faults;
        self
    }

    // == Get ==
    /// Retrieves a value by key and marks it most recently used.
    ///
    /// Returns None for missing keys. Expired entries are removed and also
    /// reported as None.
    pub fn get<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
        V: Clone,
    {
        match self.lookup(key) {
            Lookup::Hit(value) => Some(value),
            Lookup::Expired(_) | Lookup::Miss => None,
        }
    }

    pub(crate) fn lookup<Q>(&mut self, key: &Q) -> Lookup<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
        V: Clone,
    {
        let now = self.clock.now();

        let (stored_key, expired) = match self.entries.get_key_value(key) {
            Some((stored_key, entry)) => {
                (stored_key.clone(), entry.is_expired(now, self.max_age))
            }
            None => {
                self.counters.record_miss();
                return Lookup::Miss;
            }
        };

        if expired {
            self.counters.record_miss();
            self.counters.record_expirations(1);
            debug!("Lazily expired cache entry on read");
            return match self.take(key) {
                Some(entry) => Lookup::Expired(entry),
                None => Lookup::Miss,
            };
        }

        if !self.lru.contains(key) {
            self.faults
                .report("get", "entry was missing from the recency order");
        }
        self.lru.touch(&stored_key);
        let seq = self.bump_seq();

        match self.entries.get_mut(key) {
            Some(entry) => {
                entry.touch(now, seq);
                self.counters.record_hit();
                Lookup::Hit(entry.value.clone())
            }
            None => {
                self.counters.record_miss();
                Lookup::Miss
            }
        }
    }

    // == Peek ==
    /// Returns a live value without touching recency, counters or expiry.
    pub fn peek<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let now = self.clock.now();
        self.entries
            .get(key)
            .filter(|entry| !entry.is_expired(now, self.max_age))
            .map(|entry| &entry.value)
    }

    /// True if `key` holds a value that has not expired. No side effects.
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.peek(key).is_some()
    }

    // == Set ==
    /// Stores a key-value pair.
    ///
    /// If the key already exists, the value is replaced and its age restarts.
    /// If the cache is full and the key is new, the least recently used entry
    /// is evicted first.
    pub fn set(&mut self, key: K, value: V) {
        self.insert(key, value);
    }

    /// Inserts and returns every entry displaced along the way: the previous
    /// value of `key` and any entry evicted for capacity.
    pub(crate) fn insert(&mut self, key: K, value: V) -> Vec<CacheEntry<V>> {
        let now = self.clock.now();
        let mut displaced = Vec::new();

        if let Some(previous) = self.entries.remove(&key) {
            displaced.push(previous);
        } else {
            while self.entries.len() >= self.max_entries {
                match self.pop_lru() {
                    Some((_, evicted)) => displaced.push(evicted),
                    None => break,
                }
            }
        }

        let seq = self.bump_seq();
        self.entries.insert(key.clone(), CacheEntry::new(value, now, seq));
        self.lru.touch(&key);

        displaced
    }

    // == Pop LRU ==
    /// Evicts the least recently used entry, whatever its age.
    pub(crate) fn pop_lru(&mut self) -> Option<(K, CacheEntry<V>)> {
        loop {
            match self.lru.evict_oldest() {
                Some(key) => match self.entries.remove(&key) {
                    Some(entry) => {
                        self.counters.record_eviction();
                        debug!("Evicted least recently used cache entry");
                        return Some((key, entry));
                    }
                    None => self
                        .faults
                        .report("evict", "recency order referenced a missing entry"),
                },
                None if self.entries.is_empty() => return None,
                None => {
                    self.faults.report(
                        "evict",
                        "entries missing from the recency order, resynchronizing",
                    );
                    self.resync_recency();
                }
            }
        }
    }

    fn bump_seq(&mut self) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;
        seq
    }

    /// Rebuilds the recency order from entry timestamps, ties broken by
    /// touch sequence.
    fn resync_recency(&mut self) {
        let mut keys: Vec<(&K, Instant, u64)> = self
            .entries
            .iter()
            .map(|(key, entry)| (key, entry.last_touched_at, entry.touch_seq))
            .collect();
        keys.sort_by_key(|&(_, touched, seq)| (touched, seq));

        let mut lru = LruTracker::new();
        for (key, _, _) in keys {
            lru.touch(key);
        }
        self.lru = lru;
    }

    // == Remove ==
    /// Removes an entry by key. Absent keys are a no-op.
    ///
    /// Returns whether an entry was removed.
    pub fn remove<Q>(&mut self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.take(key).is_some()
    }

    pub(crate) fn take<Q>(&mut self, key: &Q) -> Option<CacheEntry<V>>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let entry = self.entries.remove(key);
        let tracked = self.lru.remove(key);

        if entry.is_some() != tracked {
            self.faults
                .report("remove", "entry map and recency order disagreed");
        }
        entry
    }

    // == Clear ==
    /// Empties the cache. Counters are kept.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.lru.clear();
    }

    // == Cleanup Expired ==
    /// Removes all expired entries from the cache.
    ///
    /// Returns the number of entries removed.
    pub fn cleanup_expired(&mut self) -> usize {
        self.drain_expired().len()
    }

    pub(crate) fn drain_expired(&mut self) -> Vec<CacheEntry<V>> {
        let now = self.now();
        let expired_keys: Vec<K> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_expired(now, self.max_age))
            .map(|(key, _)| key.clone())
            .collect();

        let drained: Vec<CacheEntry<V>> = expired_keys
            .iter()
            .filter_map(|key| self.take(key))
            .collect();

        self.counters.record_expirations(drained.len());
        drained
    }

    // == Stats ==
    /// Returns a snapshot of the cache. Never mutates state.
    pub fn get_stats(&self) -> CacheStats {
        let ages = self.age_summary();
        CacheStats::new(self.entries.len(), self.max_entries, ages, self.counters)
    }

    pub(crate) fn age_summary(&self) -> AgeSummary {
        let now = self.now();
        AgeSummary::from_ages(self.entries.values().map(|entry| entry.age(now)))
    }

    pub(crate) fn now(&self) -> Instant {
        self.clock.now()
    }

    pub(crate) fn entries(&self) -> impl Iterator<Item = &CacheEntry<V>> {
        self.entries.values()
    }

    pub(crate) fn report_fault(&self, operation: &'static str, detail: &str) {
        self.faults.report(operation, detail);
    }

    // == Accessors ==
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn max_entries(&self) -> usize {
        self.max_entries
    }

    pub fn max_age(&self) -> Duration {
        self.max_age
    }

    pub fn counters(&self) -> CacheCounters {
        self.counters
    }

    #[cfg(test)]
    pub(crate) fn forget_recency(&mut self) {
        self.lru.clear();
    }
}
