//! Property-Based Tests for Cache Module
//!
//! Uses proptest to check the cache invariants over arbitrary operation sequences.

use proptest::prelude::*;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use crate::cache::{BoundedByteCache, MockClock, NullFaultReporter, TimedLruCache};
use crate::error::CacheError;

// == Test Configuration ==
const TEST_MAX_ENTRIES: usize = 100;
const TEST_MAX_AGE: Duration = Duration::from_secs(300);
const TEST_MAX_BYTES: usize = 1000;

// == Strategies ==
/// Generates cache keys from a small alphabet so sequences revisit keys
fn key_strategy() -> impl Strategy<Value = String> {
    "[a-h]{1,2}"
}

fn value_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 ]{1,64}"
}

/// Payload sizes up to and past the byte ceiling
fn payload_strategy() -> impl Strategy<Value = Vec<u8>> {
    prop_oneof![
        4 => prop::collection::vec(any::<u8>(), 0..400),
        1 => prop::collection::vec(any::<u8>(), 900..1200),
    ]
}

#[derive(Debug, Clone)]
enum CacheOp {
    Set { key: String, payload: Vec<u8> },
    Get { key: String },
    Remove { key: String },
    Cleanup,
    Advance { secs: u64 },
    Shrink { target: usize },
}

fn cache_op_strategy() -> impl Strategy<Value = CacheOp> {
    prop_oneof![
        4 => (key_strategy(), payload_strategy())
            .prop_map(|(key, payload)| CacheOp::Set { key, payload }),
        3 => key_strategy().prop_map(|key| CacheOp::Get { key }),
        1 => key_strategy().prop_map(|key| CacheOp::Remove { key }),
        1 => Just(CacheOp::Cleanup),
        1 => (0u64..120).prop_map(|secs| CacheOp::Advance { secs }),
        1 => (0usize..TEST_MAX_BYTES).prop_map(|target| CacheOp::Shrink { target }),
    ]
}

fn apply(cache: &mut BoundedByteCache<String, MockClock>, clock: &MockClock, op: CacheOp) {
    match op {
        CacheOp::Set { key, payload } => {
            let _ = cache.set(key, payload);
        }
        CacheOp::Get { key } => {
            let _ = cache.get(key.as_str());
        }
        CacheOp::Remove { key } => {
            cache.remove(key.as_str());
        }
        CacheOp::Cleanup => {
            cache.cleanup_expired();
        }
        CacheOp::Advance { secs } => clock.advance(Duration::from_secs(secs)),
        CacheOp::Shrink { target } => {
            cache.shrink_to(target);
        }
    }
}

fn byte_cache(max_entries: usize) -> (BoundedByteCache<String, MockClock>, MockClock) {
    let clock = MockClock::new();
    let cache = BoundedByteCache::with_clock(
        max_entries,
        Duration::from_secs(60),
        TEST_MAX_BYTES,
        clock.clone(),
    )
    .with_fault_reporter(Arc::new(NullFaultReporter));
    (cache, clock)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    // *For any* sequence of operations, the byte counter equals the summed
    // payload sizes and stays within the ceiling, and the entry bound holds.
    #[test]
    fn prop_byte_invariant(ops in prop::collection::vec(cache_op_strategy(), 1..80)) {
        let (mut cache, clock) = byte_cache(8);

        for op in ops {
            apply(&mut cache, &clock, op);
            prop_assert_eq!(cache.total_bytes(), cache.stored_bytes());
            prop_assert!(cache.total_bytes() <= TEST_MAX_BYTES);
            prop_assert!(cache.len() <= 8);
        }
    }

    // *For any* payload larger than the ceiling, set fails with
    // PayloadTooLarge and leaves the cache exactly as it was.
    #[test]
    fn prop_oversized_rejection_leaves_state(
        ops in prop::collection::vec(cache_op_strategy(), 0..30),
        key in key_strategy(),
        excess in 1usize..500,
    ) {
        let (mut cache, clock) = byte_cache(8);
        for op in ops {
            apply(&mut cache, &clock, op);
        }

        let before_bytes = cache.total_bytes();
        let before_stats = cache.get_stats();

        let result = cache.set(key, vec![0u8; TEST_MAX_BYTES + excess]);

        let rejected = matches!(result, Err(CacheError::PayloadTooLarge { .. }));
        prop_assert!(rejected);
        prop_assert_eq!(cache.total_bytes(), before_bytes);
        prop_assert_eq!(cache.get_stats(), before_stats);
    }

    // *For any* state, repeated get_stats calls are identical and do not
    // change what subsequent reads return.
    #[test]
    fn prop_stats_purity(
        ops in prop::collection::vec(cache_op_strategy(), 0..40),
        lookups in prop::collection::vec(key_strategy(), 1..10),
        repeats in 1usize..5,
    ) {
        let (mut cache, clock) = byte_cache(8);
        for op in ops {
            apply(&mut cache, &clock, op);
        }

        let first = cache.get_stats();
        for _ in 0..repeats {
            prop_assert_eq!(cache.get_stats(), first.clone());
        }
        prop_assert_eq!(cache.len(), first.base.total_items);

        let peeked: Vec<bool> = lookups.iter().map(|k| cache.contains_key(k.as_str())).collect();
        let read: Vec<bool> = lookups.iter().map(|k| cache.get(k.as_str()).is_some()).collect();
        prop_assert_eq!(peeked, read);
    }

    // *For any* valid key-value pair, storing the pair and then retrieving it
    // (before expiration) returns the exact same value that was stored.
    #[test]
    fn prop_roundtrip_storage(key in key_strategy(), value in value_strategy()) {
        let mut cache: TimedLruCache<String, String> =
            TimedLruCache::new(TEST_MAX_ENTRIES, TEST_MAX_AGE);

        cache.set(key.clone(), value.clone());

        prop_assert_eq!(cache.get(key.as_str()), Some(value));
    }

    // *For any* key, storing V1 then V2 leaves exactly one entry holding V2.
    #[test]
    fn prop_overwrite_semantics(
        key in key_strategy(),
        value1 in value_strategy(),
        value2 in value_strategy()
    ) {
        let mut cache: TimedLruCache<String, String> =
            TimedLruCache::new(TEST_MAX_ENTRIES, TEST_MAX_AGE);

        cache.set(key.clone(), value1);
        cache.set(key.clone(), value2.clone());

        prop_assert_eq!(cache.get(key.as_str()), Some(value2));
        prop_assert_eq!(cache.len(), 1);
    }

    // *For any* sequence of set operations, the number of entries never
    // exceeds max_entries.
    #[test]
    fn prop_capacity_enforcement(
        entries in prop::collection::vec((key_strategy(), value_strategy()), 1..200),
        max_entries in 1usize..20,
    ) {
        let mut cache: TimedLruCache<String, String> =
            TimedLruCache::new(max_entries, TEST_MAX_AGE);

        for (key, value) in entries {
            cache.set(key, value);
            prop_assert!(
                cache.len() <= max_entries,
                "Cache size {} exceeds max {}",
                cache.len(),
                max_entries
            );
        }
    }

    // *For any* sequence that fills the cache, adding a new key evicts the
    // least recently inserted key and keeps every other one.
    #[test]
    fn prop_lru_eviction_order(
        initial_keys in prop::collection::vec("[a-z]{3,8}", 2..10),
        new_key in "[A-Z]{3,8}",
    ) {
        let mut seen = HashSet::new();
        let unique_keys: Vec<String> = initial_keys
            .into_iter()
            .filter(|k| seen.insert(k.clone()))
            .collect();
        prop_assume!(unique_keys.len() >= 2);

        let capacity = unique_keys.len();
        let mut cache: TimedLruCache<String, usize> = TimedLruCache::new(capacity, TEST_MAX_AGE);

        for (i, key) in unique_keys.iter().enumerate() {
            cache.set(key.clone(), i);
        }
        cache.set(new_key.clone(), capacity);

        prop_assert_eq!(cache.len(), capacity);
        prop_assert!(!cache.contains_key(unique_keys[0].as_str()));
        prop_assert!(cache.contains_key(new_key.as_str()));
        for key in unique_keys.iter().skip(1) {
            prop_assert!(cache.contains_key(key.as_str()), "Key '{}' should survive", key);
        }
    }

    // *For any* full cache, reading the oldest key protects it and moves
    // eviction on to the next oldest.
    #[test]
    fn prop_lru_access_tracking(
        keys in prop::collection::vec("[a-z]{3,8}", 3..8),
        new_key in "[A-Z]{3,8}",
    ) {
        let mut seen = HashSet::new();
        let unique_keys: Vec<String> = keys
            .into_iter()
            .filter(|k| seen.insert(k.clone()))
            .collect();
        prop_assume!(unique_keys.len() >= 3);

        let capacity = unique_keys.len();
        let mut cache: TimedLruCache<String, usize> = TimedLruCache::new(capacity, TEST_MAX_AGE);
        for (i, key) in unique_keys.iter().enumerate() {
            cache.set(key.clone(), i);
        }

        let accessed_key = unique_keys[0].clone();
        prop_assert!(cache.get(accessed_key.as_str()).is_some());

        cache.set(new_key.clone(), capacity);

        prop_assert!(cache.contains_key(accessed_key.as_str()));
        prop_assert!(!cache.contains_key(unique_keys[1].as_str()));
        prop_assert!(cache.contains_key(new_key.as_str()));
    }

    // *For any* key, removing it twice never fails and leaves it absent.
    #[test]
    fn prop_remove_is_idempotent(key in key_strategy(), payload in payload_strategy()) {
        let (mut cache, _) = byte_cache(8);
        let _ = cache.set(key.clone(), payload);

        cache.remove(key.as_str());
        prop_assert!(!cache.remove(key.as_str()));
        prop_assert!(cache.get(key.as_str()).is_none());
        prop_assert_eq!(cache.total_bytes(), 0);
    }
}

// == Property Test for Error Response Format ==
proptest! {
    #![proptest_config(ProptestConfig::with_cases(50))]

    // *For any* error condition, the HTTP response carries a JSON body with
    // an "error" field holding the error's message.
    #[test]
    fn prop_error_response_format(
        error_msg in "[a-zA-Z0-9 _-]{1,100}",
        size in 1usize..10_000,
    ) {
        use axum::body::to_bytes;
        use axum::response::IntoResponse;

        let error_variants = vec![
            CacheError::PayloadTooLarge { size: size + 1, max: size },
            CacheError::NotFound(error_msg.clone()),
            CacheError::InvalidRequest(error_msg.clone()),
        ];

        for error in error_variants {
            let expected_msg = error.to_string();
            let response = error.into_response();

            let content_type = response.headers()
                .get("content-type")
                .and_then(|v| v.to_str().ok());
            prop_assert!(
                content_type.map(|ct| ct.contains("application/json")).unwrap_or(false),
                "Response should have JSON content-type"
            );

            let bytes = tokio_test::block_on(to_bytes(response.into_body(), usize::MAX)).unwrap();
            let json: serde_json::Value = serde_json::from_slice(&bytes)
                .expect("Response body should be valid JSON");

            prop_assert_eq!(json["error"].as_str(), Some(expected_msg.as_str()));
        }
    }
}

// == Property Test for Concurrent Operation Correctness ==
proptest! {
    #![proptest_config(ProptestConfig::with_cases(50))]

    // *For any* set of concurrent tasks, reads observe only complete payloads
    // and the byte invariant holds once every task has finished.
    #[test]
    fn prop_concurrent_operation_correctness(
        ops in prop::collection::vec(cache_op_strategy(), 10..50)
    ) {
        use crate::cache::shared;

        tokio_test::block_on(async {
            let store = shared(BoundedByteCache::new(8, TEST_MAX_AGE, TEST_MAX_BYTES));

            let mut handles = vec![];
            for op in ops {
                let store = store.clone();
                handles.push(tokio::spawn(async move {
                    match op {
                        CacheOp::Set { key, payload } => {
                            // Every payload is uniform so torn writes would show
                            let fill = key.len() as u8;
                            let uniform = vec![fill; payload.len()];
                            let _ = store.write().await.set(key, uniform);
                        }
                        CacheOp::Get { key } => {
                            if let Some(payload) = store.write().await.get(key.as_str()) {
                                let fill = key.len() as u8;
                                if payload.iter().any(|b| *b != fill) {
                                    return Err(format!("Corrupted payload for '{}'", key));
                                }
                            }
                        }
                        CacheOp::Remove { key } => {
                            store.write().await.remove(key.as_str());
                        }
                        CacheOp::Cleanup => {
                            store.write().await.cleanup_expired();
                        }
                        CacheOp::Shrink { target } => {
                            store.write().await.shrink_to(target);
                        }
                        CacheOp::Advance { .. } => {
                            let _ = store.read().await.get_stats();
                        }
                    }
                    Ok::<_, String>(())
                }));
            }

            for handle in handles {
                let result = handle.await.expect("Task should not panic");
                prop_assert!(result.is_ok(), "Concurrent operation failed: {:?}", result);
            }

            let cache = store.read().await;
            prop_assert_eq!(cache.total_bytes(), cache.stored_bytes());
            prop_assert!(cache.total_bytes() <= TEST_MAX_BYTES);
            prop_assert!(cache.len() <= 8);
            Ok(())
        })?;
    }
}

// == Scenario Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lru_scenario_from_two_entries() {
        let mut cache: TimedLruCache<&str, i32> = TimedLruCache::new(2, TEST_MAX_AGE);

        cache.set("a", 1);
        cache.set("b", 2);
        assert_eq!(cache.get(&"a"), Some(1));
        cache.set("c", 3);

        assert!(cache.contains_key(&"a"));
        assert!(!cache.contains_key(&"b"));
        assert!(cache.contains_key(&"c"));
    }

    #[test]
    fn test_ttl_scenario() {
        let clock = MockClock::new();
        let mut cache: TimedLruCache<String, i32, MockClock> =
            TimedLruCache::with_clock(10, Duration::from_secs(1), clock.clone());

        cache.set("key".to_string(), 1);
        clock.advance(Duration::from_secs(2));

        assert_eq!(cache.get("key"), None);
        assert_eq!(cache.get_stats().total_items, 0);
    }

    #[test]
    fn test_oversized_scenario() {
        let (mut cache, _) = byte_cache(8);

        let result = cache.set("key".to_string(), vec![0u8; 1500]);

        assert!(matches!(result, Err(CacheError::PayloadTooLarge { .. })));
        assert_eq!(cache.total_bytes(), 0);
    }

    #[test]
    fn test_byte_pressure_scenario() {
        let (mut cache, _) = byte_cache(8);

        cache.set("a".to_string(), vec![0u8; 600]).unwrap();
        cache.set("b".to_string(), vec![0u8; 600]).unwrap();

        assert_eq!(cache.total_bytes(), 600);
        assert_eq!(cache.len(), 1);
        assert!(cache.contains_key("b"));
    }
}
