//! Property-Based Tests for Cache Module
//!
//! Uses proptest to check store behaviour over arbitrary operation sequences.

use proptest::prelude::*;
use std::collections::HashMap;
use std::time::Duration;

use crate::cache::{CacheStore, KeyPattern};

// == Test Configuration ==
const TEST_DEFAULT_TTL: Duration = Duration::from_secs(300);

const NAMESPACES: [&str; 4] = ["blog:", "case-study:", "testimonials:", "user:"];

// == Strategies ==
/// Generates namespaced keys such as `blog:post:abc`
fn namespaced_key_strategy() -> impl Strategy<Value = String> {
    (prop::sample::select(NAMESPACES.to_vec()), "[a-z0-9:-]{1,24}")
        .prop_map(|(ns, rest)| format!("{}{}", ns, rest))
}

fn value_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 ]{1,64}"
}

#[derive(Debug, Clone)]
enum CacheOp {
    Set { key: String, value: String },
    Get { key: String },
    Invalidate { key: String },
}

fn cache_op_strategy() -> impl Strategy<Value = CacheOp> {
    prop_oneof![
        (namespaced_key_strategy(), value_strategy())
            .prop_map(|(key, value)| CacheOp::Set { key, value }),
        namespaced_key_strategy().prop_map(|key| CacheOp::Get { key }),
        namespaced_key_strategy().prop_map(|key| CacheOp::Invalidate { key }),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // Reads agree with a plain HashMap model and the counters match.
    #[test]
    fn prop_store_matches_model(ops in prop::collection::vec(cache_op_strategy(), 1..60)) {
        let mut store = CacheStore::new(TEST_DEFAULT_TTL);
        let mut model: HashMap<String, String> = HashMap::new();
        let mut expected_hits: u64 = 0;
        let mut expected_misses: u64 = 0;

        for op in ops {
            match op {
                CacheOp::Set { key, value } => {
                    store.set(key.clone(), value.clone(), None).unwrap();
                    model.insert(key, value);
                }
                CacheOp::Get { key } => {
                    let got = store.get(&key);
                    prop_assert_eq!(got.as_ref(), model.get(&key), "Value mismatch for {}", key);
                    if got.is_some() {
                        expected_hits += 1;
                    } else {
                        expected_misses += 1;
                    }
                }
                CacheOp::Invalidate { key } => {
                    prop_assert_eq!(store.invalidate(&key), model.remove(&key).is_some());
                }
            }
        }

        let stats = store.stats();
        prop_assert_eq!(stats.hits, expected_hits, "Hits mismatch");
        prop_assert_eq!(stats.misses, expected_misses, "Misses mismatch");
        prop_assert_eq!(stats.size, model.len(), "Size mismatch");
    }

    // Prefix invalidation removes exactly the keys in that namespace.
    #[test]
    fn prop_prefix_invalidation_is_exact(
        keys in prop::collection::hash_set(namespaced_key_strategy(), 1..40),
        namespace in prop::sample::select(NAMESPACES.to_vec())
    ) {
        let mut store = CacheStore::new(TEST_DEFAULT_TTL);
        for key in &keys {
            store.set(key.clone(), "v".to_string(), None).unwrap();
        }

        let in_namespace = keys.iter().filter(|k| k.starts_with(namespace)).count();
        let removed = store.invalidate_pattern(&KeyPattern::prefix(namespace));

        prop_assert_eq!(removed, in_namespace);
        for key in &keys {
            prop_assert_eq!(store.get(key).is_some(), !key.starts_with(namespace), "Wrong outcome for {}", key);
        }
    }

    // Overwriting a key keeps a single entry holding the latest value.
    #[test]
    fn prop_overwrite_semantics(
        key in namespaced_key_strategy(),
        value1 in value_strategy(),
        value2 in value_strategy()
    ) {
        let mut store = CacheStore::new(TEST_DEFAULT_TTL);

        store.set(key.clone(), value1, None).unwrap();
        store.set(key.clone(), value2.clone(), None).unwrap();

        prop_assert_eq!(store.get(&key), Some(value2));
        prop_assert_eq!(store.len(), 1);
    }

    // Every entry disappears once its own TTL has elapsed, and not before.
    #[test]
    fn prop_ttl_expiration_behavior(
        entries in prop::collection::hash_map(namespaced_key_strategy(), 1u64..120, 1..20),
        elapsed in 0u64..150
    ) {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_time()
            .start_paused(true)
            .build()
            .unwrap();

        rt.block_on(async {
            let mut store = CacheStore::new(TEST_DEFAULT_TTL);
            for (key, ttl) in &entries {
                store.set(key.clone(), "v".to_string(), Some(Duration::from_secs(*ttl))).unwrap();
            }

            tokio::time::advance(Duration::from_secs(elapsed)).await;

            for (key, ttl) in &entries {
                prop_assert_eq!(
                    store.get(key).is_some(),
                    elapsed < *ttl,
                    "key {} ttl {} elapsed {}", key, ttl, elapsed
                );
            }
            Ok(())
        })?;
    }
}

// == Property Test for Error Response Format ==
proptest! {
    #![proptest_config(ProptestConfig::with_cases(50))]

    // Every error becomes a JSON body with a string "error" field.
    #[test]
    fn prop_error_response_format(error_msg in "[a-zA-Z0-9 _-]{1,100}") {
        use crate::error::AppError;
        use axum::body::to_bytes;
        use axum::response::IntoResponse;

        let rt = tokio::runtime::Builder::new_current_thread().build().unwrap();

        for error in [
            AppError::NotFound(error_msg.clone()),
            AppError::InvalidRequest(error_msg.clone()),
            AppError::Internal(error_msg.clone()),
        ] {
            let response = error.into_response();
            let content_type = response
                .headers()
                .get("content-type")
                .and_then(|v| v.to_str().ok())
                .unwrap_or_default()
                .to_string();
            prop_assert!(content_type.contains("application/json"));

            let bytes = rt.block_on(to_bytes(response.into_body(), usize::MAX)).unwrap();
            let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
            prop_assert_eq!(json["error"].as_str(), Some(error_msg.as_str()));
        }
    }
}
