//! Property-Based Tests for the Store Module
//!
//! Uses proptest to check the store contract the caches rely on.

use proptest::prelude::*;
use std::collections::HashMap;

use crate::store::{KeyValueStore, MemoryStore};

// == Strategies ==
/// Generates valid store keys
fn valid_key_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9_:]{1,64}".prop_map(|s| s)
}

/// Generates arbitrary byte payloads
fn value_strategy() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(any::<u8>(), 0..256)
}

#[derive(Debug, Clone)]
enum StoreOp {
    Set { key: String, value: Vec<u8> },
    Get { key: String },
    Increment { key: String },
}

fn store_op_strategy() -> impl Strategy<Value = StoreOp> {
    // A small key space so operations collide
    let key = "[a-d]";
    prop_oneof![
        (key, value_strategy()).prop_map(|(key, value)| StoreOp::Set { key, value }),
        key.prop_map(|key| StoreOp::Get { key }),
        key.prop_map(|key| StoreOp::Increment { key }),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // Round-trip: any bytes written are read back unchanged.
    #[test]
    fn prop_roundtrip_storage(key in valid_key_strategy(), value in value_strategy()) {
        let store = MemoryStore::new();

        store.set(&key, value.clone()).unwrap();

        prop_assert_eq!(store.get(&key).unwrap(), Some(value));
    }

    // Appending N values yields a list of length N in append order.
    #[test]
    fn prop_append_preserves_order(values in prop::collection::vec(value_strategy(), 0..50)) {
        let store = MemoryStore::new();

        for (i, value) in values.iter().enumerate() {
            let len = store.append_to_list("seq", value.clone()).unwrap();
            prop_assert_eq!(len, i + 1);
        }

        prop_assert_eq!(store.list_range("seq", 0, -1).unwrap(), values);
    }

    // Counters track exactly the number of increments.
    #[test]
    fn prop_increment_counts(n in 1usize..100) {
        let store = MemoryStore::new();

        let mut last = 0;
        for _ in 0..n {
            let next = store.increment("counter").unwrap();
            prop_assert!(next > last, "Counter must be monotonically increasing");
            last = next;
        }

        prop_assert_eq!(last, n as i64);
    }

    // The store agrees with a HashMap model under mixed operations.
    #[test]
    fn prop_matches_model(ops in prop::collection::vec(store_op_strategy(), 1..60)) {
        let store = MemoryStore::new();
        let mut model: HashMap<String, Vec<u8>> = HashMap::new();

        for op in ops {
            match op {
                StoreOp::Set { key, value } => {
                    store.set(&key, value.clone()).unwrap();
                    model.insert(key, value);
                }
                StoreOp::Get { key } => {
                    prop_assert_eq!(store.get(&key).unwrap(), model.get(&key).cloned());
                }
                StoreOp::Increment { key } => {
                    let current = match model.get(&key) {
                        None => Some(0i64),
                        Some(bytes) => std::str::from_utf8(bytes).ok().and_then(|s| s.parse().ok()),
                    };
                    let result = store.increment(&key);
                    match current.and_then(|c| c.checked_add(1)) {
                        Some(expected) => {
                            prop_assert_eq!(result.unwrap(), expected);
                            model.insert(key, expected.to_string().into_bytes());
                        }
                        None => prop_assert!(result.is_err()),
                    }
                }
            }
        }

        prop_assert_eq!(store.len().unwrap(), model.len());
    }
}
