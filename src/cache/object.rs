//! Instrumented Cache Module
//!
//! Stores payloads under random keys and records every `store` call.

use tracing::{debug, info};
use uuid::Uuid;

use crate::cache::history::{self, Replay};
use crate::cache::instrumented::InstrumentedOperation;
use crate::cache::Payload;
use crate::error::{CacheError, Result};
use crate::store::{KeyValueStore, SharedStore};

/// Name the `store` operation is recorded under.
pub const STORE_OPERATION: &str = "Cache.store";

type StoreFn = Box<dyn Fn(Payload) -> Result<String> + Send + Sync>;

// == Instrumented Cache ==
/// Object cache with call counting and call history on `store`.
pub struct InstrumentedCache {
    store: SharedStore,
    store_op: InstrumentedOperation<StoreFn>,
}

impl InstrumentedCache {
    // == Constructor ==
    /// Creates a cache over `store`, flushing everything the store holds.
    pub fn new(store: SharedStore) -> Result<Self> {
        store.flush_all()?;
        info!("object cache initialized, store flushed");

        let backing = store.clone();
        let write: StoreFn = Box::new(move |payload: Payload| {
            let key = unused_key(backing.as_ref())?;
            backing.set(&key, payload.to_bytes())?;
            debug!(key = %key, "stored payload");
            Ok(key)
        });

        Ok(Self {
            store_op: InstrumentedOperation::new(STORE_OPERATION, store.clone(), write),
            store,
        })
    }

    // == Store ==
    /// Stores `payload` under a fresh random key and returns the key.
    pub fn store(&self, payload: impl Into<Payload>) -> Result<String> {
        self.store_op.call(payload.into())
    }

    // == Retrieve ==
    /// Returns the raw payload, or `None` if the key is missing.
    pub fn retrieve(&self, key: &str) -> Result<Option<Vec<u8>>> {
        self.store.get(key)
    }

    /// Returns the payload decoded by `decode`, or `None` if the key is missing.
    ///
    /// `decode` is not called for a missing key.
    pub fn retrieve_with<T, D>(&self, key: &str, decode: D) -> Result<Option<T>>
    where
        D: FnOnce(Vec<u8>) -> Result<T>,
    {
        self.retrieve(key)?.map(decode).transpose()
    }

    /// Returns the payload as UTF-8 text.
    pub fn retrieve_text(&self, key: &str) -> Result<Option<String>> {
        self.retrieve_with(key, |raw| {
            String::from_utf8(raw).map_err(|e| CacheError::decode(key, e))
        })
    }

    /// Returns the payload parsed as a base-10 integer.
    pub fn retrieve_integer(&self, key: &str) -> Result<Option<i64>> {
        self.retrieve_with(key, |raw| parse_utf8(key, &raw))
    }

    /// Returns the payload parsed as a floating-point number.
    pub fn retrieve_float(&self, key: &str) -> Result<Option<f64>> {
        self.retrieve_with(key, |raw| parse_utf8(key, &raw))
    }

    // == Call Statistics ==
    /// Number of recorded calls of `operation`, 0 if it was never called.
    pub fn call_count(&self, operation: &str) -> Result<u64> {
        match self.store.get(operation)? {
            Some(raw) => parse_utf8(operation, &raw),
            None => Ok(0),
        }
    }

    /// Replays the recorded history of `operation`.
    pub fn replay(&self, operation: &str) -> Result<Replay> {
        history::replay(self.store.as_ref(), operation)
    }
}

/// Generates a random key that is not already present in `store`.
fn unused_key(store: &dyn KeyValueStore) -> Result<String> {
    loop {
        let key = Uuid::new_v4().to_string();
        if !store.exists(&key)? {
            return Ok(key);
        }
        debug!(key = %key, "generated key already in use, retrying");
    }
}

fn parse_utf8<T>(key: &str, raw: &[u8]) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    std::str::from_utf8(raw)
        .map_err(|e| CacheError::decode(key, e))?
        .trim()
        .parse()
        .map_err(|e: T::Err| CacheError::decode(key, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use std::sync::Arc;

    fn new_cache() -> (Arc<MemoryStore>, InstrumentedCache) {
        let store = Arc::new(MemoryStore::new());
        let cache = InstrumentedCache::new(store.clone()).unwrap();
        (store, cache)
    }

    #[test]
    fn test_new_flushes_store() {
        let store = Arc::new(MemoryStore::new());
        store.set("stale", b"x".to_vec()).unwrap();

        let _cache = InstrumentedCache::new(store.clone()).unwrap();

        assert!(store.is_empty().unwrap());
    }

    #[test]
    fn test_store_returns_uuid_key() {
        let (_, cache) = new_cache();

        let key = cache.store("hello").unwrap();

        assert!(Uuid::parse_str(&key).is_ok());
    }

    #[test]
    fn test_store_and_retrieve_text() {
        let (_, cache) = new_cache();

        let key = cache.store("hello").unwrap();

        assert_eq!(cache.retrieve_text(&key).unwrap(), Some("hello".to_string()));
    }

    #[test]
    fn test_store_and_retrieve_integer() {
        let (_, cache) = new_cache();

        let key = cache.store(42).unwrap();

        assert_eq!(cache.retrieve_integer(&key).unwrap(), Some(42));
    }

    #[test]
    fn test_store_and_retrieve_float() {
        let (_, cache) = new_cache();

        let key = cache.store(2.5).unwrap();

        assert_eq!(cache.retrieve_float(&key).unwrap(), Some(2.5));
    }

    #[test]
    fn test_store_and_retrieve_bytes() {
        let (_, cache) = new_cache();
        let payload = vec![0u8, 159, 146, 150];

        let key = cache.store(payload.clone()).unwrap();

        assert_eq!(cache.retrieve(&key).unwrap(), Some(payload));
    }

    #[test]
    fn test_retrieve_missing_key_is_none() {
        let (_, cache) = new_cache();

        assert_eq!(cache.retrieve("missing").unwrap(), None);
        assert_eq!(cache.retrieve_text("missing").unwrap(), None);
        assert_eq!(cache.retrieve_integer("missing").unwrap(), None);
    }

    #[test]
    fn test_retrieve_with_decoder() {
        let (_, cache) = new_cache();
        let key = cache.store("abc").unwrap();

        let len = cache.retrieve_with(&key, |raw| Ok(raw.len())).unwrap();

        assert_eq!(len, Some(3));
    }

    #[test]
    fn test_retrieve_with_skips_decoder_for_missing_key() {
        let (_, cache) = new_cache();

        let result = cache
            .retrieve_with("missing", |_| -> Result<()> { panic!("decoder called") })
            .unwrap();

        assert!(result.is_none());
    }

    #[test]
    fn test_retrieve_integer_non_numeric() {
        let (_, cache) = new_cache();
        let key = cache.store("not a number").unwrap();

        let result = cache.retrieve_integer(&key);

        assert!(matches!(result, Err(CacheError::Decode { .. })));
    }

    #[test]
    fn test_retrieve_text_invalid_utf8() {
        let (_, cache) = new_cache();
        let key = cache.store(vec![0xffu8, 0xfe]).unwrap();

        assert!(matches!(
            cache.retrieve_text(&key),
            Err(CacheError::Decode { .. })
        ));
    }

    #[test]
    fn test_store_counts_calls() {
        let (store, cache) = new_cache();

        for i in 0..5 {
            cache.store(i).unwrap();
        }

        assert_eq!(cache.call_count(STORE_OPERATION).unwrap(), 5);
        assert_eq!(
            store
                .list_range("Cache.store:inputs", 0, -1)
                .unwrap()
                .len(),
            5
        );
        assert_eq!(
            store
                .list_range("Cache.store:outputs", 0, -1)
                .unwrap()
                .len(),
            5
        );
    }

    #[test]
    fn test_call_count_never_called() {
        let (_, cache) = new_cache();
        assert_eq!(cache.call_count("Cache.other").unwrap(), 0);
    }

    #[test]
    fn test_replay_matches_calls() {
        let (_, cache) = new_cache();

        let k1 = cache.store("foo").unwrap();
        let k2 = cache.store(7).unwrap();
        let k3 = cache.store(vec![1u8]).unwrap();

        let replay = cache.replay(STORE_OPERATION).unwrap();

        assert_eq!(replay.calls, 3);
        assert!(replay.is_consistent());
        let outputs: Vec<_> = replay.history.iter().map(|r| r.output.clone()).collect();
        assert_eq!(outputs, vec![k1.clone(), k2, k3]);
        let inputs: Vec<_> = replay.history.iter().map(|r| r.input.as_str()).collect();
        assert_eq!(inputs, vec!["\"foo\"", "7", "b\"\\x01\""]);
        assert!(replay
            .to_string()
            .contains(&format!("Cache.store(\"foo\") -> {k1}")));
    }

    #[test]
    fn test_keys_are_unique() {
        let (_, cache) = new_cache();

        let keys: std::collections::HashSet<_> =
            (0..200).map(|i| cache.store(i).unwrap()).collect();

        assert_eq!(keys.len(), 200);
    }
}
