//! Expiring Resource Cache Module
//!
//! Caches fetched content under `cached:<resource>` for a fixed TTL and counts
//! upstream fetches under `count:<resource>`.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use crate::error::{CacheError, Result};
use crate::fetch::Fetcher;
use crate::store::SharedStore;

/// TTL applied when none is configured.
pub const DEFAULT_RESOURCE_TTL: Duration = Duration::from_secs(10);

/// Key the content of `resource_id` is cached under.
pub fn cache_key(resource_id: &str) -> String {
    format!("cached:{resource_id}")
}

/// Key the fetch counter of `resource_id` is kept under.
pub fn count_key(resource_id: &str) -> String {
    format!("count:{resource_id}")
}

// == Expiring Resource Cache ==
/// Read-through cache in front of a [`Fetcher`].
///
/// Hits neither call the fetcher nor touch the counter. Two concurrent misses
/// for the same resource may both fetch and both count.
pub struct ExpiringResourceCache {
    store: SharedStore,
    fetcher: Arc<dyn Fetcher>,
    ttl: Duration,
}

impl ExpiringResourceCache {
    // == Constructor ==
    /// Creates a cache whose entries expire `ttl` after they are written.
    pub fn new(store: SharedStore, fetcher: Arc<dyn Fetcher>, ttl: Duration) -> Self {
        Self {
            store,
            fetcher,
            ttl,
        }
    }

    /// Creates a cache using [`DEFAULT_RESOURCE_TTL`].
    pub fn with_default_ttl(store: SharedStore, fetcher: Arc<dyn Fetcher>) -> Self {
        Self::new(store, fetcher, DEFAULT_RESOURCE_TTL)
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    // == Fetch ==
    /// Returns the content of `resource_id`, fetching it on a miss.
    ///
    /// A failed fetch is returned as [`CacheError::Upstream`] and leaves both
    /// the cache entry and the counter untouched.
    pub async fn fetch(&self, resource_id: &str) -> Result<String> {
        let key = cache_key(resource_id);

        if let Some(cached) = self.store.get(&key)? {
            debug!(resource = resource_id, "cache hit");
            return String::from_utf8(cached).map_err(|e| CacheError::decode(key, e));
        }

        debug!(resource = resource_id, "cache miss, fetching");
        let content = self.fetcher.fetch(resource_id).await.map_err(|e| {
            warn!(resource = resource_id, error = %e, "upstream fetch failed");
            CacheError::Upstream(e)
        })?;

        self.store
            .set_with_expiration(&key, content.clone().into_bytes(), self.ttl)?;
        let count = self.store.increment(&count_key(resource_id))?;
        debug!(resource = resource_id, count, "cached fresh content");

        Ok(content)
    }

    // == Access Count ==
    /// Number of upstream fetches recorded for `resource_id`.
    pub fn access_count(&self, resource_id: &str) -> Result<u64> {
        let key = count_key(resource_id);
        match self.store.get(&key)? {
            Some(raw) => std::str::from_utf8(&raw)
                .ok()
                .and_then(|s| s.parse().ok())
                .ok_or_else(|| CacheError::decode(key, "counter is not an integer")),
            None => Ok(0),
        }
    }
}
