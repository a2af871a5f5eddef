//! Redis Cache - call-recording object cache and expiring resource cache
//!
//! Both caches sit on a shared key-value store: one records how often and
//! with what its `store` operation was called, the other caches fetched
//! resources for a fixed TTL and counts upstream fetches.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod fetch;
pub mod models;
pub mod store;
pub mod tasks;

pub use api::AppState;
pub use cache::{ExpiringResourceCache, InstrumentedCache, Payload};
pub use config::Config;
pub use error::{CacheError, Result};
pub use store::{KeyValueStore, MemoryStore};
pub use tasks::spawn_cleanup_task;
