//! Store Module
//!
//! The key-value store contract the caches are written against, and an
//! in-memory implementation of it with TTL expiration.

mod entry;
mod memory;
mod stats;

#[cfg(test)]
mod property_tests;

use std::sync::Arc;
use std::time::Duration;

use crate::error::Result;

// Re-export public types
pub use entry::{current_timestamp_ms, StoreEntry, StoredValue};
pub use memory::MemoryStore;
pub use stats::StoreStats;

// == Key Value Store ==
/// Atomic key-value operations addressed by string keys.
///
/// Every method is atomic on its own; nothing is atomic across calls. Reads of
/// an expired key behave exactly like reads of a missing key.
pub trait KeyValueStore: Send + Sync {
    /// Unconditional write with no expiration.
    fn set(&self, key: &str, value: Vec<u8>) -> Result<()>;

    /// Write that expires `ttl` after now.
    fn set_with_expiration(&self, key: &str, value: Vec<u8>, ttl: Duration) -> Result<()>;

    /// Reads a byte value, `None` when absent or expired.
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Returns true if the key holds a live value of any kind.
    fn exists(&self, key: &str) -> Result<bool>;

    /// Creates the key at 0 if absent, increments it and returns the new value.
    fn increment(&self, key: &str) -> Result<i64>;

    /// Appends to the list under `key` and returns the new list length.
    fn append_to_list(&self, key: &str, value: Vec<u8>) -> Result<usize>;

    /// Returns elements `start..=end`; negative indices count from the end.
    fn list_range(&self, key: &str, start: isize, end: isize) -> Result<Vec<Vec<u8>>>;

    /// Removes every key.
    fn flush_all(&self) -> Result<()>;
}

/// Store handle shared by both caches.
pub type SharedStore = Arc<dyn KeyValueStore>;
