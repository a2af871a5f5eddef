//! Store Entry Module
//!
//! Defines the structure for individual store entries with TTL support.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

// == Stored Value ==
/// The two kinds of value a key can hold.
#[derive(Debug, Clone, PartialEq)]
pub enum StoredValue {
    /// A single byte string (set/get/increment)
    Bytes(Vec<u8>),
    /// An ordered list of byte strings (append/range)
    List(Vec<Vec<u8>>),
}

// == Store Entry ==
/// A single store entry with value and metadata.
#[derive(Debug, Clone)]
pub struct StoreEntry {
    /// The stored value
    pub value: StoredValue,
    /// Expiration timestamp (Unix milliseconds), None = no expiration
    pub expires_at: Option<u64>,
}

impl StoreEntry {
    // == Constructor ==
    /// Creates a new entry, expiring `ttl` from now when given.
    ///
    /// Deadlines past the end of the millisecond clock saturate to `u64::MAX`.
    pub fn new(value: StoredValue, ttl: Option<Duration>) -> Self {
        let expires_at = ttl.map(|ttl| {
            let ttl_ms = u64::try_from(ttl.as_millis()).unwrap_or(u64::MAX);
            current_timestamp_ms().saturating_add(ttl_ms)
        });

        Self { value, expires_at }
    }

    // == Is Expired ==
    /// Checks if the entry has expired.
    ///
    /// An entry is expired once the current time is greater than or equal to
    /// its expiration time.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(current_timestamp_ms())
    }

    /// Same as [`is_expired`](Self::is_expired) against a given clock reading.
    pub fn is_expired_at(&self, now_ms: u64) -> bool {
        match self.expires_at {
            Some(expires) => now_ms >= expires,
            None => false,
        }
    }
}

// == Utility Functions ==
/// Returns current Unix timestamp in milliseconds.
pub fn current_timestamp_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
