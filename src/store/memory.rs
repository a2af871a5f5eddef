//! Memory Store Module
//!
//! In-memory `KeyValueStore` combining HashMap storage with TTL expiration.
//! Expired entries are dropped lazily on access and eagerly by the cleanup task.

use std::collections::HashMap;
use std::sync::{RwLock, RwLockWriteGuard};
use std::time::Duration;

use tracing::debug;

use crate::error::{CacheError, Result};
use crate::store::{KeyValueStore, StoreEntry, StoreStats, StoredValue};

// == Store State ==
#[derive(Debug, Default)]
struct StoreState {
    /// Key-value storage
    entries: HashMap<String, StoreEntry>,
    /// Performance statistics
    stats: StoreStats,
}

impl StoreState {
    /// Returns the live entry for `key`, dropping it first if it has expired.
    fn live_entry(&mut self, key: &str) -> Option<&mut StoreEntry> {
        if self.entries.get(key).is_some_and(StoreEntry::is_expired) {
            self.entries.remove(key);
            self.stats.record_expired(1);
            self.stats.set_total_keys(self.entries.len());
            debug!(key, "dropped expired entry on access");
        }
        self.entries.get_mut(key)
    }

    fn insert(&mut self, key: &str, entry: StoreEntry) {
        self.entries.insert(key.to_string(), entry);
        self.stats.set_total_keys(self.entries.len());
    }
}

// == Memory Store ==
/// Thread-safe in-memory key-value store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: RwLock<StoreState>,
}

impl MemoryStore {
    // == Constructor ==
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, StoreState>> {
        self.state
            .write()
            .map_err(|_| CacheError::Internal("store lock poisoned".to_string()))
    }

    // == Cleanup Expired ==
    /// Removes all expired entries and returns how many were removed.
    pub fn purge_expired(&self) -> Result<usize> {
        let mut state = self.write()?;
        let before = state.entries.len();
        state.entries.retain(|_, entry| !entry.is_expired());

        let removed = before - state.entries.len();
        let remaining = state.entries.len();
        state.stats.record_expired(removed);
        state.stats.set_total_keys(remaining);
        Ok(removed)
    }

    // == Stats ==
    /// Returns current store statistics.
    pub fn stats(&self) -> Result<StoreStats> {
        let state = self
            .state
            .read()
            .map_err(|_| CacheError::Internal("store lock poisoned".to_string()))?;
        let mut stats = state.stats.clone();
        stats.set_total_keys(state.entries.len());
        Ok(stats)
    }

    /// Returns the number of keys currently held, expired or not.
    pub fn len(&self) -> Result<usize> {
        self.state
            .read()
            .map(|state| state.entries.len())
            .map_err(|_| CacheError::Internal("store lock poisoned".to_string()))
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }
}

impl KeyValueStore for MemoryStore {
    fn set(&self, key: &str, value: Vec<u8>) -> Result<()> {
        let entry = StoreEntry::new(StoredValue::Bytes(value), None);
        self.write()?.insert(key, entry);
        Ok(())
    }

    fn set_with_expiration(&self, key: &str, value: Vec<u8>, ttl: Duration) -> Result<()> {
        let entry = StoreEntry::new(StoredValue::Bytes(value), Some(ttl));
        self.write()?.insert(key, entry);
        Ok(())
    }

    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let mut state = self.write()?;
        let value = match state.live_entry(key) {
            Some(entry) => match &entry.value {
                StoredValue::Bytes(bytes) => Some(bytes.clone()),
                StoredValue::List(_) => return Err(CacheError::WrongType(key.to_string())),
            },
            None => None,
        };

        if value.is_some() {
            state.stats.record_hit();
        } else {
            state.stats.record_miss();
        }
        Ok(value)
    }

    fn exists(&self, key: &str) -> Result<bool> {
        Ok(self.write()?.live_entry(key).is_some())
    }

    fn increment(&self, key: &str) -> Result<i64> {
        let mut state = self.write()?;
        let Some(entry) = state.live_entry(key) else {
            state.insert(key, StoreEntry::new(StoredValue::Bytes(b"1".to_vec()), None));
            return Ok(1);
        };

        // Keeps the existing deadline, if any.
        let StoredValue::Bytes(bytes) = &mut entry.value else {
            return Err(CacheError::WrongType(key.to_string()));
        };
        let current: i64 = std::str::from_utf8(bytes)
            .ok()
            .and_then(|s| s.parse().ok())
            .ok_or_else(|| CacheError::WrongType(format!("{key} does not hold an integer")))?;
        let next = current
            .checked_add(1)
            .ok_or_else(|| CacheError::InvalidRequest(format!("increment of {key} overflows")))?;
        *bytes = next.to_string().into_bytes();
        Ok(next)
    }

    fn append_to_list(&self, key: &str, value: Vec<u8>) -> Result<usize> {
        let mut state = self.write()?;
        match state.live_entry(key) {
            Some(entry) => match &mut entry.value {
                StoredValue::List(items) => {
                    items.push(value);
                    Ok(items.len())
                }
                StoredValue::Bytes(_) => Err(CacheError::WrongType(key.to_string())),
            },
            None => {
                state.insert(key, StoreEntry::new(StoredValue::List(vec![value]), None));
                Ok(1)
            }
        }
    }

    fn list_range(&self, key: &str, start: isize, end: isize) -> Result<Vec<Vec<u8>>> {
        let mut state = self.write()?;
        let items = match state.live_entry(key) {
            Some(entry) => match &entry.value {
                StoredValue::List(items) => items,
                StoredValue::Bytes(_) => return Err(CacheError::WrongType(key.to_string())),
            },
            None => return Ok(Vec::new()),
        };

        Ok(match normalize_range(items.len(), start, end) {
            Some((from, to)) => items[from..=to].to_vec(),
            None => Vec::new(),
        })
    }

    fn flush_all(&self) -> Result<()> {
        let mut state = self.write()?;
        state.entries.clear();
        state.stats.reset();
        debug!("store flushed");
        Ok(())
    }
}

/// Resolves an inclusive, possibly negative, index range against `len`.
fn normalize_range(len: usize, start: isize, end: isize) -> Option<(usize, usize)> {
    let len = len as isize;
    let start = if start < 0 { (start + len).max(0) } else { start };
    let end = if end < 0 { end + len } else { end.min(len - 1) };

    if len == 0 || start > end || start >= len {
        None
    } else {
        Some((start as usize, end as usize))
    }
}
