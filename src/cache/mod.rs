//! Cache Module
//!
//! The two caches layered on a shared [`KeyValueStore`](crate::store::KeyValueStore):
//! an object cache that records its calls, and a TTL cache for fetched resources.

mod expiring;
mod history;
mod instrumented;
mod object;
mod payload;


// Re-export public types
pub use expiring::{cache_key, count_key, ExpiringResourceCache, DEFAULT_RESOURCE_TTL};
pub use history::{inputs_key, outputs_key, replay, CallRecord, Replay};
pub use instrumented::InstrumentedOperation;
pub use object::{InstrumentedCache, STORE_OPERATION};
pub use payload::Payload;
