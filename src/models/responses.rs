//! Response DTOs for the cache server API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;
use serde_json::Value;

use crate::cache::{CallRecord, Replay};
use crate::store::StoreStats;

/// Response body for `POST /store`
#[derive(Debug, Clone, Serialize)]
pub struct StoreResponse {
    /// Success message
    pub message: String,
    /// The generated key
    pub key: String,
}

impl StoreResponse {
    pub fn new(key: impl Into<String>) -> Self {
        let key = key.into();
        Self {
            message: format!("Payload stored under '{}'", key),
            key,
        }
    }
}

/// Response body for `GET /retrieve/:key`
#[derive(Debug, Clone, Serialize)]
pub struct RetrieveResponse {
    /// The requested key
    pub key: String,
    /// The decoded value
    pub value: Value,
}

impl RetrieveResponse {
    pub fn new(key: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Response body for `GET /replay/:operation`
#[derive(Debug, Clone, Serialize)]
pub struct ReplayResponse {
    pub operation: String,
    /// Number of recorded calls
    pub calls: usize,
    /// Recorded calls, oldest first
    pub history: Vec<CallRecord>,
    /// False if inputs and outputs differ in length
    pub consistent: bool,
    /// Human-readable transcript
    pub transcript: String,
}

impl From<Replay> for ReplayResponse {
    fn from(replay: Replay) -> Self {
        Self {
            consistent: replay.is_consistent(),
            transcript: replay.to_string(),
            operation: replay.operation,
            calls: replay.calls,
            history: replay.history,
        }
    }
}

/// Response body for `GET /fetch`
#[derive(Debug, Clone, Serialize)]
pub struct FetchResponse {
    pub resource: String,
    /// Cached or freshly fetched content
    pub content: String,
    /// Number of upstream fetches so far
    pub access_count: u64,
}

/// Response body for `GET /count`
#[derive(Debug, Clone, Serialize)]
pub struct CountResponse {
    pub resource: String,
    /// Number of upstream fetches so far
    pub access_count: u64,
}

/// Response body for the stats endpoint (GET /stats)
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    /// Number of reads that found a value
    pub hits: u64,
    /// Number of reads that found nothing
    pub misses: u64,
    /// Number of entries dropped after their TTL elapsed
    pub expired: u64,
    /// Current number of keys in the store
    pub total_keys: usize,
    /// Hit rate (hits / (hits + misses))
    pub hit_rate: f64,
}

impl From<StoreStats> for StatsResponse {
    fn from(stats: StoreStats) -> Self {
        Self {
            hit_rate: stats.hit_rate(),
            hits: stats.hits,
            misses: stats.misses,
            expired: stats.expired,
            total_keys: stats.total_keys,
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Error response body for all error conditions
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Error message describing what went wrong
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_response_serialize() {
        let resp = StoreResponse::new("my_key");
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("my_key"));
        assert!(json.contains("stored"));
    }

    #[test]
    fn test_retrieve_response_values() {
        let resp = RetrieveResponse::new("k", 42);
        assert_eq!(resp.value, Value::from(42));

        let resp = RetrieveResponse::new("k", "text");
        assert_eq!(serde_json::to_string(&resp).unwrap(), r#"{"key":"k","value":"text"}"#);
    }

    #[test]
    fn test_replay_response_from_replay() {
        let replay = Replay {
            operation: "Cache.store".to_string(),
            calls: 1,
            history: vec![CallRecord {
                input: "\"a\"".to_string(),
                output: "k1".to_string(),
            }],
            outputs: 1,
        };

        let resp = ReplayResponse::from(replay);

        assert!(resp.consistent);
        assert_eq!(resp.calls, 1);
        assert_eq!(
            resp.transcript,
            "Cache.store was called 1 times:\nCache.store(\"a\") -> k1"
        );
    }

    #[test]
    fn test_stats_response_hit_rate() {
        let stats = StoreStats {
            hits: 80,
            misses: 20,
            expired: 5,
            total_keys: 100,
        };
        let resp = StatsResponse::from(stats);
        assert!((resp.hit_rate - 0.8).abs() < 0.001);
        assert_eq!(resp.expired, 5);
    }

    #[test]
    fn test_health_response_serialize() {
        let resp = HealthResponse::healthy();
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("healthy"));
        assert!(json.contains("timestamp"));
    }

    #[test]
    fn test_error_response_serialize() {
        let resp = ErrorResponse::new("Something went wrong");
        let json = serde_json::to_string(&resp).unwrap();
        assert_eq!(json, r#"{"error":"Something went wrong"}"#);
    }
}
