//! Payload Module
//!
//! The values the object cache accepts and how each one is encoded for the
//! store.

use std::fmt;

use serde::{Deserialize, Serialize};

// == Payload ==
/// A value accepted by [`InstrumentedCache::store`](crate::cache::InstrumentedCache::store).
///
/// Serialized as `{"type": "text", "value": "hello"}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum Payload {
    Text(String),
    Bytes(Vec<u8>),
    Integer(i64),
    Float(f64),
}

impl Payload {
    /// Encodes the payload the way it is written to the store.
    ///
    /// Numbers are stored as their decimal text so they can be parsed back by
    /// the typed retrievals.
    pub fn to_bytes(&self) -> Vec<u8> {
        match self {
            Payload::Text(text) => text.as_bytes().to_vec(),
            Payload::Bytes(bytes) => bytes.clone(),
            Payload::Integer(n) => n.to_string().into_bytes(),
            Payload::Float(f) => f.to_string().into_bytes(),
        }
    }
}

/// Representation recorded in call histories.
impl fmt::Display for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Payload::Text(text) => write!(f, "{text:?}"),
            Payload::Bytes(bytes) => write!(f, "b\"{}\"", bytes.escape_ascii()),
            Payload::Integer(n) => write!(f, "{n}"),
            Payload::Float(x) => write!(f, "{x:?}"),
        }
    }
}

impl From<&str> for Payload {
    fn from(value: &str) -> Self {
        Payload::Text(value.to_string())
    }
}

impl From<String> for Payload {
    fn from(value: String) -> Self {
        Payload::Text(value)
    }
}

impl From<Vec<u8>> for Payload {
    fn from(value: Vec<u8>) -> Self {
        Payload::Bytes(value)
    }
}

impl From<&[u8]> for Payload {
    fn from(value: &[u8]) -> Self {
        Payload::Bytes(value.to_vec())
    }
}

impl From<i64> for Payload {
    fn from(value: i64) -> Self {
        Payload::Integer(value)
    }
}

impl From<i32> for Payload {
    fn from(value: i32) -> Self {
        Payload::Integer(value.into())
    }
}

impl From<f64> for Payload {
    fn from(value: f64) -> Self {
        Payload::Float(value)
    }
}
