//! Request DTOs for the cache server API
//!
//! Defines the structure of incoming HTTP request bodies and query strings.

use serde::Deserialize;

use crate::cache::Payload;

/// Maximum accepted payload size in bytes
pub const MAX_PAYLOAD_SIZE: usize = 1024 * 1024; // 1 MB

/// Validates a payload posted to `POST /store`
///
/// Returns an error message if validation fails, None if valid.
pub fn validate_payload(payload: &Payload) -> Option<String> {
    let size = match payload {
        Payload::Text(text) => text.len(),
        Payload::Bytes(bytes) => bytes.len(),
        Payload::Integer(_) => return None,
        Payload::Float(x) if !x.is_finite() => {
            return Some("Float payload must be finite".to_string())
        }
        Payload::Float(_) => return None,
    };

    if size > MAX_PAYLOAD_SIZE {
        return Some(format!(
            "Payload exceeds maximum size of {} bytes",
            MAX_PAYLOAD_SIZE
        ));
    }
    None
}

/// How `GET /retrieve/:key` decodes the stored payload
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Decoding {
    /// Raw bytes, returned as an array of numbers
    Raw,
    /// UTF-8 text
    #[default]
    Text,
    /// Base-10 integer
    Integer,
    /// Floating-point number
    Float,
}

/// Query string of `GET /retrieve/:key`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RetrieveQuery {
    /// Requested decoding (`?as=integer`)
    #[serde(rename = "as", default)]
    pub decoding: Decoding,
}

/// Query string of `GET /fetch` and `GET /count`
#[derive(Debug, Clone, Deserialize)]
pub struct ResourceQuery {
    /// Resource identifier, e.g. a URL
    pub resource: String,
}

impl ResourceQuery {
    /// Validates the query
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        if self.resource.trim().is_empty() {
            return Some("Resource cannot be empty".to_string());
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retrieve_query_default() {
        let query: RetrieveQuery = serde_json::from_str("{}").unwrap();
        assert_eq!(query.decoding, Decoding::Text);
    }

    #[test]
    fn test_retrieve_query_as_integer() {
        let query: RetrieveQuery = serde_json::from_str(r#"{"as": "integer"}"#).unwrap();
        assert_eq!(query.decoding, Decoding::Integer);
    }

    #[test]
    fn test_validate_payload_too_large() {
        let payload = Payload::Text("x".repeat(MAX_PAYLOAD_SIZE + 1));
        assert!(validate_payload(&payload).is_some());
    }

    #[test]
    fn test_validate_payload_numbers() {
        assert!(validate_payload(&Payload::Integer(i64::MAX)).is_none());
        assert!(validate_payload(&Payload::Float(1.5)).is_none());
        assert!(validate_payload(&Payload::Float(f64::NAN)).is_some());
    }

    #[test]
    fn test_validate_empty_resource() {
        let query = ResourceQuery {
            resource: "  ".to_string(),
        };
        assert!(query.validate().is_some());

        let query = ResourceQuery {
            resource: "http://example.com".to_string(),
        };
        assert!(query.validate().is_none());
    }
}
