//! Error types for the caches
//!
//! Provides unified error handling using thiserror. A missing key is never an
//! error inside the caches; `NotFound` only exists for the HTTP layer.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::fetch::FetchError;
use crate::models::ErrorResponse;

// == Cache Error Enum ==
/// Unified error type for the caches and the HTTP facade.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Key not found (HTTP layer only)
    #[error("Key not found: {0}")]
    NotFound(String),

    /// Stored payload cannot be decoded into the requested type
    #[error("Cannot decode value at '{key}': {reason}")]
    Decode { key: String, reason: String },

    /// The upstream fetch behind the resource cache failed
    #[error("Upstream fetch failed: {0}")]
    Upstream(#[from] FetchError),

    /// Operation applied to a key holding the wrong kind of value
    #[error("Wrong type for key: {0}")]
    WrongType(String),

    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Internal error (e.g. a poisoned store lock)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CacheError {
    /// Builds a `Decode` error for `key`.
    pub fn decode(key: impl Into<String>, reason: impl ToString) -> Self {
        CacheError::Decode {
            key: key.into(),
            reason: reason.to_string(),
        }
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for CacheError {
    fn into_response(self) -> Response {
        let status = match &self {
            CacheError::NotFound(_) => StatusCode::NOT_FOUND,
            CacheError::Decode { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            CacheError::Upstream(_) => StatusCode::BAD_GATEWAY,
            CacheError::WrongType(_) => StatusCode::CONFLICT,
            CacheError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            CacheError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(ErrorResponse::new(self.to_string()));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the caches.
pub type Result<T> = std::result::Result<T, CacheError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_error_message() {
        let err = CacheError::decode("k1", "invalid digit found in string");
        assert_eq!(
            err.to_string(),
            "Cannot decode value at 'k1': invalid digit found in string"
        );
    }

    #[test]
    fn test_status_mapping() {
        let cases = [
            (CacheError::NotFound("k".into()), StatusCode::NOT_FOUND),
            (CacheError::decode("k", "bad"), StatusCode::UNPROCESSABLE_ENTITY),
            (
                CacheError::Upstream(FetchError::Other("down".into())),
                StatusCode::BAD_GATEWAY,
            ),
            (CacheError::WrongType("k".into()), StatusCode::CONFLICT),
            (CacheError::InvalidRequest("x".into()), StatusCode::BAD_REQUEST),
            (
                CacheError::Internal("x".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, status) in cases {
            assert_eq!(err.into_response().status(), status);
        }
    }
}
