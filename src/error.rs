//! Error types for the cache
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for the cache engine, its stores and the HTTP front.
#[derive(Error, Debug)]
pub enum CacheError {
    /// A caller passed an unusable key, key batch or TTL
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A required backend setting is missing or malformed
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The record store failed (connection, query)
    #[error("Storage error: {0}")]
    Storage(#[from] sqlx::Error),

    /// A value or envelope could not be (de)serialized
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The stored envelope was written by an unknown format version
    #[error("Unsupported envelope version: {0}")]
    UnsupportedEnvelope(u8),

    /// Key not present (HTTP surface only)
    #[error("Key not found: {0}")]
    NotFound(String),
}

// == IntoResponse Implementation ==
impl IntoResponse for CacheError {
    fn into_response(self) -> Response {
        let status = match &self {
            CacheError::InvalidArgument(_) => StatusCode::BAD_REQUEST,
            CacheError::NotFound(_) => StatusCode::NOT_FOUND,
            CacheError::Storage(_) => StatusCode::SERVICE_UNAVAILABLE,
            CacheError::Configuration(_)
            | CacheError::Serialization(_)
            | CacheError::UnsupportedEnvelope(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the cache.
pub type Result<T> = std::result::Result<T, CacheError>;
