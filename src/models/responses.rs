//! Response DTOs for the cache server API
//!
//! Defines the structure of outgoing HTTP response bodies.

use std::collections::HashMap;

use serde::Serialize;
use serde_json::Value;

/// Response body for the GET operation (GET /get/:key)
#[derive(Debug, Clone, Serialize)]
pub struct GetResponse {
    /// The requested key
    pub key: String,
    /// The stored value
    pub value: Value,
}

impl GetResponse {
    /// Creates a new GetResponse
    pub fn new(key: impl Into<String>, value: Value) -> Self {
        Self {
            key: key.into(),
            value,
        }
    }
}

/// Response body for single-key writes (PUT /set, DELETE /del/:key)
#[derive(Debug, Clone, Serialize)]
pub struct KeyOpResponse {
    /// The key that was written or deleted
    pub key: String,
    /// Whether the record store accepted the operation
    pub success: bool,
}

impl KeyOpResponse {
    pub fn new(key: impl Into<String>, success: bool) -> Self {
        Self {
            key: key.into(),
            success,
        }
    }
}

/// Response body for the existence check (GET /has/:key)
#[derive(Debug, Clone, Serialize)]
pub struct HasResponse {
    pub key: String,
    pub exists: bool,
}

/// Response body for whole-cache and batch writes (DELETE /clear, PUT /mset, POST /mdel)
#[derive(Debug, Clone, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

/// Response body for the batch read (POST /mget)
#[derive(Debug, Clone, Serialize)]
pub struct GetMultipleResponse {
    /// Values by key, `null` for missing or expired keys
    pub values: HashMap<String, Option<Value>>,
}

/// Response body for an on-demand sweep (POST /gc)
#[derive(Debug, Clone, Serialize)]
pub struct GcResponse {
    /// Keys removed by the sweep
    pub removed: Vec<String>,
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

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_get_response_serialize() {
        let resp = GetResponse::new("test_key", json!({"n": 1}));
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["key"], "test_key");
        assert_eq!(json["value"]["n"], 1);
    }

    #[test]
    fn test_key_op_response_serialize() {
        let resp = KeyOpResponse::new("my_key", true);
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["key"], "my_key");
        assert_eq!(json["success"], true);
    }

    #[test]
    fn test_get_multiple_response_serializes_missing_as_null() {
        let resp = GetMultipleResponse {
            values: HashMap::from([("gone".to_string(), None)]),
        };
        let json = serde_json::to_value(&resp).unwrap();
        assert!(json["values"]["gone"].is_null());
    }

    #[test]
    fn test_health_response_serialize() {
        let resp = HealthResponse::healthy();
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("healthy"));
        assert!(json.contains("timestamp"));
    }
}
