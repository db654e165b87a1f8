//! Request DTOs for the cache server API
//!
//! Defines the structure of incoming HTTP request bodies.

use std::collections::HashMap;

use serde::Deserialize;
use serde_json::Value;

use crate::cache::Ttl;

/// Request body for the SET operation (PUT /set)
///
/// # Fields
/// - `key`: The cache key to store the value under
/// - `value`: Any JSON value
/// - `ttl`: Optional TTL in seconds (absent or 0 = never expires)
#[derive(Debug, Clone, Deserialize)]
pub struct SetRequest {
    /// The cache key
    pub key: String,
    /// The value to store
    pub value: Value,
    /// Optional TTL in seconds
    #[serde(default)]
    pub ttl: Option<u64>,
}

impl SetRequest {
    /// TTL argument for the cache engine
    pub fn ttl(&self) -> Ttl {
        Ttl::from(self.ttl)
    }
}

/// Request body for the batch SET operation (PUT /mset)
#[derive(Debug, Clone, Deserialize)]
pub struct SetMultipleRequest {
    /// Values to store, by key
    pub entries: HashMap<String, Value>,
    /// Optional TTL in seconds shared by every entry
    #[serde(default)]
    pub ttl: Option<u64>,
}

/// Request body for the batch GET and DELETE operations (POST /mget, POST /mdel)
#[derive(Debug, Clone, Deserialize)]
pub struct KeysRequest {
    /// Keys to operate on
    pub keys: Vec<String>,
}
