//! Envelope Module
//!
//! Encodes the `{value, ttl, created_at}` triple into the single text payload
//! held by the record store.

use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::error::{CacheError, Result};

/// Current envelope format version.
pub const ENVELOPE_VERSION: u8 = 1;

// == Envelope ==
/// A stored cache entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<V> {
    /// Format version
    pub v: u8,
    /// The cached value
    pub value: V,
    /// TTL in seconds, 0 = never expires
    pub ttl: u64,
    /// Creation time (Unix seconds)
    pub created_at: i64,
}

/// Expiry metadata of an envelope, decoded without its value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct EnvelopeHeader {
    pub v: u8,
    pub ttl: u64,
    pub created_at: i64,
}

// == Encode ==
/// Serializes a value with its expiry metadata.
pub fn encode<V: Serialize + ?Sized>(value: &V, ttl: u64, created_at: i64) -> Result<String> {
    let envelope = Envelope {
        v: ENVELOPE_VERSION,
        value,
        ttl,
        created_at,
    };
    Ok(serde_json::to_string(&envelope)?)
}

// == Decode ==
/// Deserializes a stored payload.
///
/// A blank payload decodes to `None` and is treated as a missing entry.
pub fn decode<V: DeserializeOwned>(payload: &str) -> Result<Option<Envelope<V>>> {
    if payload.trim().is_empty() {
        return Ok(None);
    }
    let envelope: Envelope<V> = serde_json::from_str(payload)?;
    check_version(envelope.v)?;
    Ok(Some(envelope))
}

/// Deserializes only the expiry metadata of a stored payload.
pub fn decode_header(payload: &str) -> Result<Option<EnvelopeHeader>> {
    if payload.trim().is_empty() {
        return Ok(None);
    }
    let header: EnvelopeHeader = serde_json::from_str(payload)?;
    check_version(header.v)?;
    Ok(Some(header))
}

fn check_version(v: u8) -> Result<()> {
    if v == ENVELOPE_VERSION {
        Ok(())
    } else {
        Err(CacheError::UnsupportedEnvelope(v))
    }
}
