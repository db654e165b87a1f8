//! Argument validation shared by the cache operations.
//!
//! Everything here runs before the record store is touched.

use crate::error::{CacheError, Result};

/// Checks a single key against the emptiness rule and the backend's length limit.
pub fn key(key: &str, max_len: Option<usize>) -> Result<()> {
    if key.is_empty() {
        return Err(CacheError::InvalidArgument(
            "Key cannot be empty".to_string(),
        ));
    }
    if let Some(max) = max_len {
        let len = key.chars().count();
        if len > max {
            return Err(CacheError::InvalidArgument(format!(
                "Key '{}' is {} characters long, the store accepts at most {}",
                key, len, max
            )));
        }
    }
    Ok(())
}

/// Checks every key of a batch, stopping at the first bad one.
pub fn keys<'a, I>(keys: I, max_len: Option<usize>) -> Result<()>
where
    I: IntoIterator<Item = &'a str>,
{
    keys.into_iter().try_for_each(|k| key(k, max_len))
}
