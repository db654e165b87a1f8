//! Record Store Module
//!
//! The durable key→payload storage the cache engine is built on. Stores know
//! nothing about TTLs; they keep one opaque payload per key.

mod memory;
mod sql;

#[cfg(test)]
pub(crate) mod testing;

use async_trait::async_trait;

use crate::error::Result;

pub use memory::MemoryRecordStore;
pub(crate) use sql::check_table_name;
pub use sql::{SqlRecordStore, SQL_MAX_KEY_LENGTH};

// == Record Store Trait ==
/// Raw storage capability consumed by [`crate::cache::Cache`].
///
/// Write operations report failure through their boolean result; an `Err` is
/// reserved for backend faults such as a lost connection.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Returns the payload stored under `key`.
    async fn get_by_key(&self, key: &str) -> Result<Option<String>>;

    /// Inserts or fully replaces the payload under `key`.
    async fn upsert(&self, key: &str, payload: &str) -> Result<bool>;

    /// Removes `key`. Removing an absent key is not an error.
    async fn delete_by_key(&self, key: &str) -> Result<bool>;

    /// Removes every record.
    async fn delete_all(&self) -> Result<bool>;

    /// Returns whether a record exists for `key`.
    async fn exists_by_key(&self, key: &str) -> Result<bool>;

    /// Returns every record, ordered by key.
    async fn list_all(&self) -> Result<Vec<(String, String)>>;

    /// Longest key, in characters, the backend can hold.
    fn max_key_len(&self) -> Option<usize> {
        None
    }
}
