//! Test doubles for the record store.

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use super::{MemoryRecordStore, RecordStore};
use crate::error::Result;

/// Memory store that counts every call and refuses writes for chosen keys.
#[derive(Debug, Default)]
pub struct ScriptedStore {
    pub inner: MemoryRecordStore,
    pub calls: AtomicUsize,
    pub reject_writes: HashSet<String>,
    pub reject_deletes: HashSet<String>,
    pub max_key_len: Option<usize>,
}

impl ScriptedStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rejecting_writes(keys: &[&str]) -> Self {
        Self {
            reject_writes: keys.iter().map(|k| k.to_string()).collect(),
            ..Self::default()
        }
    }

    pub fn rejecting_deletes(keys: &[&str]) -> Self {
        Self {
            reject_deletes: keys.iter().map(|k| k.to_string()).collect(),
            ..Self::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn record(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl RecordStore for ScriptedStore {
    async fn get_by_key(&self, key: &str) -> Result<Option<String>> {
        self.record();
        self.inner.get_by_key(key).await
    }

    async fn upsert(&self, key: &str, payload: &str) -> Result<bool> {
        self.record();
        if self.reject_writes.contains(key) {
            return Ok(false);
        }
        self.inner.upsert(key, payload).await
    }

    async fn delete_by_key(&self, key: &str) -> Result<bool> {
        self.record();
        if self.reject_deletes.contains(key) {
            return Ok(false);
        }
        self.inner.delete_by_key(key).await
    }

    async fn delete_all(&self) -> Result<bool> {
        self.record();
        self.inner.delete_all().await
    }

    async fn exists_by_key(&self, key: &str) -> Result<bool> {
        self.record();
        self.inner.exists_by_key(key).await
    }

    async fn list_all(&self) -> Result<Vec<(String, String)>> {
        self.record();
        self.inner.list_all().await
    }

    fn max_key_len(&self) -> Option<usize> {
        self.max_key_len
    }
}
