//! In-process record store.

use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::RecordStore;
use crate::error::Result;

// == Memory Record Store ==
/// Non-durable store keeping records in an ordered map.
#[derive(Debug, Default)]
pub struct MemoryRecordStore {
    records: RwLock<BTreeMap<String, String>>,
}

impl MemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of records held.
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[async_trait]
impl RecordStore for MemoryRecordStore {
    async fn get_by_key(&self, key: &str) -> Result<Option<String>> {
        Ok(self.records.read().await.get(key).cloned())
    }

    async fn upsert(&self, key: &str, payload: &str) -> Result<bool> {
        self.records
            .write()
            .await
            .insert(key.to_string(), payload.to_string());
        Ok(true)
    }

    async fn delete_by_key(&self, key: &str) -> Result<bool> {
        self.records.write().await.remove(key);
        Ok(true)
    }

    async fn delete_all(&self) -> Result<bool> {
        self.records.write().await.clear();
        Ok(true)
    }

    async fn exists_by_key(&self, key: &str) -> Result<bool> {
        Ok(self.records.read().await.contains_key(key))
    }

    async fn list_all(&self) -> Result<Vec<(String, String)>> {
        Ok(self
            .records
            .read()
            .await
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect())
    }
}
