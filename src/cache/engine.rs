//! Cache Engine Module
//!
//! Implements the cache contract on top of a record store: argument validation,
//! envelope encoding, expiry checks and lazy eviction.

use std::collections::HashMap;
use std::sync::Arc;

use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::cache::{envelope, ttl, validate, Ttl};
use crate::clock::{Clock, SystemClock};
use crate::error::Result;
use crate::store::RecordStore;

// == Cache ==
/// TTL-aware cache over an injected [`RecordStore`] and [`Clock`].
///
/// The engine holds no lock of its own. Concurrent writers to the same key are
/// ordered by the record store, last write wins.
pub struct Cache {
    /// Backing storage
    store: Arc<dyn RecordStore>,
    /// Time source for creation stamps and expiry checks
    clock: Arc<dyn Clock>,
}

impl Cache {
    // == Constructors ==
    /// Opens a cache on `store` using wall-clock time.
    ///
    /// Runs one garbage-collection sweep before returning.
    pub async fn open(store: Arc<dyn RecordStore>) -> Result<Self> {
        Self::open_with_clock(store, Arc::new(SystemClock)).await
    }

    /// Opens a cache on `store` driven by `clock`.
    ///
    /// Runs one garbage-collection sweep before returning.
    pub async fn open_with_clock(
        store: Arc<dyn RecordStore>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self> {
        let cache = Self { store, clock };
        let removed = cache.collect_garbage().await?;
        info!(
            "Cache opened, startup sweep removed {} expired entries",
            removed.len()
        );
        Ok(cache)
    }

    // == Get ==
    /// Returns the value stored under `key`, or `default` when the key is
    /// missing or expired.
    ///
    /// An expired entry is deleted as a side effect.
    pub async fn get<V: DeserializeOwned>(
        &self,
        key: &str,
        default: Option<V>,
    ) -> Result<Option<V>> {
        validate::key(key, self.store.max_key_len())?;

        let Some(payload) = self.store.get_by_key(key).await? else {
            return Ok(default);
        };
        let Some(entry) = envelope::decode::<Value>(&payload)? else {
            return Ok(default);
        };

        if self.is_expired(entry.ttl, entry.created_at) {
            debug!("Key '{}' expired, evicting", key);
            self.delete(key).await?;
            return Ok(default);
        }

        Ok(Some(serde_json::from_value(entry.value)?))
    }

    // == Set ==
    /// Stores `value` under `key`, replacing any previous entry in full.
    ///
    /// The creation stamp is taken once and the TTL is resolved against it.
    /// Returns whether the record store accepted the write.
    pub async fn set<V: Serialize + ?Sized>(
        &self,
        key: &str,
        value: &V,
        ttl: impl Into<Ttl>,
    ) -> Result<bool> {
        validate::key(key, self.store.max_key_len())?;

        let now = self.clock.now();
        let ttl = ttl.into().resolve(now)?;
        let payload = envelope::encode(value, ttl, now.timestamp())?;

        let written = self.store.upsert(key, &payload).await?;
        if !written {
            warn!("Record store refused write for key '{}'", key);
        }
        Ok(written)
    }

    // == Delete ==
    /// Removes `key`. Deleting an absent key is not an error.
    pub async fn delete(&self, key: &str) -> Result<bool> {
        validate::key(key, self.store.max_key_len())?;
        self.store.delete_by_key(key).await
    }

    // == Clear ==
    /// Removes every entry.
    pub async fn clear(&self) -> Result<bool> {
        let cleared = self.store.delete_all().await?;
        info!("Cache cleared");
        Ok(cleared)
    }

    // == Has ==
    /// Returns whether a record exists for `key`.
    ///
    /// This is a raw existence check: an expired entry that has not been swept
    /// or read yet still reports `true`. Use [`Cache::get`] to honour expiry.
    pub async fn has(&self, key: &str) -> Result<bool> {
        validate::key(key, self.store.max_key_len())?;
        self.store.exists_by_key(key).await
    }

    // == Get Multiple ==
    /// Reads every key independently, sharing one `default`.
    pub async fn get_multiple<V, I, K>(
        &self,
        keys: I,
        default: Option<V>,
    ) -> Result<HashMap<String, Option<V>>>
    where
        V: DeserializeOwned + Clone,
        I: IntoIterator<Item = K>,
        K: Into<String>,
    {
        let keys: Vec<String> = keys.into_iter().map(Into::into).collect();
        validate::keys(keys.iter().map(String::as_str), self.store.max_key_len())?;

        let mut values = HashMap::with_capacity(keys.len());
        for key in keys {
            let value = self.get(&key, default.clone()).await?;
            values.insert(key, value);
        }
        Ok(values)
    }

    // == Set Multiple ==
    /// Writes every entry with the same TTL, stopping at the first refused write.
    ///
    /// Writes that succeeded before the failure are kept.
    pub async fn set_multiple<I, K, V>(&self, entries: I, ttl: impl Into<Ttl>) -> Result<bool>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Serialize,
    {
        let entries: Vec<(String, V)> = entries
            .into_iter()
            .map(|(k, v)| (k.into(), v))
            .collect();
        validate::keys(
            entries.iter().map(|(k, _)| k.as_str()),
            self.store.max_key_len(),
        )?;
        let ttl = ttl.into();
        ttl.resolve(self.clock.now())?;

        for (key, value) in &entries {
            if !self.set(key, value, ttl).await? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    // == Delete Multiple ==
    /// Deletes every key directly against the store, stopping at the first failure.
    pub async fn delete_multiple<I, K>(&self, keys: I) -> Result<bool>
    where
        I: IntoIterator<Item = K>,
        K: Into<String>,
    {
        let keys: Vec<String> = keys.into_iter().map(Into::into).collect();
        validate::keys(keys.iter().map(String::as_str), self.store.max_key_len())?;

        for key in &keys {
            if !self.store.delete_by_key(key).await? {
                warn!("Record store refused delete for key '{}'", key);
                return Ok(false);
            }
        }
        Ok(true)
    }

    // == Expiry ==
    /// Applies the expiry rule against the clock's current instant.
    pub fn is_expired(&self, ttl: u64, created_at: i64) -> bool {
        ttl::is_expired(ttl, created_at, self.clock.now().timestamp())
    }

    /// Backing record store.
    pub(crate) fn store(&self) -> &dyn RecordStore {
        self.store.as_ref()
    }

    /// Returns every raw record, ordered by key.
    pub(crate) async fn scan(&self) -> Result<Vec<(String, String)>> {
        self.store.list_all().await
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::error::CacheError;
    use crate::store::testing::ScriptedStore;
    use crate::store::MemoryRecordStore;
    use chrono::TimeDelta;
    use serde_json::json;

    const START: i64 = 1_700_000_000;

    async fn open(store: Arc<dyn RecordStore>) -> (Cache, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::at_timestamp(START));
        let cache = Cache::open_with_clock(store, clock.clone()).await.unwrap();
        (cache, clock)
    }

    #[tokio::test]
    async fn test_set_and_get() {
        let (cache, _) = open(Arc::new(MemoryRecordStore::new())).await;

        assert!(cache.set("key1", "value1", Ttl::Never).await.unwrap());
        let value: Option<String> = cache.get("key1", None).await.unwrap();

        assert_eq!(value.as_deref(), Some("value1"));
    }

    #[tokio::test]
    async fn test_get_missing_returns_default() {
        let (cache, _) = open(Arc::new(MemoryRecordStore::new())).await;

        let value = cache
            .get("nonexistent", Some("fallback".to_string()))
            .await
            .unwrap();
        assert_eq!(value.as_deref(), Some("fallback"));

        let value: Option<String> = cache.get("nonexistent", None).await.unwrap();
        assert!(value.is_none());
    }

    #[tokio::test]
    async fn test_get_blank_payload_is_missing() {
        let store = Arc::new(MemoryRecordStore::new());
        store.upsert("blank", "").await.unwrap();
        let (cache, _) = open(store).await;

        let value = cache.get("blank", Some(5)).await.unwrap();
        assert_eq!(value, Some(5));
    }

    #[tokio::test]
    async fn test_lazy_eviction_on_get() {
        let store = Arc::new(MemoryRecordStore::new());
        let (cache, clock) = open(store.clone()).await;

        cache.set("k", "v", Ttl::Seconds(1)).await.unwrap();
        clock.advance(1);

        let value = cache.get("k", Some("fallback".to_string())).await.unwrap();
        assert_eq!(value.as_deref(), Some("fallback"));
        assert!(store.get_by_key("k").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_entry_alive_until_ttl_elapses() {
        let (cache, clock) = open(Arc::new(MemoryRecordStore::new())).await;

        cache.set("k", &42, Ttl::Seconds(10)).await.unwrap();
        clock.advance(9);
        assert_eq!(cache.get::<i32>("k", None).await.unwrap(), Some(42));

        clock.advance(1);
        assert_eq!(cache.get::<i32>("k", None).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_zero_ttl_never_expires() {
        let (cache, clock) = open(Arc::new(MemoryRecordStore::new())).await;

        cache.set("forever", "v", Ttl::Seconds(0)).await.unwrap();
        clock.advance(100 * 365 * 86_400);

        let value: Option<String> = cache.get("forever", None).await.unwrap();
        assert_eq!(value.as_deref(), Some("v"));
    }

    #[tokio::test]
    async fn test_duration_ttl_resolved_at_write() {
        let store = Arc::new(MemoryRecordStore::new());
        let (cache, clock) = open(store.clone()).await;

        cache
            .set("k", "v", TimeDelta::minutes(2))
            .await
            .unwrap();

        let payload = store.get_by_key("k").await.unwrap().unwrap();
        let header = envelope::decode_header(&payload).unwrap().unwrap();
        assert_eq!(header.ttl, 120);
        assert_eq!(header.created_at, START);

        clock.advance(120);
        assert!(cache.get::<String>("k", None).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_overwrite_replaces_envelope() {
        let store = Arc::new(MemoryRecordStore::new());
        let (cache, clock) = open(store.clone()).await;

        cache.set("k", "v1", Ttl::Seconds(5)).await.unwrap();
        clock.advance(4);
        cache.set("k", "v2", Ttl::Never).await.unwrap();
        clock.advance(10);

        let value: Option<String> = cache.get("k", None).await.unwrap();
        assert_eq!(value.as_deref(), Some("v2"));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_round_trip_nested_value() {
        let (cache, _) = open(Arc::new(MemoryRecordStore::new())).await;
        let value = json!({"list": [1, 2, {"deep": true}], "n": -3.5, "s": "text"});

        cache.set("nested", &value, Ttl::Never).await.unwrap();
        let stored: Option<Value> = cache.get("nested", None).await.unwrap();

        assert_eq!(stored, Some(value));
    }

    #[tokio::test]
    async fn test_get_with_wrong_type_fails() {
        let (cache, _) = open(Arc::new(MemoryRecordStore::new())).await;
        cache.set("k", "text", Ttl::Never).await.unwrap();

        let result = cache.get::<u32>("k", None).await;
        assert!(matches!(result, Err(CacheError::Serialization(_))));
    }

    #[tokio::test]
    async fn test_has_reports_raw_existence() {
        let (cache, clock) = open(Arc::new(MemoryRecordStore::new())).await;

        cache.set("k", "v", Ttl::Seconds(1)).await.unwrap();
        clock.advance(5);

        // Expired but not yet swept or read
        assert!(cache.has("k").await.unwrap());
        assert!(cache.get::<String>("k", None).await.unwrap().is_none());
        assert!(!cache.has("k").await.unwrap());
    }

    #[tokio::test]
    async fn test_delete_and_clear() {
        let (cache, _) = open(Arc::new(MemoryRecordStore::new())).await;

        cache.set("a", "1", Ttl::Never).await.unwrap();
        cache.set("b", "2", Ttl::Never).await.unwrap();

        assert!(cache.delete("a").await.unwrap());
        assert!(cache.delete("a").await.unwrap());
        assert!(!cache.has("a").await.unwrap());

        assert!(cache.clear().await.unwrap());
        assert!(!cache.has("b").await.unwrap());
    }

    #[tokio::test]
    async fn test_invalid_key_rejected_before_store_access() {
        let store = Arc::new(ScriptedStore::new());
        let (cache, _) = open(store.clone()).await;
        let calls = store.calls();

        assert!(matches!(
            cache.get::<String>("", None).await,
            Err(CacheError::InvalidArgument(_))
        ));
        assert!(matches!(
            cache.set("", "v", Ttl::Never).await,
            Err(CacheError::InvalidArgument(_))
        ));
        assert!(matches!(cache.delete("").await, Err(CacheError::InvalidArgument(_))));
        assert!(matches!(cache.has("").await, Err(CacheError::InvalidArgument(_))));

        assert_eq!(store.calls(), calls);
    }

    #[tokio::test]
    async fn test_backend_key_limit_enforced() {
        let store = Arc::new(ScriptedStore {
            max_key_len: Some(4),
            ..ScriptedStore::default()
        });
        let (cache, _) = open(store).await;

        assert!(cache.set("abcd", "v", Ttl::Never).await.unwrap());
        assert!(matches!(
            cache.set("abcde", "v", Ttl::Never).await,
            Err(CacheError::InvalidArgument(_))
        ));
    }

    #[tokio::test]
    async fn test_negative_duration_rejected_before_store_access() {
        let store = Arc::new(ScriptedStore::new());
        let (cache, _) = open(store.clone()).await;
        let calls = store.calls();

        let result = cache.set("k", "v", TimeDelta::seconds(-10)).await;
        assert!(matches!(result, Err(CacheError::InvalidArgument(_))));
        assert_eq!(store.calls(), calls);
    }

    #[tokio::test]
    async fn test_refused_write_returns_false() {
        let (cache, _) = open(Arc::new(ScriptedStore::rejecting_writes(&["k"]))).await;
        assert!(!cache.set("k", "v", Ttl::Never).await.unwrap());
    }

    #[tokio::test]
    async fn test_get_multiple_shares_default() {
        let (cache, _) = open(Arc::new(MemoryRecordStore::new())).await;
        cache.set("a", &1, Ttl::Never).await.unwrap();
        cache.set("b", &2, Ttl::Never).await.unwrap();

        let values = cache.get_multiple(["a", "b", "c"], Some(0)).await.unwrap();

        assert_eq!(values.len(), 3);
        assert_eq!(values["a"], Some(1));
        assert_eq!(values["b"], Some(2));
        assert_eq!(values["c"], Some(0));
    }

    #[tokio::test]
    async fn test_set_multiple_fail_fast_keeps_earlier_writes() {
        let store = Arc::new(ScriptedStore::rejecting_writes(&["b"]));
        let (cache, _) = open(store.clone()).await;

        let entries = vec![("a", 1), ("b", 2), ("c", 3)];
        assert!(!cache.set_multiple(entries, Ttl::Seconds(60)).await.unwrap());

        assert!(cache.has("a").await.unwrap());
        assert!(!cache.has("b").await.unwrap());
        assert!(!cache.has("c").await.unwrap());
    }

    #[tokio::test]
    async fn test_set_multiple_success() {
        let (cache, _) = open(Arc::new(MemoryRecordStore::new())).await;
        let entries: HashMap<String, Value> =
            HashMap::from([("x".to_string(), json!(1)), ("y".to_string(), json!("two"))]);

        assert!(cache.set_multiple(entries, Ttl::Never).await.unwrap());
        assert_eq!(cache.get::<Value>("y", None).await.unwrap(), Some(json!("two")));
    }

    #[tokio::test]
    async fn test_set_multiple_bad_key_writes_nothing() {
        let store = Arc::new(ScriptedStore::new());
        let (cache, _) = open(store.clone()).await;
        let calls = store.calls();

        let result = cache.set_multiple(vec![("a", 1), ("", 2)], Ttl::Never).await;
        assert!(matches!(result, Err(CacheError::InvalidArgument(_))));
        assert_eq!(store.calls(), calls);
    }

    #[tokio::test]
    async fn test_delete_multiple_fail_fast() {
        let store = Arc::new(ScriptedStore::rejecting_deletes(&["b"]));
        let (cache, _) = open(store.clone()).await;
        for key in ["a", "b", "c"] {
            cache.set(key, "v", Ttl::Never).await.unwrap();
        }

        assert!(!cache.delete_multiple(["a", "b", "c"]).await.unwrap());

        assert!(!cache.has("a").await.unwrap());
        assert!(cache.has("b").await.unwrap());
        assert!(cache.has("c").await.unwrap());
    }

    #[tokio::test]
    async fn test_delete_multiple_success() {
        let (cache, _) = open(Arc::new(MemoryRecordStore::new())).await;
        cache.set("a", "v", Ttl::Never).await.unwrap();

        assert!(cache.delete_multiple(vec!["a".to_string(), "missing".to_string()]).await.unwrap());
        assert!(!cache.has("a").await.unwrap());
    }

    #[tokio::test]
    async fn test_delete_multiple_invalid_batch_deletes_nothing() {
        let store = Arc::new(ScriptedStore::default());
        let (cache, _) = open(store.clone()).await;
        cache.set("a", "v", Ttl::Never).await.unwrap();
        let calls = store.calls();

        let result = cache.delete_multiple(["a", ""]).await;

        assert!(matches!(result, Err(CacheError::InvalidArgument(_))));
        assert_eq!(store.calls(), calls);
        assert!(cache.has("a").await.unwrap());
    }
}
