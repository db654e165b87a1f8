//! SQL record store
//!
//! Keeps one row per key in a two-column table through the sqlx `Any` driver, so
//! the same queries serve PostgreSQL in production and SQLite in tests.

use async_trait::async_trait;
use sqlx::any::{install_default_drivers, AnyPoolOptions};
use sqlx::{AnyPool, Row};
use tracing::{debug, info};

use super::RecordStore;
use crate::error::{CacheError, Result};

/// Width of the `cache_key` column.
pub const SQL_MAX_KEY_LENGTH: usize = 40;

// == SQL Record Store ==
/// Record store backed by a relational table.
#[derive(Debug, Clone)]
pub struct SqlRecordStore {
    pool: AnyPool,
    table: String,
}

impl SqlRecordStore {
    // == Connect ==
    /// Opens a connection pool to `url` and creates `table` if it is missing.
    ///
    /// # Arguments
    /// * `url` - Database URL (`postgres://...`, `sqlite::memory:`, ...)
    /// * `table` - Table name, a plain SQL identifier
    /// * `max_connections` - Pool size
    pub async fn connect(url: &str, table: &str, max_connections: u32) -> Result<Self> {
        check_table_name(table)?;
        install_default_drivers();

        let pool = AnyPoolOptions::new()
            .max_connections(max_connections)
            .connect(url)
            .await?;

        let store = Self {
            pool,
            table: table.to_string(),
        };
        store.ensure_table().await?;
        info!("Record store ready on table '{}'", store.table);
        Ok(store)
    }

    async fn ensure_table(&self) -> Result<()> {
        let sql = format!(
            "CREATE TABLE IF NOT EXISTS {} (
                cache_key VARCHAR({}) NOT NULL,
                cache_value TEXT,
                PRIMARY KEY (cache_key)
            )",
            self.table, SQL_MAX_KEY_LENGTH
        );
        sqlx::query(&sql).execute(&self.pool).await?;
        Ok(())
    }
}

#[async_trait]
impl RecordStore for SqlRecordStore {
    async fn get_by_key(&self, key: &str) -> Result<Option<String>> {
        let sql = format!(
            "SELECT cache_value FROM {} WHERE cache_key = $1",
            self.table
        );
        let row = sqlx::query(&sql)
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => Ok(row.try_get::<Option<String>, _>("cache_value")?),
            None => Ok(None),
        }
    }

    async fn upsert(&self, key: &str, payload: &str) -> Result<bool> {
        let sql = format!(
            "INSERT INTO {} (cache_key, cache_value) VALUES ($1, $2)
             ON CONFLICT (cache_key) DO UPDATE SET cache_value = EXCLUDED.cache_value",
            self.table
        );
        sqlx::query(&sql)
            .bind(key)
            .bind(payload)
            .execute(&self.pool)
            .await?;
        Ok(true)
    }

    async fn delete_by_key(&self, key: &str) -> Result<bool> {
        let sql = format!("DELETE FROM {} WHERE cache_key = $1", self.table);
        let done = sqlx::query(&sql).bind(key).execute(&self.pool).await?;
        debug!("Deleted {} row(s) for key '{}'", done.rows_affected(), key);
        Ok(true)
    }

    async fn delete_all(&self) -> Result<bool> {
        let sql = format!("DELETE FROM {}", self.table);
        let done = sqlx::query(&sql).execute(&self.pool).await?;
        debug!("Cleared {} row(s) from '{}'", done.rows_affected(), self.table);
        Ok(true)
    }

    async fn exists_by_key(&self, key: &str) -> Result<bool> {
        let sql = format!(
            "SELECT COUNT(*) AS n FROM {} WHERE cache_key = $1",
            self.table
        );
        let row = sqlx::query(&sql).bind(key).fetch_one(&self.pool).await?;
        let count: i64 = row.try_get("n")?;
        Ok(count > 0)
    }

    async fn list_all(&self) -> Result<Vec<(String, String)>> {
        let sql = format!(
            "SELECT cache_key, cache_value FROM {} ORDER BY cache_key",
            self.table
        );
        let rows = sqlx::query(&sql).fetch_all(&self.pool).await?;

        rows.into_iter()
            .map(|row| -> Result<(String, String)> {
                let key: String = row.try_get("cache_key")?;
                let value: Option<String> = row.try_get("cache_value")?;
                Ok((key, value.unwrap_or_default()))
            })
            .collect()
    }

    fn max_key_len(&self) -> Option<usize> {
        Some(SQL_MAX_KEY_LENGTH)
    }
}

/// The table name is spliced into SQL text, so only plain identifiers pass.
pub(crate) fn check_table_name(table: &str) -> Result<()> {
    let mut chars = table.chars();
    let valid = match chars.next() {
        Some(first) => {
            (first.is_ascii_alphabetic() || first == '_')
                && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        None => false,
    };

    if valid {
        Ok(())
    } else {
        Err(CacheError::Configuration(format!(
            "Table name '{}' must be a plain SQL identifier",
            table
        )))
    }
}
