//! Configuration Module
//!
//! Handles loading and validating configuration from environment variables.

use std::env;

use crate::error::{CacheError, Result};

/// Cache and server configuration parameters.
///
/// All values can be configured via environment variables. Backend credentials
/// have no usable default and must be supplied.
#[derive(Debug, Clone)]
pub struct Config {
    /// Database host
    pub db_host: String,
    /// Database port
    pub db_port: u16,
    /// Database user
    pub db_user: String,
    /// Database password
    pub db_pass: String,
    /// Database name
    pub db_name: String,
    /// Table holding the cache entries
    pub table: String,
    /// Full database URL, overrides the individual connection fields
    pub database_url: Option<String>,
    /// Connection pool size
    pub max_connections: u32,
    /// HTTP server port
    pub server_port: u16,
    /// Garbage collection interval in seconds, 0 = startup sweep only
    pub gc_interval: u64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_DB_HOST` - Database host (default: localhost)
    /// - `CACHE_DB_PORT` - Database port (default: 5432)
    /// - `CACHE_DB_USER` - Database user (required)
    /// - `CACHE_DB_PASS` - Database password (required)
    /// - `CACHE_DB_NAME` - Database name (required)
    /// - `CACHE_TABLE` - Cache table name (default: cache)
    /// - `CACHE_DATABASE_URL` - Full URL, replaces the fields above except the table
    /// - `CACHE_DB_MAX_CONNECTIONS` - Pool size (default: 5)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `GC_INTERVAL` - Sweep frequency in seconds (default: 60)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            db_host: env::var("CACHE_DB_HOST").unwrap_or(defaults.db_host),
            db_port: parse_var("CACHE_DB_PORT").unwrap_or(defaults.db_port),
            db_user: env::var("CACHE_DB_USER").unwrap_or(defaults.db_user),
            db_pass: env::var("CACHE_DB_PASS").unwrap_or(defaults.db_pass),
            db_name: env::var("CACHE_DB_NAME").unwrap_or(defaults.db_name),
            table: env::var("CACHE_TABLE").unwrap_or(defaults.table),
            database_url: env::var("CACHE_DATABASE_URL")
                .ok()
                .filter(|url| !url.is_empty()),
            max_connections: parse_var("CACHE_DB_MAX_CONNECTIONS")
                .unwrap_or(defaults.max_connections),
            server_port: parse_var("SERVER_PORT").unwrap_or(defaults.server_port),
            gc_interval: parse_var("GC_INTERVAL").unwrap_or(defaults.gc_interval),
        }
    }

    /// Checks that every backend setting needed to connect is present.
    ///
    /// When a full database URL is given only the table name is required.
    pub fn validate(&self) -> Result<()> {
        let mut required = vec![("table", self.table.as_str())];
        if self.database_url.is_none() {
            required.extend([
                ("host", self.db_host.as_str()),
                ("user", self.db_user.as_str()),
                ("pass", self.db_pass.as_str()),
                ("dbname", self.db_name.as_str()),
            ]);
        }

        if let Some((name, _)) = required.iter().find(|(_, value)| value.trim().is_empty()) {
            return Err(CacheError::Configuration(format!(
                "Parameter \"{}\" in configuration cannot be empty",
                name
            )));
        }
        if self.max_connections == 0 {
            return Err(CacheError::Configuration(
                "Parameter \"max_connections\" must be at least 1".to_string(),
            ));
        }
        crate::store::check_table_name(&self.table)
    }

    /// Returns the URL the record store connects to.
    pub fn database_url(&self) -> String {
        match &self.database_url {
            Some(url) => url.clone(),
            None => format!(
                "postgres://{}:{}@{}:{}/{}",
                self.db_user, self.db_pass, self.db_host, self.db_port, self.db_name
            ),
        }
    }
}

fn parse_var<T: std::str::FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.parse().ok())
}

impl Default for Config {
    fn default() -> Self {
        Self {
            db_host: "localhost".to_string(),
            db_port: 5432,
            db_user: String::new(),
            db_pass: String::new(),
            db_name: String::new(),
            table: "cache".to_string(),
            database_url: None,
            max_connections: 5,
            server_port: 3000,
            gc_interval: 60,
        }
    }
}
