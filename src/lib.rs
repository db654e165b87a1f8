//! Tablecache - A persistent key-value cache with TTL expiry
//!
//! Layers cache semantics (expiry, lazy eviction, garbage collection) on top of
//! a relational record store.

pub mod api;
pub mod cache;
pub mod clock;
pub mod config;
pub mod error;
pub mod models;
pub mod store;
pub mod tasks;

pub use api::AppState;
pub use cache::{Cache, Ttl};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::Config;
pub use error::{CacheError, Result};
pub use store::{MemoryRecordStore, RecordStore, SqlRecordStore};
pub use tasks::spawn_gc_task;
