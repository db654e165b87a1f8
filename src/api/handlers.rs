//! API Handlers
//!
//! HTTP request handlers for each cache server endpoint.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::Value;

use crate::cache::{Cache, Ttl};
use crate::config::Config;
use crate::error::{CacheError, Result};
use crate::models::{
    GcResponse, GetMultipleResponse, GetResponse, HasResponse, HealthResponse, KeyOpResponse,
    KeysRequest, SetMultipleRequest, SetRequest, SuccessResponse,
};
use crate::store::SqlRecordStore;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Shared cache engine
    pub cache: Arc<Cache>,
}

impl AppState {
    /// Creates a new AppState around an opened cache.
    pub fn new(cache: Cache) -> Self {
        Self {
            cache: Arc::new(cache),
        }
    }

    /// Connects the SQL record store described by `config` and opens the
    /// cache on it, which runs the startup sweep.
    pub async fn from_config(config: &Config) -> Result<Self> {
        config.validate()?;
        let store =
            SqlRecordStore::connect(&config.database_url(), &config.table, config.max_connections)
                .await?;
        let cache = Cache::open(Arc::new(store)).await?;
        Ok(Self::new(cache))
    }
}

/// Handler for PUT /set
pub async fn set_handler(
    State(state): State<AppState>,
    Json(req): Json<SetRequest>,
) -> Result<Json<KeyOpResponse>> {
    let success = state.cache.set(&req.key, &req.value, req.ttl()).await?;
    Ok(Json(KeyOpResponse::new(req.key, success)))
}

/// Handler for GET /get/:key
///
/// Missing and expired keys answer 404.
pub async fn get_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<GetResponse>> {
    match state.cache.get::<Value>(&key, None).await? {
        Some(value) => Ok(Json(GetResponse::new(key, value))),
        None => Err(CacheError::NotFound(key)),
    }
}

/// Handler for DELETE /del/:key
pub async fn delete_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<KeyOpResponse>> {
    let success = state.cache.delete(&key).await?;
    Ok(Json(KeyOpResponse::new(key, success)))
}

/// Handler for GET /has/:key
pub async fn has_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<HasResponse>> {
    let exists = state.cache.has(&key).await?;
    Ok(Json(HasResponse { key, exists }))
}

/// Handler for DELETE /clear
pub async fn clear_handler(State(state): State<AppState>) -> Result<Json<SuccessResponse>> {
    let success = state.cache.clear().await?;
    Ok(Json(SuccessResponse { success }))
}

/// Handler for POST /mget
pub async fn get_multiple_handler(
    State(state): State<AppState>,
    Json(req): Json<KeysRequest>,
) -> Result<Json<GetMultipleResponse>> {
    let values = state.cache.get_multiple::<Value, _, _>(req.keys, None).await?;
    Ok(Json(GetMultipleResponse { values }))
}

/// Handler for PUT /mset
pub async fn set_multiple_handler(
    State(state): State<AppState>,
    Json(req): Json<SetMultipleRequest>,
) -> Result<Json<SuccessResponse>> {
    let success = state
        .cache
        .set_multiple(req.entries, Ttl::from(req.ttl))
        .await?;
    Ok(Json(SuccessResponse { success }))
}

/// Handler for POST /mdel
pub async fn delete_multiple_handler(
    State(state): State<AppState>,
    Json(req): Json<KeysRequest>,
) -> Result<Json<SuccessResponse>> {
    let success = state.cache.delete_multiple(req.keys).await?;
    Ok(Json(SuccessResponse { success }))
}

/// Handler for POST /gc
///
/// Runs a garbage-collection sweep on demand.
pub async fn gc_handler(State(state): State<AppState>) -> Result<Json<GcResponse>> {
    let removed = state.cache.collect_garbage().await?;
    Ok(Json(GcResponse { removed }))
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
