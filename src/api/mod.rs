//! API Module
//!
//! HTTP handlers and routing for the cache server REST API.
//!
//! # Endpoints
//! - `PUT /set` - Store a JSON value with optional TTL
//! - `GET /get/:key` - Retrieve a value by key
//! - `DELETE /del/:key` - Delete a key
//! - `GET /has/:key` - Raw existence check
//! - `DELETE /clear` - Remove every entry
//! - `POST /mget`, `PUT /mset`, `POST /mdel` - Batch variants
//! - `POST /gc` - Run a garbage-collection sweep
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
