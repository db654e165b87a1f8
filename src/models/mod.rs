//! Request and Response models for the cache server API
//!
//! This module defines the DTOs (Data Transfer Objects) used for
//! serializing/deserializing HTTP request and response bodies.

pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use requests::{KeysRequest, SetMultipleRequest, SetRequest};
pub use responses::{
    GcResponse, GetMultipleResponse, GetResponse, HasResponse, HealthResponse, KeyOpResponse,
    SuccessResponse,
};
