//! Cache Module
//!
//! TTL cache semantics layered over a record store: the expiry rule, the
//! get/set protocol with lazy eviction, and the garbage-collection sweep.

mod engine;
pub mod envelope;
mod gc;
pub mod ttl;
pub mod validate;


// Re-export public types
pub use engine::Cache;
pub use envelope::{Envelope, EnvelopeHeader, ENVELOPE_VERSION};
pub use ttl::{is_expired, Ttl};
