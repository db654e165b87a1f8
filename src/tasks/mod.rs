//! Background Tasks Module
//!
//! Contains background tasks that run periodically during server operation.
//!
//! # Tasks
//! - Garbage collection: sweeps expired cache entries at configured intervals

mod gc;

pub use gc::spawn_gc_task;
