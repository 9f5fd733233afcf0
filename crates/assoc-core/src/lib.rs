//! Shared web plumbing for the association backend: health handlers,
//! request-id middleware, datetime serialization, tracing setup.

pub mod health;
pub mod middleware;
pub mod serde;
pub mod tracing;
