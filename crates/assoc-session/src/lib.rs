//! Session types for the association backend.
//!
//! Provides signed-session (JWT) issuance/validation and cookie builders.
//! The service composes these into an axum extractor.

pub mod cookie;
pub mod token;
