//! Domain types shared across the association backend.
//!
//! This crate contains only pure types with no framework dependencies.
//! Import in `usecase/` and `domain/` layers; never in `infra/` or `handlers/`.

pub mod activity;
pub mod pagination;
pub mod registration;
pub mod user;
