//! sea-orm entities for the association service.

pub mod activities;
pub mod registrations;
pub mod users;
