pub mod activity;
pub mod auth;
pub mod dashboard;
pub mod registration;
pub mod upload;
