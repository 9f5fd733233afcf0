pub mod activities;
pub mod auth;
pub mod dashboard;
pub mod dto;
pub mod registrations;
pub mod upload;
