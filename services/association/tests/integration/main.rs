
mod activity_test;
mod auth_test;
mod dashboard_test;
mod registration_test;
