//! HTTP route handlers.

pub mod accounts;
pub mod attendances;
pub mod auth;
pub mod courses;
pub mod enrollments;
pub mod events;
pub mod health;
pub mod locations;
pub mod reports;
