//! Domain layer for the course attendance backend.
//!
//! This crate contains:
//! - Domain models (courses, events, locations, attendances, accounts)
//! - Course role sets and enrollment aggregation
//! - Resource policies mapping roles to capabilities
//! - The attendance report builder
//! - Domain error types

pub mod error;
pub mod models;
pub mod policies;
pub mod services;

pub use error::{CoordinateError, DomainError};
