//! Shared utilities and common types for the course attendance backend.
//!
//! This crate provides common functionality used across all other crates:
//! - JWT access tokens carrying an account's global roles
//! - Password hashing with Argon2id
//! - Coordinate validation helpers

pub mod jwt;
pub mod password;
pub mod validation;
