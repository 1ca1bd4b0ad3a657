//! Request-level services shared by the route handlers.

pub mod access;
pub mod admin_bootstrap;
pub mod auth;
pub mod check_in;

pub use access::CourseAccess;
pub use auth::AuthService;
