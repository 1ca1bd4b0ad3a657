//! Database entity definitions.
//!
//! Entities are direct mappings to database rows.

pub mod account;
pub mod attendance;
pub mod course;
pub mod enrollment;
pub mod event;
pub mod location;

pub use account::AccountEntity;
pub use attendance::AttendanceEntity;
pub use course::{CourseEntity, CourseRoleEntity};
pub use enrollment::EnrollmentRowEntity;
pub use event::EventEntity;
pub use location::LocationEntity;
