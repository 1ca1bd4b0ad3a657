//! Repository implementations for database operations.

pub mod account;
pub mod attendance;
pub mod course;
pub mod course_role;
pub mod enrollment;
pub mod event;
pub mod location;

pub use account::AccountRepository;
pub use attendance::AttendanceRepository;
pub use course::CourseRepository;
pub use course_role::{RoleLookup, RoleLookupError};
pub use enrollment::{EnrollmentRepository, EnrollmentWriteError};
pub use event::EventRepository;
pub use location::LocationRepository;
