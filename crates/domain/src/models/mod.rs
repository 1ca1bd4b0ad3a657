//! Domain models for course attendance.

pub mod account;
pub mod attendance;
pub mod course;
pub mod course_role;
pub mod enrollment;
pub mod event;
pub mod geo_location;
pub mod location;

pub use account::{Account, GlobalRole, Requestor};
pub use attendance::Attendance;
pub use course::Course;
pub use course_role::{CourseRole, CourseRoles};
pub use enrollment::{Enrollment, EnrollmentRow, Participant};
pub use event::Event;
pub use geo_location::{CoordinateValue, GeoLocation, DEFAULT_GEOFENCE_RADIUS_KM};
pub use location::Location;
