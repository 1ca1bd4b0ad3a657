//! Domain services for course attendance.
//!
//! Services contain business logic that operates on domain models.

pub mod attendance_report;

pub use attendance_report::{AttendanceReport, ReportEvent, StudentAttendanceRecord};
