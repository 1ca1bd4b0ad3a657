//! Attendance policy.

use super::{own_enrollment, CapabilitySet, ResourcePolicy};
use crate::models::{Enrollment, Requestor};

/// Capabilities on attendance records.
///
/// Any enrolled account may check in and read its own records; teaching
/// roles read everyone's. Records are never deleted.
#[derive(Debug, Clone, Copy)]
pub struct AttendancePolicy<'a> {
    enrollment: Option<&'a Enrollment>,
}

impl<'a> AttendancePolicy<'a> {
    pub fn new(requestor: &'a Requestor, enrollment: Option<&'a Enrollment>) -> Self {
        Self {
            enrollment: own_enrollment(requestor, enrollment),
        }
    }

    pub fn evaluate(requestor: &Requestor, enrollment: Option<&Enrollment>) -> CapabilitySet {
        AttendancePolicy::new(requestor, enrollment).summary()
    }

    fn active(&self) -> bool {
        self.enrollment.is_some_and(Enrollment::is_active)
    }
}

impl ResourcePolicy for AttendancePolicy<'_> {
    fn can_view_all(&self) -> bool {
        self.enrollment.is_some_and(Enrollment::is_teaching)
    }

    fn can_view(&self) -> bool {
        self.active()
    }

    fn can_create(&self) -> bool {
        self.active()
    }

    fn can_update(&self) -> bool {
        self.active()
    }
}
