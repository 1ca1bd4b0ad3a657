//! Event policy.

use super::{own_enrollment, CapabilitySet, ResourcePolicy};
use crate::models::{Enrollment, Requestor};

/// Capabilities on a course's events. Only teaching roles manage or list
/// events; students interact with them through attendance.
#[derive(Debug, Clone, Copy)]
pub struct EventPolicy<'a> {
    enrollment: Option<&'a Enrollment>,
}

impl<'a> EventPolicy<'a> {
    pub fn new(requestor: &'a Requestor, enrollment: Option<&'a Enrollment>) -> Self {
        Self {
            enrollment: own_enrollment(requestor, enrollment),
        }
    }

    pub fn evaluate(requestor: &Requestor, enrollment: Option<&Enrollment>) -> CapabilitySet {
        EventPolicy::new(requestor, enrollment).summary()
    }

    fn teaching(&self) -> bool {
        self.enrollment.is_some_and(Enrollment::is_teaching)
    }
}

impl ResourcePolicy for EventPolicy<'_> {
    fn can_view(&self) -> bool {
        self.teaching()
    }

    fn can_create(&self) -> bool {
        self.teaching()
    }

    fn can_update(&self) -> bool {
        self.teaching()
    }

    fn can_delete(&self) -> bool {
        self.teaching()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::enrollment::fixtures::enrollment;
    use crate::models::GlobalRole;

    #[test]
    fn test_teaching_roles_have_full_access() {
        let requestor = Requestor::new(1, [GlobalRole::Member]);
        for role in ["owner", "instructor", "staff"] {
            let e = enrollment(1, 10, &[role]);
            let caps = EventPolicy::evaluate(&requestor, Some(&e));
            assert!(caps.can_view && caps.can_create && caps.can_update && caps.can_delete);
            assert!(!caps.can_view_all);
        }
    }

    #[test]
    fn test_student_has_no_access() {
        let requestor = Requestor::new(1, [GlobalRole::Member]);
        let e = enrollment(1, 10, &["student"]);
        assert_eq!(
            EventPolicy::evaluate(&requestor, Some(&e)),
            CapabilitySet::default()
        );
    }

    #[test]
    fn test_admin_without_enrollment_has_no_access() {
        let admin = Requestor::new(1, [GlobalRole::Admin, GlobalRole::Creator]);
        assert_eq!(EventPolicy::evaluate(&admin, None), CapabilitySet::default());
    }
}
