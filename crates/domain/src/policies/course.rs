//! Course policy.

use super::{own_enrollment, CapabilitySet, ResourcePolicy};
use crate::models::{Enrollment, Requestor};

/// Capabilities on a course.
///
/// Admins see every course and may delete any of them, but viewing or
/// updating a single course still requires an enrollment in it.
#[derive(Debug, Clone, Copy)]
pub struct CoursePolicy<'a> {
    requestor: &'a Requestor,
    enrollment: Option<&'a Enrollment>,
}

impl<'a> CoursePolicy<'a> {
    pub fn new(requestor: &'a Requestor, enrollment: Option<&'a Enrollment>) -> Self {
        Self {
            requestor,
            enrollment: own_enrollment(requestor, enrollment),
        }
    }

    pub fn evaluate(requestor: &Requestor, enrollment: Option<&Enrollment>) -> CapabilitySet {
        CoursePolicy::new(requestor, enrollment).summary()
    }
}

impl ResourcePolicy for CoursePolicy<'_> {
    fn can_view_all(&self) -> bool {
        self.requestor.is_admin()
    }

    fn can_view(&self) -> bool {
        self.enrollment.is_some_and(Enrollment::is_active)
    }

    fn can_create(&self) -> bool {
        self.requestor.is_creator()
    }

    fn can_update(&self) -> bool {
        self.enrollment.is_some_and(Enrollment::is_teaching)
    }

    fn can_delete(&self) -> bool {
        match self.enrollment {
            Some(enrollment) if enrollment.is_owner() => true,
            _ => self.requestor.is_admin(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::enrollment::fixtures::enrollment;
    use crate::models::GlobalRole;

    fn member() -> Requestor {
        Requestor::new(1, [GlobalRole::Member])
    }

    #[test]
    fn test_unenrolled_member() {
        let caps = CoursePolicy::evaluate(&member(), None);
        assert_eq!(caps, CapabilitySet::default());
    }

    #[test]
    fn test_creator_can_create_without_enrollment() {
        let creator = Requestor::new(1, [GlobalRole::Creator]);
        let caps = CoursePolicy::evaluate(&creator, None);
        assert!(caps.can_create);
        assert!(!caps.can_view);
        assert!(!caps.can_delete);
    }

    #[test]
    fn test_admin_without_enrollment() {
        let admin = Requestor::new(1, [GlobalRole::Admin]);
        let caps = CoursePolicy::evaluate(&admin, None);
        assert!(caps.can_view_all);
        assert!(caps.can_delete);
        assert!(!caps.can_view);
        assert!(!caps.can_update);
        assert!(!caps.can_create);
    }

    #[test]
    fn test_student() {
        let e = enrollment(1, 10, &["student"]);
        let caps = CoursePolicy::evaluate(&member(), Some(&e));
        assert!(caps.can_view);
        assert!(!caps.can_update);
        assert!(!caps.can_delete);
        assert!(!caps.can_view_all);
    }

    #[test]
    fn test_teaching_roles_can_update() {
        for role in ["instructor", "staff"] {
            let e = enrollment(1, 10, &[role]);
            let caps = CoursePolicy::evaluate(&member(), Some(&e));
            assert!(caps.can_view, "{role}");
            assert!(caps.can_update, "{role}");
            assert!(!caps.can_delete, "{role}");
        }
    }

    #[test]
    fn test_owner_can_delete() {
        let e = enrollment(1, 10, &["owner"]);
        let caps = CoursePolicy::evaluate(&member(), Some(&e));
        assert!(caps.can_view);
        assert!(caps.can_update);
        assert!(caps.can_delete);
    }

    #[test]
    fn test_empty_enrollment_is_inactive() {
        let e = enrollment(1, 10, &[]);
        let caps = CoursePolicy::evaluate(&member(), Some(&e));
        assert!(!caps.can_view);
    }

    #[test]
    fn test_foreign_enrollment_ignored() {
        let e = enrollment(2, 10, &["owner"]);
        let caps = CoursePolicy::evaluate(&member(), Some(&e));
        assert!(!caps.can_view);
        assert!(!caps.can_delete);
    }
}
