//! Resource policies.
//!
//! A policy maps the requestor's global roles and their enrollment in the
//! relevant course (if any) to a fixed set of capabilities. Policies are
//! pure: they never fail and never touch storage. A denied capability is
//! `false`; turning that into a `Forbidden` response is the caller's job.
//!
//! | Resource   | view_all | view     | create   | update   | delete         |
//! |------------|----------|----------|----------|----------|----------------|
//! | Course     | admin    | enrolled | creator  | teaching | owner or admin |
//! | Event      | -        | teaching | teaching | teaching | teaching       |
//! | Location   | -        | enrolled | teaching | teaching | teaching       |
//! | Attendance | teaching | enrolled | enrolled | enrolled | -              |

pub mod attendance;
pub mod course;
pub mod event;
pub mod location;

pub use attendance::AttendancePolicy;
pub use course::CoursePolicy;
pub use event::EventPolicy;
pub use location::LocationPolicy;

use serde::Serialize;
use std::fmt;

use crate::error::DomainError;
use crate::models::{Enrollment, Requestor};

/// One checkable operation on a resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    View,
    ViewAll,
    Create,
    Update,
    Delete,
}

impl Capability {
    pub fn as_str(&self) -> &'static str {
        match self {
            Capability::View => "view",
            Capability::ViewAll => "view_all",
            Capability::Create => "create",
            Capability::Update => "update",
            Capability::Delete => "delete",
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Every capability of a policy, evaluated at once.
///
/// Capabilities a resource does not support are always `false`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct CapabilitySet {
    pub can_view: bool,
    pub can_view_all: bool,
    pub can_create: bool,
    pub can_update: bool,
    pub can_delete: bool,
}

impl CapabilitySet {
    pub fn allows(&self, capability: Capability) -> bool {
        match capability {
            Capability::View => self.can_view,
            Capability::ViewAll => self.can_view_all,
            Capability::Create => self.can_create,
            Capability::Update => self.can_update,
            Capability::Delete => self.can_delete,
        }
    }

    /// Converts a denied capability into [`DomainError::Forbidden`].
    pub fn ensure(&self, capability: Capability, resource: &str) -> Result<(), DomainError> {
        if self.allows(capability) {
            Ok(())
        } else {
            Err(DomainError::Forbidden(format!(
                "not allowed to {} {}",
                capability, resource
            )))
        }
    }
}

/// Capability contract shared by every resource policy.
pub trait ResourcePolicy {
    fn can_view(&self) -> bool;

    fn can_view_all(&self) -> bool {
        false
    }

    fn can_create(&self) -> bool;

    fn can_update(&self) -> bool;

    fn can_delete(&self) -> bool {
        false
    }

    /// All capabilities, for bulk serialization.
    fn summary(&self) -> CapabilitySet {
        CapabilitySet {
            can_view: self.can_view(),
            can_view_all: self.can_view_all(),
            can_create: self.can_create(),
            can_update: self.can_update(),
            can_delete: self.can_delete(),
        }
    }

    fn allows(&self, capability: Capability) -> bool {
        match capability {
            Capability::View => self.can_view(),
            Capability::ViewAll => self.can_view_all(),
            Capability::Create => self.can_create(),
            Capability::Update => self.can_update(),
            Capability::Delete => self.can_delete(),
        }
    }
}

/// The requestor's own enrollment; an enrollment belonging to another
/// account counts as no enrollment.
pub(crate) fn own_enrollment<'a>(
    requestor: &Requestor,
    enrollment: Option<&'a Enrollment>,
) -> Option<&'a Enrollment> {
    enrollment.filter(|e| e.account_id == requestor.account_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::enrollment::fixtures::enrollment;
    use crate::models::GlobalRole;

    #[test]
    fn test_capability_set_allows() {
        let set = CapabilitySet {
            can_view: true,
            can_update: true,
            ..Default::default()
        };
        assert!(set.allows(Capability::View));
        assert!(set.allows(Capability::Update));
        assert!(!set.allows(Capability::ViewAll));
        assert!(!set.allows(Capability::Create));
        assert!(!set.allows(Capability::Delete));
    }

    #[test]
    fn test_capability_set_ensure() {
        let set = CapabilitySet::default();
        match set.ensure(Capability::Delete, "event") {
            Err(DomainError::Forbidden(msg)) => assert_eq!(msg, "not allowed to delete event"),
            other => panic!("Expected Forbidden, got {:?}", other),
        }

        let set = CapabilitySet {
            can_create: true,
            ..Default::default()
        };
        assert!(set.ensure(Capability::Create, "course").is_ok());
    }

    #[test]
    fn test_capability_set_serialization() {
        let json = serde_json::to_value(CapabilitySet::default()).unwrap();
        for key in [
            "can_view",
            "can_view_all",
            "can_create",
            "can_update",
            "can_delete",
        ] {
            assert_eq!(json[key], false);
        }
    }

    #[test]
    fn test_own_enrollment_filters_other_accounts() {
        let requestor = Requestor::new(1, [GlobalRole::Member]);
        let mine = enrollment(1, 10, &["student"]);
        let theirs = enrollment(2, 10, &["owner"]);

        assert!(own_enrollment(&requestor, Some(&mine)).is_some());
        assert!(own_enrollment(&requestor, Some(&theirs)).is_none());
        assert!(own_enrollment(&requestor, None).is_none());
    }

    #[test]
    fn test_summary_matches_individual_checks() {
        let requestor = Requestor::new(1, [GlobalRole::Admin, GlobalRole::Creator]);
        let cases = [
            None,
            Some(enrollment(1, 10, &["student"])),
            Some(enrollment(1, 10, &["staff"])),
            Some(enrollment(1, 10, &["owner", "student"])),
        ];
        for case in &cases {
            let policies: Vec<Box<dyn ResourcePolicy>> = vec![
                Box::new(CoursePolicy::new(&requestor, case.as_ref())),
                Box::new(EventPolicy::new(&requestor, case.as_ref())),
                Box::new(LocationPolicy::new(&requestor, case.as_ref())),
                Box::new(AttendancePolicy::new(&requestor, case.as_ref())),
            ];
            for policy in policies {
                let summary = policy.summary();
                for capability in [
                    Capability::View,
                    Capability::ViewAll,
                    Capability::Create,
                    Capability::Update,
                    Capability::Delete,
                ] {
                    assert_eq!(summary.allows(capability), policy.allows(capability));
                }
            }
        }
    }
}
