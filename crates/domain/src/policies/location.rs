//! Location policy.

use super::{own_enrollment, CapabilitySet, ResourcePolicy};
use crate::models::{Enrollment, Requestor};

#[derive(Debug, Clone, Copy)]
pub struct LocationPolicy<'a> {
    enrollment: Option<&'a Enrollment>,
}

impl<'a> LocationPolicy<'a> {
    pub fn new(requestor: &'a Requestor, enrollment: Option<&'a Enrollment>) -> Self {
        Self {
            enrollment: own_enrollment(requestor, enrollment),
        }
    }

    pub fn evaluate(requestor: &Requestor, enrollment: Option<&Enrollment>) -> CapabilitySet {
        LocationPolicy::new(requestor, enrollment).summary()
    }

    fn teaching(&self) -> bool {
        self.enrollment.is_some_and(Enrollment::is_teaching)
    }
}

impl ResourcePolicy for LocationPolicy<'_> {
    fn can_view(&self) -> bool {
        self.enrollment.is_some_and(Enrollment::is_active)
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
