//! Per-request course access: the course plus the requestor's enrollment
//! in it, and the policies evaluated over them.

use domain::models::{Course, Enrollment, Requestor};
use domain::policies::{
    AttendancePolicy, Capability, CoursePolicy, EventPolicy, LocationPolicy, ResourcePolicy,
};
use persistence::repositories::{CourseRepository, EnrollmentRepository};
use sqlx::PgPool;

use crate::error::ApiError;

pub const NOT_ENROLLED: &str = "You are not enrolled in this course";

/// A course as seen by one requestor.
#[derive(Debug, Clone)]
pub struct CourseAccess {
    pub requestor: Requestor,
    pub course: Course,
    pub enrollment: Option<Enrollment>,
}

impl CourseAccess {
    /// Loads the course and the requestor's enrollment. Unknown course is 404.
    pub async fn load(
        pool: &PgPool,
        course_id: i64,
        requestor: &Requestor,
    ) -> Result<Self, ApiError> {
        let course = CourseRepository::new(pool.clone())
            .find_by_id(course_id)
            .await?
            .ok_or_else(|| ApiError::NotFound("Course not found".to_string()))?;

        let rows = EnrollmentRepository::new(pool.clone())
            .rows_for_account_in_course(course_id, requestor.account_id)
            .await?;
        let enrollment = Enrollment::aggregate_one(rows.into_iter().map(Into::into))?;

        Ok(Self {
            requestor: requestor.clone(),
            course: course.into(),
            enrollment,
        })
    }

    pub fn course_id(&self) -> i64 {
        self.course.id
    }

    pub fn course_policy(&self) -> CoursePolicy<'_> {
        CoursePolicy::new(&self.requestor, self.enrollment.as_ref())
    }

    pub fn event_policy(&self) -> EventPolicy<'_> {
        EventPolicy::new(&self.requestor, self.enrollment.as_ref())
    }

    pub fn location_policy(&self) -> LocationPolicy<'_> {
        LocationPolicy::new(&self.requestor, self.enrollment.as_ref())
    }

    pub fn attendance_policy(&self) -> AttendancePolicy<'_> {
        AttendancePolicy::new(&self.requestor, self.enrollment.as_ref())
    }

    pub fn is_enrolled(&self) -> bool {
        self.enrollment.as_ref().is_some_and(Enrollment::is_active)
    }

    /// Fails with 403 unless `policy` grants `capability`.
    ///
    /// The message tells "not enrolled" apart from "enrolled without a
    /// sufficient role".
    pub fn require(
        &self,
        policy: &impl ResourcePolicy,
        capability: Capability,
        resource: &str,
    ) -> Result<(), ApiError> {
        if policy.allows(capability) {
            return Ok(());
        }

        tracing::debug!(
            account_id = self.requestor.account_id,
            course_id = self.course.id,
            capability = %capability,
            resource,
            "Capability denied"
        );

        if self.is_enrolled() {
            Err(ApiError::Forbidden(format!(
                "Your course roles do not allow you to {} {}",
                capability, resource
            )))
        } else {
            Err(ApiError::Forbidden(NOT_ENROLLED.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use domain::models::{EnrollmentRow, GlobalRole};

    fn access(account_id: i64, roles: &[&str], global: &[GlobalRole]) -> CourseAccess {
        let now = Utc::now();
        let rows = roles.iter().enumerate().map(|(i, role)| EnrollmentRow {
            id: i as i64 + 1,
            account_id,
            course_id: 10,
            role_name: role.to_string(),
            email: "ada@example.com".to_string(),
            name: "Ada".to_string(),
            avatar: None,
            created_at: now,
            updated_at: now,
        });
        CourseAccess {
            requestor: Requestor::new(account_id, global.iter().copied()),
            course: Course {
                id: 10,
                name: "Compilers".to_string(),
                description: None,
                created_by: Some(1),
                created_at: now,
                updated_at: now,
            },
            enrollment: Enrollment::aggregate_one(rows).unwrap(),
        }
    }

    fn forbidden_message(result: Result<(), ApiError>) -> String {
        match result {
            Err(ApiError::Forbidden(msg)) => msg,
            other => panic!("Expected Forbidden error, got {:?}", other),
        }
    }

    #[test]
    fn test_not_enrolled_message() {
        let access = access(1, &[], &[GlobalRole::Member]);
        assert!(!access.is_enrolled());
        let msg = forbidden_message(access.require(
            &access.course_policy(),
            Capability::View,
            "course",
        ));
        assert_eq!(msg, NOT_ENROLLED);
    }

    #[test]
    fn test_insufficient_role_message() {
        let access = access(1, &["student"], &[GlobalRole::Member]);
        assert!(access.is_enrolled());
        let msg = forbidden_message(access.require(
            &access.event_policy(),
            Capability::Create,
            "event",
        ));
        assert_eq!(msg, "Your course roles do not allow you to create event");
    }

    #[test]
    fn test_teaching_roles_pass() {
        let access = access(1, &["staff"], &[GlobalRole::Member]);
        assert!(access
            .require(&access.event_policy(), Capability::Update, "event")
            .is_ok());
        assert!(access
            .require(&access.attendance_policy(), Capability::ViewAll, "attendances")
            .is_ok());
    }

    #[test]
    fn test_admin_can_delete_without_enrollment() {
        let access = access(1, &[], &[GlobalRole::Admin]);
        assert!(access
            .require(&access.course_policy(), Capability::Delete, "course")
            .is_ok());
        assert!(access
            .require(&access.course_policy(), Capability::Update, "course")
            .is_err());
    }
}
