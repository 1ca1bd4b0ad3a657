//! Enrollment: one account's aggregated participation in one course.
//!
//! Storage keeps one row per (account, course, role). Every read collapses
//! those rows into a single [`Enrollment`] carrying a [`CourseRoles`] set.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use validator::Validate;

use super::course_role::{CourseRole, CourseRoles};
use crate::error::DomainError;

/// Contact details of an enrolled account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    pub email: String,
    pub name: String,
    pub avatar: Option<String>,
}

/// One raw (account, course, role) row joined with the account's contact
/// fields, as produced by the repository layer.
#[derive(Debug, Clone, PartialEq)]
pub struct EnrollmentRow {
    pub id: i64,
    pub account_id: i64,
    pub course_id: i64,
    pub role_name: String,
    pub email: String,
    pub name: String,
    pub avatar: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Aggregate relationship between one account and one course.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Enrollment {
    /// Lowest id among the underlying rows; carries no meaning of its own.
    pub id: i64,
    pub account_id: i64,
    pub course_id: i64,
    pub participant: Participant,
    pub roles: CourseRoles,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Enrollment {
    /// Collapses raw rows into one enrollment per (course, account) pair.
    ///
    /// Output keeps the order in which each pair first appears. Any role
    /// name outside the course role enumeration fails the whole batch.
    pub fn aggregate<I>(rows: I) -> Result<Vec<Enrollment>, DomainError>
    where
        I: IntoIterator<Item = EnrollmentRow>,
    {
        let mut enrollments: Vec<Enrollment> = Vec::new();
        let mut index: HashMap<(i64, i64), usize> = HashMap::new();

        for row in rows {
            let role: CourseRole = row.role_name.parse()?;
            let key = (row.course_id, row.account_id);

            match index.get(&key) {
                Some(&pos) => {
                    let existing = &mut enrollments[pos];
                    existing.roles = existing.roles.with(role);
                    existing.id = existing.id.min(row.id);
                    existing.created_at = existing.created_at.min(row.created_at);
                    existing.updated_at = existing.updated_at.max(row.updated_at);
                }
                None => {
                    index.insert(key, enrollments.len());
                    enrollments.push(Enrollment {
                        id: row.id,
                        account_id: row.account_id,
                        course_id: row.course_id,
                        participant: Participant {
                            email: row.email,
                            name: row.name,
                            avatar: row.avatar,
                        },
                        roles: std::iter::once(role).collect(),
                        created_at: row.created_at,
                        updated_at: row.updated_at,
                    });
                }
            }
        }

        Ok(enrollments)
    }

    /// Aggregates the rows of a single account/course pair.
    ///
    /// No rows means the account is not enrolled (`None`), which is distinct
    /// from an enrollment with an empty role set.
    pub fn aggregate_one<I>(rows: I) -> Result<Option<Enrollment>, DomainError>
    where
        I: IntoIterator<Item = EnrollmentRow>,
    {
        let mut enrollments = Self::aggregate(rows)?;
        match enrollments.len() {
            0 => Ok(None),
            1 => Ok(enrollments.pop()),
            n => Err(DomainError::InvalidInput(format!(
                "expected rows for one account and course, got {} distinct pairs",
                n
            ))),
        }
    }

    pub fn has_role(&self, name: &str) -> bool {
        self.roles.has_named(name)
    }

    pub fn is_owner(&self) -> bool {
        self.roles.is_owner()
    }

    pub fn is_instructor(&self) -> bool {
        self.roles.is_instructor()
    }

    pub fn is_staff(&self) -> bool {
        self.roles.is_staff()
    }

    pub fn is_student(&self) -> bool {
        self.roles.is_student()
    }

    pub fn is_teaching(&self) -> bool {
        self.roles.is_teaching()
    }

    /// True iff at least one role is held.
    pub fn is_active(&self) -> bool {
        self.roles.any()
    }
}

/// Request payload for setting an account's roles in a course.
///
/// An empty role list removes the account from the course.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SetEnrollmentRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[serde(default)]
    pub roles: Vec<String>,
}

/// Enrollment as returned by the API.
#[derive(Debug, Clone, Serialize)]
pub struct EnrollmentResponse {
    pub account_id: i64,
    pub course_id: i64,
    pub email: String,
    pub name: String,
    pub avatar: Option<String>,
    pub roles: CourseRoles,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Enrollment> for EnrollmentResponse {
    fn from(e: Enrollment) -> Self {
        Self {
            account_id: e.account_id,
            course_id: e.course_id,
            email: e.participant.email,
            name: e.participant.name,
            avatar: e.participant.avatar,
            roles: e.roles,
            created_at: e.created_at,
            updated_at: e.updated_at,
        }
    }
}

/// Response for listing a course's enrollments.
#[derive(Debug, Clone, Serialize)]
pub struct ListEnrollmentsResponse {
    pub data: Vec<EnrollmentResponse>,
    pub count: usize,
}
