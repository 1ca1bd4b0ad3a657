//! Course domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::course_role::CourseRoles;
use crate::policies::CapabilitySet;

/// Represents a course.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Course {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub created_by: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request payload for creating a course.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateCourseRequest {
    #[validate(
        length(min = 1, max = 200, message = "Name must be between 1 and 200 characters"),
        custom(function = "shared::validation::validate_not_blank")
    )]
    pub name: String,

    #[validate(length(max = 2000, message = "Description must be at most 2000 characters"))]
    pub description: Option<String>,
}

/// Request payload for updating a course (partial update).
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateCourseRequest {
    #[validate(
        length(min = 1, max = 200, message = "Name must be between 1 and 200 characters"),
        custom(function = "shared::validation::validate_not_blank")
    )]
    pub name: Option<String>,

    #[validate(length(max = 2000, message = "Description must be at most 2000 characters"))]
    pub description: Option<String>,
}

/// Course as seen by a particular requestor.
#[derive(Debug, Clone, Serialize)]
pub struct CourseResponse {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub created_by: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Requestor's roles in this course; empty when not enrolled
    pub your_roles: CourseRoles,
    /// Requestor's capabilities on this course
    pub policies: CapabilitySet,
}

impl CourseResponse {
    pub fn new(course: Course, your_roles: CourseRoles, policies: CapabilitySet) -> Self {
        Self {
            id: course.id,
            name: course.name,
            description: course.description,
            created_by: course.created_by,
            created_at: course.created_at,
            updated_at: course.updated_at,
            your_roles,
            policies,
        }
    }
}

/// Response for listing courses.
#[derive(Debug, Clone, Serialize)]
pub struct ListCoursesResponse {
    pub data: Vec<CourseResponse>,
    pub count: usize,
}
