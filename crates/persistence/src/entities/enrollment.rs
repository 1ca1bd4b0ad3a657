//! Enrollment row entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// One account_course_roles row joined with its role name and the
/// account's contact fields.
#[derive(Debug, Clone, FromRow)]
pub struct EnrollmentRowEntity {
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

impl From<EnrollmentRowEntity> for domain::models::EnrollmentRow {
    fn from(entity: EnrollmentRowEntity) -> Self {
        Self {
            id: entity.id,
            account_id: entity.account_id,
            course_id: entity.course_id,
            role_name: entity.role_name,
            email: entity.email,
            name: entity.name,
            avatar: entity.avatar,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}
