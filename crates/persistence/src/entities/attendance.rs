//! Attendance entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::GeoLocation;
use sqlx::FromRow;

/// Database row mapping for the attendances table.
#[derive(Debug, Clone, FromRow)]
pub struct AttendanceEntity {
    pub id: i64,
    pub account_id: i64,
    pub course_id: i64,
    pub event_id: i64,
    pub longitude: Option<f64>,
    pub latitude: Option<f64>,
    pub created_at: DateTime<Utc>,
}

impl From<AttendanceEntity> for domain::models::Attendance {
    fn from(entity: AttendanceEntity) -> Self {
        Self {
            id: entity.id,
            account_id: entity.account_id,
            course_id: entity.course_id,
            event_id: entity.event_id,
            geo: GeoLocation::from_columns(entity.longitude, entity.latitude),
            created_at: entity.created_at,
        }
    }
}
