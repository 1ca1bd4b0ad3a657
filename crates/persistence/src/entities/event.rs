//! Event entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database row mapping for the events table.
#[derive(Debug, Clone, FromRow)]
pub struct EventEntity {
    pub id: i64,
    pub course_id: i64,
    pub location_id: i64,
    pub name: String,
    pub start_at: DateTime<Utc>,
    pub end_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<EventEntity> for domain::models::Event {
    fn from(entity: EventEntity) -> Self {
        Self {
            id: entity.id,
            course_id: entity.course_id,
            location_id: entity.location_id,
            name: entity.name,
            start_at: entity.start_at,
            end_at: entity.end_at,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}
