//! Location entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::GeoLocation;
use sqlx::FromRow;

/// Database row mapping for the locations table.
///
/// Coordinates are nullable as a pair; a half-filled pair reads as no
/// coordinates.
#[derive(Debug, Clone, FromRow)]
pub struct LocationEntity {
    pub id: i64,
    pub course_id: i64,
    pub name: String,
    pub longitude: Option<f64>,
    pub latitude: Option<f64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<LocationEntity> for domain::models::Location {
    fn from(entity: LocationEntity) -> Self {
        Self {
            id: entity.id,
            course_id: entity.course_id,
            name: entity.name,
            geo: GeoLocation::from_columns(entity.longitude, entity.latitude),
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}
