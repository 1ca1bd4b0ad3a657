//! Check-in location domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::geo_location::{CoordinateValue, GeoLocation};

/// A named place belonging to a course where events are held.
#[derive(Debug, Clone, Serialize)]
pub struct Location {
    pub id: i64,
    pub course_id: i64,
    pub name: String,
    /// Null when the location has no coordinates (e.g. online sessions)
    pub geo: GeoLocation,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request payload for creating a location.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateLocationRequest {
    #[validate(
        length(min = 1, max = 200, message = "Name must be between 1 and 200 characters"),
        custom(function = "shared::validation::validate_not_blank")
    )]
    pub name: String,

    pub longitude: Option<CoordinateValue>,

    pub latitude: Option<CoordinateValue>,
}

/// Request payload for updating a location.
///
/// Coordinates are replaced only when both are given.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateLocationRequest {
    #[validate(
        length(min = 1, max = 200, message = "Name must be between 1 and 200 characters"),
        custom(function = "shared::validation::validate_not_blank")
    )]
    pub name: Option<String>,

    pub longitude: Option<CoordinateValue>,

    pub latitude: Option<CoordinateValue>,
}

/// Response payload for location operations.
#[derive(Debug, Clone, Serialize)]
pub struct LocationResponse {
    pub id: i64,
    pub course_id: i64,
    pub name: String,
    pub longitude: Option<f64>,
    pub latitude: Option<f64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Location> for LocationResponse {
    fn from(l: Location) -> Self {
        Self {
            id: l.id,
            course_id: l.course_id,
            name: l.name,
            longitude: l.geo.longitude(),
            latitude: l.geo.latitude(),
            created_at: l.created_at,
            updated_at: l.updated_at,
        }
    }
}

/// Response for listing locations.
#[derive(Debug, Clone, Serialize)]
pub struct ListLocationsResponse {
    pub data: Vec<LocationResponse>,
    pub count: usize,
}
