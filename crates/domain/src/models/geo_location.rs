//! Geographic coordinates for check-in locations.

use geo::{HaversineDistance, Point};
use serde::{Deserialize, Serialize};

use crate::error::{CoordinateError, DomainError};

/// Default check-in radius around an event location, in kilometers.
pub const DEFAULT_GEOFENCE_RADIUS_KM: f64 = 0.5;

/// An immutable longitude/latitude pair, or the absence of one.
///
/// The null variant is what a location without coordinates looks like. It
/// is never close to anything: distances involving it are infinite.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum GeoLocation {
    Point { longitude: f64, latitude: f64 },
    #[default]
    Null,
}

/// A coordinate as it arrives from clients: a JSON number or a numeric string.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum CoordinateValue {
    Number(f64),
    Text(String),
}

impl CoordinateValue {
    fn parse(&self, axis: &'static str) -> Result<f64, CoordinateError> {
        match self {
            CoordinateValue::Number(n) => Ok(*n),
            CoordinateValue::Text(s) => {
                s.trim()
                    .parse::<f64>()
                    .map_err(|_| CoordinateError::NotNumeric {
                        axis,
                        value: s.clone(),
                    })
            }
        }
    }
}

impl From<f64> for CoordinateValue {
    fn from(n: f64) -> Self {
        CoordinateValue::Number(n)
    }
}

impl From<&str> for CoordinateValue {
    fn from(s: &str) -> Self {
        CoordinateValue::Text(s.to_string())
    }
}

/// Serializable view of a present location.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub longitude: f64,
    pub latitude: f64,
}

impl GeoLocation {
    /// Builds a location from already-typed values, checking both bounds.
    pub fn new(longitude: f64, latitude: f64) -> Result<Self, DomainError> {
        shared::validation::validate_longitude(longitude)
            .map_err(|_| CoordinateError::LongitudeOutOfRange(longitude))?;
        shared::validation::validate_latitude(latitude)
            .map_err(|_| CoordinateError::LatitudeOutOfRange(latitude))?;

        Ok(GeoLocation::Point {
            longitude,
            latitude,
        })
    }

    /// Builds a location from untyped client input.
    ///
    /// Both coordinates absent yields the null location; exactly one absent
    /// is rejected since the pair only makes sense together.
    pub fn build(
        longitude: Option<&CoordinateValue>,
        latitude: Option<&CoordinateValue>,
    ) -> Result<Self, DomainError> {
        match (longitude, latitude) {
            (None, None) => Ok(GeoLocation::Null),
            (Some(_), None) => Err(CoordinateError::Missing("latitude").into()),
            (None, Some(_)) => Err(CoordinateError::Missing("longitude").into()),
            (Some(lon), Some(lat)) => {
                let longitude = lon.parse("longitude")?;
                let latitude = lat.parse("latitude")?;
                Self::new(longitude, latitude)
            }
        }
    }

    /// Rehydrates a location from nullable storage columns.
    ///
    /// Rows written through [`GeoLocation::build`] always have both columns
    /// or neither; anything else is read as null.
    pub fn from_columns(longitude: Option<f64>, latitude: Option<f64>) -> Self {
        match (longitude, latitude) {
            (Some(longitude), Some(latitude)) => GeoLocation::Point {
                longitude,
                latitude,
            },
            _ => GeoLocation::Null,
        }
    }

    pub fn null() -> Self {
        GeoLocation::Null
    }

    pub fn is_present(&self) -> bool {
        matches!(self, GeoLocation::Point { .. })
    }

    pub fn is_null(&self) -> bool {
        !self.is_present()
    }

    pub fn longitude(&self) -> Option<f64> {
        match self {
            GeoLocation::Point { longitude, .. } => Some(*longitude),
            GeoLocation::Null => None,
        }
    }

    pub fn latitude(&self) -> Option<f64> {
        match self {
            GeoLocation::Point { latitude, .. } => Some(*latitude),
            GeoLocation::Null => None,
        }
    }

    pub fn coordinates(&self) -> Option<Coordinates> {
        match self {
            GeoLocation::Point {
                longitude,
                latitude,
            } => Some(Coordinates {
                longitude: *longitude,
                latitude: *latitude,
            }),
            GeoLocation::Null => None,
        }
    }

    fn point(&self) -> Option<Point<f64>> {
        self.coordinates()
            .map(|c| Point::new(c.longitude, c.latitude))
    }

    /// Great-circle distance in kilometers (Haversine, mean Earth radius).
    ///
    /// Infinite when either side has no coordinates.
    pub fn distance_to(&self, other: &GeoLocation) -> f64 {
        match (self.point(), other.point()) {
            (Some(a), Some(b)) => a.haversine_distance(&b) / 1000.0,
            _ => f64::INFINITY,
        }
    }

    /// Geofence check: true iff both sides have coordinates and lie within
    /// `max_distance_km` of each other.
    pub fn within_range(&self, other: &GeoLocation, max_distance_km: f64) -> bool {
        if self.is_null() || other.is_null() {
            return false;
        }
        self.distance_to(other) <= max_distance_km
    }

    /// [`GeoLocation::within_range`] with the default 500 m radius.
    pub fn within_default_range(&self, other: &GeoLocation) -> bool {
        self.within_range(other, DEFAULT_GEOFENCE_RADIUS_KM)
    }
}

impl Serialize for GeoLocation {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.coordinates().serialize(serializer)
    }
}
