//! Check-in rules: time window and geofence.
//!
//! Pure decision over already-loaded data; the route handler does the I/O
//! and the duplicate check (enforced by a unique constraint).

use chrono::{DateTime, Utc};
use domain::models::{Event, GeoLocation};
use thiserror::Error;

use crate::config::AttendanceConfig;
use crate::error::ApiError;
use crate::middleware::metrics::CheckInOutcome;

/// Why a check-in was refused.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CheckInRejection {
    #[error("Event is not ongoing")]
    NotOngoing,

    #[error("Coordinates are required to check in to this event")]
    CoordinatesRequired,

    #[error("Too far from the event location: {distance_km:.3} km away, limit is {radius_km} km")]
    OutOfRange { distance_km: f64, radius_km: f64 },
}

impl CheckInRejection {
    /// Metrics label for the rejection; malformed submissions are not counted.
    pub fn outcome(&self) -> Option<CheckInOutcome> {
        match self {
            CheckInRejection::NotOngoing => Some(CheckInOutcome::NotOngoing),
            CheckInRejection::OutOfRange { .. } => Some(CheckInOutcome::OutOfRange),
            CheckInRejection::CoordinatesRequired => None,
        }
    }
}

impl From<CheckInRejection> for ApiError {
    fn from(rejection: CheckInRejection) -> Self {
        match rejection {
            CheckInRejection::CoordinatesRequired => ApiError::Validation(rejection.to_string()),
            CheckInRejection::NotOngoing | CheckInRejection::OutOfRange { .. } => {
                ApiError::Forbidden(rejection.to_string())
            }
        }
    }
}

/// Decides whether a check-in at `submitted` is acceptable for `event`.
///
/// An event location without coordinates disables the geofence.
pub fn evaluate(
    event: &Event,
    event_location: &GeoLocation,
    submitted: &GeoLocation,
    rules: &AttendanceConfig,
    now: DateTime<Utc>,
) -> Result<(), CheckInRejection> {
    if rules.require_ongoing_event && !event.is_ongoing(now) {
        return Err(CheckInRejection::NotOngoing);
    }

    if event_location.is_null() {
        return Ok(());
    }

    if submitted.is_null() {
        return Err(CheckInRejection::CoordinatesRequired);
    }

    if !submitted.within_range(event_location, rules.geofence_radius_km) {
        return Err(CheckInRejection::OutOfRange {
            distance_km: submitted.distance_to(event_location),
            radius_km: rules.geofence_radius_km,
        });
    }

    Ok(())
}
