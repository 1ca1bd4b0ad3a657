//! Attendance (check-in) domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::geo_location::{CoordinateValue, GeoLocation};

/// A student's check-in at one event.
#[derive(Debug, Clone, Serialize)]
pub struct Attendance {
    pub id: i64,
    pub account_id: i64,
    pub course_id: i64,
    pub event_id: i64,
    /// Where the check-in was submitted from
    pub geo: GeoLocation,
    pub created_at: DateTime<Utc>,
}

/// Request payload for checking in to an event.
///
/// Coordinates may be JSON numbers or numeric strings.
#[derive(Debug, Clone, Deserialize)]
pub struct CheckInRequest {
    pub longitude: Option<CoordinateValue>,
    pub latitude: Option<CoordinateValue>,
}

impl CheckInRequest {
    /// Parses the submitted coordinates.
    pub fn geo_location(&self) -> Result<GeoLocation, crate::DomainError> {
        GeoLocation::build(self.longitude.as_ref(), self.latitude.as_ref())
    }
}

/// Response payload for attendance operations.
#[derive(Debug, Clone, Serialize)]
pub struct AttendanceResponse {
    pub id: i64,
    pub account_id: i64,
    pub course_id: i64,
    pub event_id: i64,
    pub longitude: Option<f64>,
    pub latitude: Option<f64>,
    pub created_at: DateTime<Utc>,
}

impl From<Attendance> for AttendanceResponse {
    fn from(a: Attendance) -> Self {
        Self {
            id: a.id,
            account_id: a.account_id,
            course_id: a.course_id,
            event_id: a.event_id,
            longitude: a.geo.longitude(),
            latitude: a.geo.latitude(),
            created_at: a.created_at,
        }
    }
}

/// Response for listing attendances.
#[derive(Debug, Clone, Serialize)]
pub struct ListAttendancesResponse {
    pub data: Vec<AttendanceResponse>,
    pub count: usize,
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_in_request_parses_strings() {
        let request: CheckInRequest =
            serde_json::from_str(r#"{"longitude": "0.001", "latitude": "0.001"}"#).unwrap();
        let geo = request.geo_location().unwrap();
        assert!(geo.within_default_range(&GeoLocation::new(0.0, 0.0).unwrap()));
    }

    #[test]
    fn test_check_in_request_without_coordinates_is_null() {
        let request: CheckInRequest = serde_json::from_str("{}").unwrap();
        assert!(request.geo_location().unwrap().is_null());
    }

    #[test]
    fn test_check_in_request_out_of_range() {
        let request: CheckInRequest =
            serde_json::from_str(r#"{"longitude": 200, "latitude": 0}"#).unwrap();
        assert!(request.geo_location().is_err());
    }

    #[test]
    fn test_attendance_response() {
        let mut attendance = fixtures::attendance(1, 2, 3);
        attendance.geo = GeoLocation::new(4.0, 5.0).unwrap();
        let response = AttendanceResponse::from(attendance);
        assert_eq!(response.longitude, Some(4.0));
        assert_eq!(response.latitude, Some(5.0));
        assert_eq!(response.event_id, 3);
    }
}
