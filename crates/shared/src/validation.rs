//! Validator hooks shared by request payloads.

use std::ops::RangeInclusive;
use validator::ValidationError;

pub const LONGITUDE_BOUNDS: RangeInclusive<f64> = -180.0..=180.0;
pub const LATITUDE_BOUNDS: RangeInclusive<f64> = -90.0..=90.0;

fn within(
    value: f64,
    bounds: RangeInclusive<f64>,
    code: &'static str,
    axis: &str,
) -> Result<(), ValidationError> {
    // NaN fails `contains`, so it is rejected along with out-of-range values
    if bounds.contains(&value) {
        return Ok(());
    }
    let mut err = ValidationError::new(code);
    err.message = Some(
        format!(
            "{} must be between {} and {}",
            axis,
            bounds.start(),
            bounds.end()
        )
        .into(),
    );
    Err(err)
}

pub fn validate_longitude(lon: f64) -> Result<(), ValidationError> {
    within(lon, LONGITUDE_BOUNDS, "longitude_range", "Longitude")
}

pub fn validate_latitude(lat: f64) -> Result<(), ValidationError> {
    within(lat, LATITUDE_BOUNDS, "latitude_range", "Latitude")
}

/// Rejects strings that are empty once surrounding whitespace is removed.
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if !value.trim().is_empty() {
        return Ok(());
    }
    let mut err = ValidationError::new("blank");
    err.message = Some("Value must not be blank".into());
    Err(err)
}
