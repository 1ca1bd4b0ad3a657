//! Domain error types.

use thiserror::Error;

/// Errors raised where untrusted data enters the domain layer.
///
/// Once a value has been constructed, policy checks, distance calculations
/// and report aggregation never fail.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DomainError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid role: {0}")]
    InvalidRole(String),

    #[error("Invalid coordinates: {0}")]
    InvalidCoordinates(CoordinateError),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),
}

impl DomainError {
    /// True for every flavour of malformed input, including role and
    /// coordinate failures.
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            DomainError::InvalidInput(_)
                | DomainError::InvalidRole(_)
                | DomainError::InvalidCoordinates(_)
        )
    }
}

/// Which coordinate bound or format a value violated.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoordinateError {
    #[error("longitude {0} must be between -180 and 180")]
    LongitudeOutOfRange(f64),

    #[error("latitude {0} must be between -90 and 90")]
    LatitudeOutOfRange(f64),

    #[error("{axis} is not a number: {value:?}")]
    NotNumeric { axis: &'static str, value: String },

    #[error("{0} is required when the other coordinate is given")]
    Missing(&'static str),
}

impl From<CoordinateError> for DomainError {
    fn from(err: CoordinateError) -> Self {
        DomainError::InvalidCoordinates(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_input_classification() {
        assert!(DomainError::InvalidInput("x".into()).is_invalid_input());
        assert!(DomainError::InvalidRole("x".into()).is_invalid_input());
        assert!(
            DomainError::InvalidCoordinates(CoordinateError::LatitudeOutOfRange(91.0))
                .is_invalid_input()
        );
        assert!(!DomainError::Forbidden("x".into()).is_invalid_input());
        assert!(!DomainError::NotFound("x".into()).is_invalid_input());
    }

    #[test]
    fn test_coordinate_error_names_bound() {
        let err: DomainError = CoordinateError::LongitudeOutOfRange(200.0).into();
        assert_eq!(
            err.to_string(),
            "Invalid coordinates: longitude 200 must be between -180 and 180"
        );

        let err: DomainError = CoordinateError::LatitudeOutOfRange(-95.5).into();
        assert!(err.to_string().contains("between -90 and 90"));
    }
}
