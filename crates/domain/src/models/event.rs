//! Course event domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

/// A scheduled session of a course, held at one of its locations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub id: i64,
    pub course_id: i64,
    pub location_id: i64,
    pub name: String,
    pub start_at: DateTime<Utc>,
    pub end_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Event {
    /// True while `now` falls inside `[start_at, end_at]`.
    pub fn is_ongoing(&self, now: DateTime<Utc>) -> bool {
        self.start_at <= now && now <= self.end_at
    }
}

fn validate_time_window(
    start_at: &DateTime<Utc>,
    end_at: &DateTime<Utc>,
) -> Result<(), ValidationError> {
    if end_at <= start_at {
        let mut err = ValidationError::new("time_window");
        err.message = Some("end_at must be after start_at".into());
        return Err(err);
    }
    Ok(())
}

/// Request payload for creating an event.
#[derive(Debug, Clone, Deserialize, Validate)]
#[validate(schema(function = "validate_create_event_window"))]
pub struct CreateEventRequest {
    #[validate(
        length(min = 1, max = 200, message = "Name must be between 1 and 200 characters"),
        custom(function = "shared::validation::validate_not_blank")
    )]
    pub name: String,

    pub location_id: i64,

    pub start_at: DateTime<Utc>,

    pub end_at: DateTime<Utc>,
}

fn validate_create_event_window(request: &CreateEventRequest) -> Result<(), ValidationError> {
    validate_time_window(&request.start_at, &request.end_at)
}

/// Request payload for updating an event (partial update).
///
/// The resulting window is checked against the stored event by the caller,
/// since either bound may be omitted.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateEventRequest {
    #[validate(
        length(min = 1, max = 200, message = "Name must be between 1 and 200 characters"),
        custom(function = "shared::validation::validate_not_blank")
    )]
    pub name: Option<String>,

    pub location_id: Option<i64>,

    pub start_at: Option<DateTime<Utc>>,

    pub end_at: Option<DateTime<Utc>>,
}

impl UpdateEventRequest {
    /// Applies the update's time bounds to an existing event and checks the
    /// resulting window.
    pub fn merged_window(
        &self,
        current: &Event,
    ) -> Result<(DateTime<Utc>, DateTime<Utc>), ValidationError> {
        let start_at = self.start_at.unwrap_or(current.start_at);
        let end_at = self.end_at.unwrap_or(current.end_at);
        validate_time_window(&start_at, &end_at)?;
        Ok((start_at, end_at))
    }
}

/// Response payload for event operations.
#[derive(Debug, Clone, Serialize)]
pub struct EventResponse {
    pub id: i64,
    pub course_id: i64,
    pub location_id: i64,
    pub name: String,
    pub start_at: DateTime<Utc>,
    pub end_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Event> for EventResponse {
    fn from(e: Event) -> Self {
        Self {
            id: e.id,
            course_id: e.course_id,
            location_id: e.location_id,
            name: e.name,
            start_at: e.start_at,
            end_at: e.end_at,
            created_at: e.created_at,
            updated_at: e.updated_at,
        }
    }
}

/// Response for listing events.
#[derive(Debug, Clone, Serialize)]
pub struct ListEventsResponse {
    pub data: Vec<EventResponse>,
    pub count: usize,
}
