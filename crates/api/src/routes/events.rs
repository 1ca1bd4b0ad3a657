//! Event routes.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use domain::models::event::{
    CreateEventRequest, EventResponse, ListEventsResponse, UpdateEventRequest,
};
use domain::models::Event;
use domain::policies::Capability;
use persistence::repositories::{EventRepository, LocationRepository};
use sqlx::PgPool;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::Authenticated;
use crate::services::CourseAccess;

fn not_found() -> ApiError {
    ApiError::NotFound("Event not found".to_string())
}

/// Events may only be held at locations of their own course.
async fn ensure_course_location(
    pool: &PgPool,
    course_id: i64,
    location_id: i64,
) -> Result<(), ApiError> {
    let location = LocationRepository::new(pool.clone())
        .find(course_id, location_id)
        .await?;
    match location {
        Some(_) => Ok(()),
        None => Err(ApiError::Validation(format!(
            "Location {} does not belong to this course",
            location_id
        ))),
    }
}

/// List a course's events ordered by start time.
///
/// GET /api/v1/courses/:course_id/events
pub async fn list_events(
    State(state): State<AppState>,
    auth: Authenticated,
    Path(course_id): Path<i64>,
) -> Result<Json<ListEventsResponse>, ApiError> {
    let access = CourseAccess::load(&state.pool, course_id, &auth.0).await?;
    access.require(&access.event_policy(), Capability::View, "events")?;

    let data: Vec<EventResponse> = EventRepository::new(state.pool.clone())
        .list_for_course(course_id)
        .await?
        .into_iter()
        .map(|entity| Event::from(entity).into())
        .collect();

    let count = data.len();
    Ok(Json(ListEventsResponse { data, count }))
}

/// POST /api/v1/courses/:course_id/events
pub async fn create_event(
    State(state): State<AppState>,
    auth: Authenticated,
    Path(course_id): Path<i64>,
    Json(request): Json<CreateEventRequest>,
) -> Result<(StatusCode, Json<EventResponse>), ApiError> {
    let access = CourseAccess::load(&state.pool, course_id, &auth.0).await?;
    access.require(&access.event_policy(), Capability::Create, "event")?;
    request.validate()?;
    ensure_course_location(&state.pool, course_id, request.location_id).await?;

    let event = EventRepository::new(state.pool.clone())
        .create(
            course_id,
            request.location_id,
            request.name.trim(),
            request.start_at,
            request.end_at,
        )
        .await?;

    tracing::info!(
        course_id,
        event_id = event.id,
        account_id = auth.account_id(),
        "Event created"
    );

    Ok((StatusCode::CREATED, Json(Event::from(event).into())))
}

/// GET /api/v1/courses/:course_id/events/:event_id
pub async fn get_event(
    State(state): State<AppState>,
    auth: Authenticated,
    Path((course_id, event_id)): Path<(i64, i64)>,
) -> Result<Json<EventResponse>, ApiError> {
    let access = CourseAccess::load(&state.pool, course_id, &auth.0).await?;
    access.require(&access.event_policy(), Capability::View, "event")?;

    let event = EventRepository::new(state.pool.clone())
        .find(course_id, event_id)
        .await?
        .ok_or_else(not_found)?;

    Ok(Json(Event::from(event).into()))
}

/// Update an event. Omitted fields keep their values; the resulting time
/// window must still end after it starts.
///
/// PUT /api/v1/courses/:course_id/events/:event_id
pub async fn update_event(
    State(state): State<AppState>,
    auth: Authenticated,
    Path((course_id, event_id)): Path<(i64, i64)>,
    Json(request): Json<UpdateEventRequest>,
) -> Result<Json<EventResponse>, ApiError> {
    let access = CourseAccess::load(&state.pool, course_id, &auth.0).await?;
    access.require(&access.event_policy(), Capability::Update, "event")?;
    request.validate()?;

    let repo = EventRepository::new(state.pool.clone());
    let current = Event::from(repo.find(course_id, event_id).await?.ok_or_else(not_found)?);

    let (start_at, end_at) = request.merged_window(&current).map_err(|e| {
        ApiError::Validation(
            e.message
                .map(|m| m.to_string())
                .unwrap_or_else(|| "Invalid time window".to_string()),
        )
    })?;

    let location_id = request.location_id.unwrap_or(current.location_id);
    if location_id != current.location_id {
        ensure_course_location(&state.pool, course_id, location_id).await?;
    }

    let name = request
        .name
        .as_deref()
        .map(str::trim)
        .unwrap_or(&current.name);

    let event = repo
        .update(course_id, event_id, location_id, name, start_at, end_at)
        .await?
        .ok_or_else(not_found)?;

    tracing::info!(
        course_id,
        event_id,
        account_id = auth.account_id(),
        "Event updated"
    );

    Ok(Json(Event::from(event).into()))
}

/// Delete an event and its attendance records.
///
/// DELETE /api/v1/courses/:course_id/events/:event_id
pub async fn delete_event(
    State(state): State<AppState>,
    auth: Authenticated,
    Path((course_id, event_id)): Path<(i64, i64)>,
) -> Result<StatusCode, ApiError> {
    let access = CourseAccess::load(&state.pool, course_id, &auth.0).await?;
    access.require(&access.event_policy(), Capability::Delete, "event")?;

    if !EventRepository::new(state.pool.clone())
        .delete(course_id, event_id)
        .await?
    {
        return Err(not_found());
    }

    tracing::info!(
        course_id,
        event_id,
        account_id = auth.account_id(),
        "Event deleted"
    );

    Ok(StatusCode::NO_CONTENT)
}
