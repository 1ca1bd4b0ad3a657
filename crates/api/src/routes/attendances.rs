//! Attendance routes: check-in and attendance listing.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use domain::models::attendance::{AttendanceResponse, CheckInRequest, ListAttendancesResponse};
use domain::models::{Attendance, Event, Location};
use domain::policies::{Capability, ResourcePolicy};
use persistence::repositories::{AttendanceRepository, EventRepository, LocationRepository};

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::Authenticated;
use crate::middleware::metrics::{record_check_in, CheckInOutcome};
use crate::services::{check_in, CourseAccess};

fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db_err) if db_err.code().as_deref() == Some("23505"))
}

/// Check in to an event at the submitted coordinates.
///
/// POST /api/v1/courses/:course_id/events/:event_id/attendances
pub async fn check_in(
    State(state): State<AppState>,
    auth: Authenticated,
    Path((course_id, event_id)): Path<(i64, i64)>,
    Json(request): Json<CheckInRequest>,
) -> Result<(StatusCode, Json<AttendanceResponse>), ApiError> {
    let access = CourseAccess::load(&state.pool, course_id, &auth.0).await?;
    access.require(&access.attendance_policy(), Capability::Create, "attendance")?;

    let event = Event::from(
        EventRepository::new(state.pool.clone())
            .find(course_id, event_id)
            .await?
            .ok_or_else(|| ApiError::NotFound("Event not found".to_string()))?,
    );
    let location = Location::from(
        LocationRepository::new(state.pool.clone())
            .find(course_id, event.location_id)
            .await?
            .ok_or_else(|| ApiError::NotFound("Event location not found".to_string()))?,
    );

    let submitted = request.geo_location()?;

    if let Err(rejection) = check_in::evaluate(
        &event,
        &location.geo,
        &submitted,
        &state.config.attendance,
        Utc::now(),
    ) {
        if let Some(outcome) = rejection.outcome() {
            record_check_in(outcome);
        }
        tracing::info!(
            course_id,
            event_id,
            account_id = auth.account_id(),
            reason = %rejection,
            "Check-in rejected"
        );
        return Err(rejection.into());
    }

    let created = AttendanceRepository::new(state.pool.clone())
        .create(
            auth.account_id(),
            course_id,
            event_id,
            submitted.longitude(),
            submitted.latitude(),
        )
        .await;

    let attendance = match created {
        Ok(entity) => Attendance::from(entity),
        Err(err) if is_unique_violation(&err) => {
            record_check_in(CheckInOutcome::Duplicate);
            return Err(ApiError::Conflict(
                "Already checked in to this event".to_string(),
            ));
        }
        Err(err) => return Err(err.into()),
    };

    record_check_in(CheckInOutcome::Accepted);
    tracing::info!(
        course_id,
        event_id,
        account_id = auth.account_id(),
        attendance_id = attendance.id,
        "Checked in"
    );

    Ok((StatusCode::CREATED, Json(attendance.into())))
}

/// List attendance records: every record for teaching roles, the
/// requester's own otherwise.
///
/// GET /api/v1/courses/:course_id/attendances
pub async fn list_attendances(
    State(state): State<AppState>,
    auth: Authenticated,
    Path(course_id): Path<i64>,
) -> Result<Json<ListAttendancesResponse>, ApiError> {
    let access = CourseAccess::load(&state.pool, course_id, &auth.0).await?;
    let policy = access.attendance_policy();
    let repo = AttendanceRepository::new(state.pool.clone());

    let records = if policy.can_view_all() {
        repo.list_for_course(course_id).await?
    } else {
        access.require(&policy, Capability::View, "attendances")?;
        repo.list_for_account_in_course(course_id, auth.account_id())
            .await?
    };

    let data: Vec<AttendanceResponse> = records
        .into_iter()
        .map(|entity| Attendance::from(entity).into())
        .collect();

    let count = data.len();
    Ok(Json(ListAttendancesResponse { data, count }))
}
