//! Enrollment routes: who holds which roles in a course.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use domain::models::enrollment::{
    EnrollmentResponse, ListEnrollmentsResponse, SetEnrollmentRequest,
};
use domain::models::{CourseRole, CourseRoles, Enrollment};
use domain::policies::Capability;
use persistence::repositories::{AccountRepository, EnrollmentRepository};
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::Authenticated;
use crate::services::CourseAccess;

/// Checks a change to the owner role of an enrolled account.
///
/// Only owners may grant or revoke ownership, and a course never loses its
/// last owner. The repository enforces the owner count again under a row
/// lock when writing.
fn check_owner_change(
    access: &CourseAccess,
    held: &CourseRoles,
    requested: &CourseRoles,
    owner_count: i64,
) -> Result<(), ApiError> {
    let was_owner = held.is_owner();
    let will_be_owner = requested.is_owner();
    if was_owner == will_be_owner {
        return Ok(());
    }

    let requester_is_owner = access
        .enrollment
        .as_ref()
        .is_some_and(Enrollment::is_owner);
    if !requester_is_owner {
        return Err(ApiError::Forbidden(
            "Only course owners may grant or revoke the owner role".to_string(),
        ));
    }

    if was_owner && owner_count <= 1 {
        return Err(ApiError::Conflict(
            "A course must keep at least one owner".to_string(),
        ));
    }

    Ok(())
}

async fn current_enrollment(
    repo: &EnrollmentRepository,
    course_id: i64,
    account_id: i64,
) -> Result<Option<Enrollment>, ApiError> {
    let rows = repo
        .rows_for_account_in_course(course_id, account_id)
        .await?;
    Ok(Enrollment::aggregate_one(rows.into_iter().map(Into::into))?)
}

/// List every enrollment of a course.
///
/// GET /api/v1/courses/:course_id/enrollments
pub async fn list_enrollments(
    State(state): State<AppState>,
    auth: Authenticated,
    Path(course_id): Path<i64>,
) -> Result<Json<ListEnrollmentsResponse>, ApiError> {
    let access = CourseAccess::load(&state.pool, course_id, &auth.0).await?;
    access.require(&access.course_policy(), Capability::View, "enrollments")?;

    let rows = EnrollmentRepository::new(state.pool.clone())
        .rows_for_course(course_id)
        .await?;
    let data: Vec<EnrollmentResponse> = Enrollment::aggregate(rows.into_iter().map(Into::into))?
        .into_iter()
        .map(EnrollmentResponse::from)
        .collect();

    let count = data.len();
    Ok(Json(ListEnrollmentsResponse { data, count }))
}

/// Replace an account's role set in a course. An empty role list removes
/// the account from the course.
///
/// PUT /api/v1/courses/:course_id/enrollments
pub async fn set_enrollment(
    State(state): State<AppState>,
    auth: Authenticated,
    Path(course_id): Path<i64>,
    Json(request): Json<SetEnrollmentRequest>,
) -> Result<Response, ApiError> {
    let access = CourseAccess::load(&state.pool, course_id, &auth.0).await?;
    access.require(&access.course_policy(), Capability::Update, "enrollments")?;
    request.validate()?;
    let requested = CourseRoles::parse(&request.roles)?;

    let account = AccountRepository::new(state.pool.clone())
        .find_by_email(&request.email)
        .await?
        .ok_or_else(|| ApiError::NotFound("Account not found".to_string()))?;

    let repo = EnrollmentRepository::new(state.pool.clone());
    let held = current_enrollment(&repo, course_id, account.id)
        .await?
        .map(|enrollment| enrollment.roles)
        .unwrap_or_default();

    let owner_id = state.roles.id_of(CourseRole::Owner);
    let owner_count = repo.count_with_role(course_id, owner_id).await?;
    check_owner_change(&access, &held, &requested, owner_count)?;

    repo.set_roles(
        course_id,
        account.id,
        &state.roles.ids_of(requested.iter()),
        owner_id,
    )
    .await?;

    tracing::info!(
        course_id,
        account_id = account.id,
        roles = ?requested.names(),
        changed_by = auth.account_id(),
        "Enrollment updated"
    );

    match current_enrollment(&repo, course_id, account.id).await? {
        Some(enrollment) => Ok(Json(EnrollmentResponse::from(enrollment)).into_response()),
        None => Ok(StatusCode::NO_CONTENT.into_response()),
    }
}

/// Remove an account from a course.
///
/// DELETE /api/v1/courses/:course_id/enrollments/:account_id
pub async fn remove_enrollment(
    State(state): State<AppState>,
    auth: Authenticated,
    Path((course_id, account_id)): Path<(i64, i64)>,
) -> Result<StatusCode, ApiError> {
    let access = CourseAccess::load(&state.pool, course_id, &auth.0).await?;
    access.require(&access.course_policy(), Capability::Update, "enrollments")?;

    let repo = EnrollmentRepository::new(state.pool.clone());
    let held = current_enrollment(&repo, course_id, account_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Enrollment not found".to_string()))?
        .roles;

    let owner_id = state.roles.id_of(CourseRole::Owner);
    let owner_count = repo.count_with_role(course_id, owner_id).await?;
    check_owner_change(&access, &held, &CourseRoles::new(), owner_count)?;

    if !repo.remove(course_id, account_id, owner_id).await? {
        return Err(ApiError::NotFound("Enrollment not found".to_string()));
    }

    tracing::info!(
        course_id,
        account_id,
        removed_by = auth.account_id(),
        "Enrollment removed"
    );

    Ok(StatusCode::NO_CONTENT)
}
