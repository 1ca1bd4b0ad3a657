//! Course routes.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use domain::models::course::{
    CourseResponse, CreateCourseRequest, ListCoursesResponse, UpdateCourseRequest,
};
use domain::models::{Course, CourseRole, Enrollment};
use domain::policies::{Capability, CoursePolicy, ResourcePolicy};
use persistence::repositories::{CourseRepository, EnrollmentRepository};
use std::collections::HashMap;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::Authenticated;
use crate::services::CourseAccess;

fn course_response(access: CourseAccess) -> CourseResponse {
    let policies = access.course_policy().summary();
    let roles = access
        .enrollment
        .map(|enrollment| enrollment.roles)
        .unwrap_or_default();
    CourseResponse::new(access.course, roles, policies)
}

/// List courses visible to the requester.
///
/// Admins see every course; everyone else sees the courses they are
/// enrolled in. Each item carries the requester's roles and capabilities.
///
/// GET /api/v1/courses
pub async fn list_courses(
    State(state): State<AppState>,
    auth: Authenticated,
) -> Result<Json<ListCoursesResponse>, ApiError> {
    let requestor = &auth.0;
    let courses_repo = CourseRepository::new(state.pool.clone());

    let courses = if CoursePolicy::new(requestor, None).can_view_all() {
        courses_repo.list_all().await?
    } else {
        courses_repo.list_for_account(requestor.account_id).await?
    };

    let rows = EnrollmentRepository::new(state.pool.clone())
        .rows_for_account(requestor.account_id)
        .await?;
    let enrollments: HashMap<i64, Enrollment> =
        Enrollment::aggregate(rows.into_iter().map(Into::into))?
            .into_iter()
            .map(|enrollment| (enrollment.course_id, enrollment))
            .collect();

    let data: Vec<CourseResponse> = courses
        .into_iter()
        .map(|entity| {
            let course = Course::from(entity);
            let enrollment = enrollments.get(&course.id);
            let policies = CoursePolicy::evaluate(requestor, enrollment);
            let roles = enrollment.map(|e| e.roles.clone()).unwrap_or_default();
            CourseResponse::new(course, roles, policies)
        })
        .collect();

    let count = data.len();
    Ok(Json(ListCoursesResponse { data, count }))
}

/// Create a course; the creator is enrolled as its owner.
///
/// POST /api/v1/courses
pub async fn create_course(
    State(state): State<AppState>,
    auth: Authenticated,
    Json(request): Json<CreateCourseRequest>,
) -> Result<(StatusCode, Json<CourseResponse>), ApiError> {
    CoursePolicy::evaluate(&auth.0, None).ensure(Capability::Create, "course")?;
    request.validate()?;

    let course = CourseRepository::new(state.pool.clone())
        .create(
            request.name.trim(),
            request.description.as_deref(),
            auth.account_id(),
            state.roles.id_of(CourseRole::Owner),
        )
        .await?;

    tracing::info!(
        course_id = course.id,
        account_id = auth.account_id(),
        "Course created"
    );

    let access = CourseAccess::load(&state.pool, course.id, &auth.0).await?;
    Ok((StatusCode::CREATED, Json(course_response(access))))
}

/// Get a course the requester is enrolled in.
///
/// GET /api/v1/courses/:course_id
pub async fn get_course(
    State(state): State<AppState>,
    auth: Authenticated,
    Path(course_id): Path<i64>,
) -> Result<Json<CourseResponse>, ApiError> {
    let access = CourseAccess::load(&state.pool, course_id, &auth.0).await?;
    access.require(&access.course_policy(), Capability::View, "course")?;
    Ok(Json(course_response(access)))
}

/// Update a course's name or description.
///
/// PUT /api/v1/courses/:course_id
pub async fn update_course(
    State(state): State<AppState>,
    auth: Authenticated,
    Path(course_id): Path<i64>,
    Json(request): Json<UpdateCourseRequest>,
) -> Result<Json<CourseResponse>, ApiError> {
    let mut access = CourseAccess::load(&state.pool, course_id, &auth.0).await?;
    access.require(&access.course_policy(), Capability::Update, "course")?;
    request.validate()?;

    let updated = CourseRepository::new(state.pool.clone())
        .update(
            course_id,
            request.name.as_deref().map(str::trim),
            request.description.as_deref(),
        )
        .await?
        .ok_or_else(|| ApiError::NotFound("Course not found".to_string()))?;

    tracing::info!(course_id, account_id = auth.account_id(), "Course updated");

    access.course = updated.into();
    Ok(Json(course_response(access)))
}

/// Delete a course with everything in it.
///
/// DELETE /api/v1/courses/:course_id
pub async fn delete_course(
    State(state): State<AppState>,
    auth: Authenticated,
    Path(course_id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    let access = CourseAccess::load(&state.pool, course_id, &auth.0).await?;
    access.require(&access.course_policy(), Capability::Delete, "course")?;

    if !CourseRepository::new(state.pool.clone())
        .delete(course_id)
        .await?
    {
        return Err(ApiError::NotFound("Course not found".to_string()));
    }

    tracing::info!(course_id, account_id = auth.account_id(), "Course deleted");
    Ok(StatusCode::NO_CONTENT)
}
