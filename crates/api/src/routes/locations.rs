//! Location routes.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use domain::models::location::{
    CreateLocationRequest, ListLocationsResponse, LocationResponse, UpdateLocationRequest,
};
use domain::models::{GeoLocation, Location};
use domain::policies::Capability;
use persistence::repositories::LocationRepository;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::Authenticated;
use crate::services::CourseAccess;

fn not_found() -> ApiError {
    ApiError::NotFound("Location not found".to_string())
}

/// List a course's locations.
///
/// GET /api/v1/courses/:course_id/locations
pub async fn list_locations(
    State(state): State<AppState>,
    auth: Authenticated,
    Path(course_id): Path<i64>,
) -> Result<Json<ListLocationsResponse>, ApiError> {
    let access = CourseAccess::load(&state.pool, course_id, &auth.0).await?;
    access.require(&access.location_policy(), Capability::View, "locations")?;

    let data: Vec<LocationResponse> = LocationRepository::new(state.pool.clone())
        .list_for_course(course_id)
        .await?
        .into_iter()
        .map(|entity| Location::from(entity).into())
        .collect();

    let count = data.len();
    Ok(Json(ListLocationsResponse { data, count }))
}

/// Create a location. Coordinates are optional but must come as a pair.
///
/// POST /api/v1/courses/:course_id/locations
pub async fn create_location(
    State(state): State<AppState>,
    auth: Authenticated,
    Path(course_id): Path<i64>,
    Json(request): Json<CreateLocationRequest>,
) -> Result<(StatusCode, Json<LocationResponse>), ApiError> {
    let access = CourseAccess::load(&state.pool, course_id, &auth.0).await?;
    access.require(&access.location_policy(), Capability::Create, "location")?;
    request.validate()?;
    let geo = GeoLocation::build(request.longitude.as_ref(), request.latitude.as_ref())?;

    let location = LocationRepository::new(state.pool.clone())
        .create(
            course_id,
            request.name.trim(),
            geo.longitude(),
            geo.latitude(),
        )
        .await?;

    tracing::info!(
        course_id,
        location_id = location.id,
        account_id = auth.account_id(),
        "Location created"
    );

    Ok((StatusCode::CREATED, Json(Location::from(location).into())))
}

/// GET /api/v1/courses/:course_id/locations/:location_id
pub async fn get_location(
    State(state): State<AppState>,
    auth: Authenticated,
    Path((course_id, location_id)): Path<(i64, i64)>,
) -> Result<Json<LocationResponse>, ApiError> {
    let access = CourseAccess::load(&state.pool, course_id, &auth.0).await?;
    access.require(&access.location_policy(), Capability::View, "location")?;

    let location = LocationRepository::new(state.pool.clone())
        .find(course_id, location_id)
        .await?
        .ok_or_else(not_found)?;

    Ok(Json(Location::from(location).into()))
}

/// Update a location. Omitted fields keep their values; coordinates are
/// replaced only as a pair.
///
/// PUT /api/v1/courses/:course_id/locations/:location_id
pub async fn update_location(
    State(state): State<AppState>,
    auth: Authenticated,
    Path((course_id, location_id)): Path<(i64, i64)>,
    Json(request): Json<UpdateLocationRequest>,
) -> Result<Json<LocationResponse>, ApiError> {
    let access = CourseAccess::load(&state.pool, course_id, &auth.0).await?;
    access.require(&access.location_policy(), Capability::Update, "location")?;
    request.validate()?;

    let repo = LocationRepository::new(state.pool.clone());
    let current = Location::from(
        repo.find(course_id, location_id)
            .await?
            .ok_or_else(not_found)?,
    );

    let geo = match (&request.longitude, &request.latitude) {
        (None, None) => current.geo,
        (longitude, latitude) => GeoLocation::build(longitude.as_ref(), latitude.as_ref())?,
    };
    let name = request
        .name
        .as_deref()
        .map(str::trim)
        .unwrap_or(&current.name);

    let location = repo
        .update(course_id, location_id, name, geo.longitude(), geo.latitude())
        .await?
        .ok_or_else(not_found)?;

    tracing::info!(
        course_id,
        location_id,
        account_id = auth.account_id(),
        "Location updated"
    );

    Ok(Json(Location::from(location).into()))
}

/// Delete a location and its events.
///
/// DELETE /api/v1/courses/:course_id/locations/:location_id
pub async fn delete_location(
    State(state): State<AppState>,
    auth: Authenticated,
    Path((course_id, location_id)): Path<(i64, i64)>,
) -> Result<StatusCode, ApiError> {
    let access = CourseAccess::load(&state.pool, course_id, &auth.0).await?;
    access.require(&access.location_policy(), Capability::Delete, "location")?;

    if !LocationRepository::new(state.pool.clone())
        .delete(course_id, location_id)
        .await?
    {
        return Err(not_found());
    }

    tracing::info!(
        course_id,
        location_id,
        account_id = auth.account_id(),
        "Location deleted"
    );

    Ok(StatusCode::NO_CONTENT)
}
