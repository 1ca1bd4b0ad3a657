use axum::{
    middleware,
    routing::{delete, get, post, put},
    Router,
};
use persistence::repositories::RoleLookup;
use shared::jwt::{JwtConfig, JwtError};
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer,
    cors::{AllowOrigin, Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::Config;
use crate::middleware::{metrics_handler, metrics_middleware, trace_id};
use crate::routes::{
    accounts, attendances, auth, courses, enrollments, events, health, locations, reports,
};

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Arc<Config>,
    pub jwt: Arc<JwtConfig>,
    pub roles: RoleLookup,
}

impl AppState {
    pub fn new(config: Config, pool: PgPool, roles: RoleLookup) -> Result<Self, JwtError> {
        let jwt = config.jwt.to_jwt_config()?;
        Ok(Self {
            pool,
            config: Arc::new(config),
            jwt: Arc::new(jwt),
            roles,
        })
    }
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if origins.is_empty() {
        layer.allow_origin(Any)
    } else {
        let origins: Vec<_> = origins.iter().filter_map(|o| o.parse().ok()).collect();
        layer.allow_origin(AllowOrigin::list(origins))
    }
}

pub fn create_app(state: AppState) -> Router {
    let config = state.config.clone();

    let auth_routes = Router::new()
        .route("/api/v1/auth/register", post(auth::register))
        .route("/api/v1/auth/login", post(auth::login));

    let account_routes = Router::new()
        .route("/api/v1/accounts/me", get(accounts::me))
        .route(
            "/api/v1/accounts/:account_id/global-roles/:role",
            put(accounts::grant_global_role).delete(accounts::revoke_global_role),
        );

    let course_routes = Router::new()
        .route(
            "/api/v1/courses",
            get(courses::list_courses).post(courses::create_course),
        )
        .route(
            "/api/v1/courses/:course_id",
            get(courses::get_course)
                .put(courses::update_course)
                .delete(courses::delete_course),
        )
        .route(
            "/api/v1/courses/:course_id/enrollments",
            get(enrollments::list_enrollments).put(enrollments::set_enrollment),
        )
        .route(
            "/api/v1/courses/:course_id/enrollments/:account_id",
            delete(enrollments::remove_enrollment),
        )
        .route(
            "/api/v1/courses/:course_id/locations",
            get(locations::list_locations).post(locations::create_location),
        )
        .route(
            "/api/v1/courses/:course_id/locations/:location_id",
            get(locations::get_location)
                .put(locations::update_location)
                .delete(locations::delete_location),
        )
        .route(
            "/api/v1/courses/:course_id/events",
            get(events::list_events).post(events::create_event),
        )
        .route(
            "/api/v1/courses/:course_id/events/:event_id",
            get(events::get_event)
                .put(events::update_event)
                .delete(events::delete_event),
        )
        .route(
            "/api/v1/courses/:course_id/events/:event_id/attendances",
            post(attendances::check_in),
        )
        .route(
            "/api/v1/courses/:course_id/attendances",
            get(attendances::list_attendances),
        )
        .route(
            "/api/v1/courses/:course_id/attendance-report",
            get(reports::attendance_report),
        );

    let public_routes = Router::new()
        .route("/api/health", get(health::health_check))
        .route("/api/health/ready", get(health::ready))
        .route("/api/health/live", get(health::live))
        .route("/metrics", get(metrics_handler));

    Router::new()
        .merge(public_routes)
        .merge(auth_routes)
        .merge(account_routes)
        .merge(course_routes)
        // Global middleware (bottom layers run first)
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(trace_id))
        .layer(cors_layer(&config.security.cors_origins))
        .with_state(state)
}
