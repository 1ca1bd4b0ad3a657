//! Attendance report route.

use axum::{
    extract::{Path, State},
    Json,
};
use domain::models::{Attendance, Enrollment, Event};
use domain::policies::{Capability, ResourcePolicy};
use domain::services::AttendanceReport;
use persistence::repositories::{AttendanceRepository, EnrollmentRepository, EventRepository};

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::Authenticated;
use crate::middleware::metrics::record_report_generated;
use crate::services::CourseAccess;

/// Picks the enrollments a report may cover.
///
/// Teaching roles see every student; a student sees only themselves.
fn visible_students(
    access: &CourseAccess,
    can_view_all: bool,
    course_enrollments: Vec<Enrollment>,
) -> Result<Vec<Enrollment>, ApiError> {
    if can_view_all {
        return Ok(course_enrollments
            .into_iter()
            .filter(Enrollment::is_student)
            .collect());
    }

    match &access.enrollment {
        Some(own) if own.is_student() => Ok(vec![own.clone()]),
        _ => Err(ApiError::Forbidden(
            "Only students and teaching roles have attendance reports".to_string(),
        )),
    }
}

/// Per-student attendance statistics over every event of the course.
///
/// GET /api/v1/courses/:course_id/attendance-report
pub async fn attendance_report(
    State(state): State<AppState>,
    auth: Authenticated,
    Path(course_id): Path<i64>,
) -> Result<Json<AttendanceReport>, ApiError> {
    let access = CourseAccess::load(&state.pool, course_id, &auth.0).await?;
    let policy = access.attendance_policy();
    access.require(&policy, Capability::View, "attendance report")?;
    let can_view_all = policy.can_view_all();

    let course_enrollments = if can_view_all {
        let rows = EnrollmentRepository::new(state.pool.clone())
            .rows_for_course(course_id)
            .await?;
        Enrollment::aggregate(rows.into_iter().map(Into::into))?
    } else {
        Vec::new()
    };
    let students = visible_students(&access, can_view_all, course_enrollments)?;

    let events: Vec<Event> = EventRepository::new(state.pool.clone())
        .list_for_course(course_id)
        .await?
        .into_iter()
        .map(Event::from)
        .collect();

    let attendance_repo = AttendanceRepository::new(state.pool.clone());
    let records = if can_view_all {
        attendance_repo.list_for_course(course_id).await?
    } else {
        attendance_repo
            .list_for_account_in_course(course_id, auth.account_id())
            .await?
    };
    let attendances: Vec<Attendance> = records.into_iter().map(Attendance::from).collect();

    let report = AttendanceReport::build(&access.course.name, &events, &attendances, &students);
    record_report_generated(report.student_count());

    tracing::info!(
        course_id,
        account_id = auth.account_id(),
        students = report.student_count(),
        events = events.len(),
        "Attendance report generated"
    );

    Ok(Json(report))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use domain::models::{Course, EnrollmentRow, GlobalRole, Requestor};

    fn enrollment(account_id: i64, roles: &[&str]) -> Option<Enrollment> {
        let now = Utc::now();
        let rows = roles.iter().enumerate().map(|(i, role)| EnrollmentRow {
            id: account_id * 10 + i as i64,
            account_id,
            course_id: 3,
            role_name: role.to_string(),
            email: format!("user{}@example.com", account_id),
            name: format!("User {}", account_id),
            avatar: None,
            created_at: now,
            updated_at: now,
        });
        Enrollment::aggregate_one(rows).unwrap()
    }

    fn access(account_id: i64, roles: &[&str]) -> CourseAccess {
        let now = Utc::now();
        CourseAccess {
            requestor: Requestor::new(account_id, [GlobalRole::Member]),
            course: Course {
                id: 3,
                name: "Networks".to_string(),
                description: None,
                created_by: None,
                created_at: now,
                updated_at: now,
            },
            enrollment: enrollment(account_id, roles),
        }
    }

    #[test]
    fn test_teaching_sees_only_students() {
        let all = vec![
            enrollment(1, &["instructor"]).unwrap(),
            enrollment(2, &["student"]).unwrap(),
            enrollment(3, &["student", "staff"]).unwrap(),
        ];
        let visible = visible_students(&access(1, &["instructor"]), true, all).unwrap();
        let ids: Vec<i64> = visible.iter().map(|e| e.account_id).collect();
        assert_eq!(ids, vec![2, 3]);
    }

    #[test]
    fn test_student_sees_only_self() {
        let visible = visible_students(&access(2, &["student"]), false, Vec::new()).unwrap();
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].account_id, 2);
    }

    #[test]
    fn test_unenrolled_rejected() {
        let result = visible_students(&access(9, &[]), false, Vec::new());
        assert!(matches!(result, Err(ApiError::Forbidden(_))));
    }
}
