//! Attendance repository for database operations.

use sqlx::PgPool;

use crate::entities::AttendanceEntity;
use crate::metrics::QueryTimer;

/// Repository for event check-ins.
#[derive(Clone)]
pub struct AttendanceRepository {
    pool: PgPool,
}

impl AttendanceRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Every check-in recorded for a course.
    pub async fn list_for_course(
        &self,
        course_id: i64,
    ) -> Result<Vec<AttendanceEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_attendances_for_course");
        let result = sqlx::query_as::<_, AttendanceEntity>(
            r#"
            SELECT id, account_id, course_id, event_id, longitude, latitude, created_at
            FROM attendances
            WHERE course_id = $1
            ORDER BY id
            "#,
        )
        .bind(course_id)
        .fetch_all(&self.pool)
        .await;
        timer.finish(&result);
        result
    }

    /// One account's check-ins within a course.
    pub async fn list_for_account_in_course(
        &self,
        course_id: i64,
        account_id: i64,
    ) -> Result<Vec<AttendanceEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_attendances_for_account");
        let result = sqlx::query_as::<_, AttendanceEntity>(
            r#"
            SELECT id, account_id, course_id, event_id, longitude, latitude, created_at
            FROM attendances
            WHERE course_id = $1 AND account_id = $2
            ORDER BY id
            "#,
        )
        .bind(course_id)
        .bind(account_id)
        .fetch_all(&self.pool)
        .await;
        timer.finish(&result);
        result
    }

    /// Record a check-in.
    ///
    /// A second check-in for the same account and event fails with a unique
    /// violation.
    pub async fn create(
        &self,
        account_id: i64,
        course_id: i64,
        event_id: i64,
        longitude: Option<f64>,
        latitude: Option<f64>,
    ) -> Result<AttendanceEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_attendance");
        let result = sqlx::query_as::<_, AttendanceEntity>(
            r#"
            INSERT INTO attendances (account_id, course_id, event_id, longitude, latitude)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, account_id, course_id, event_id, longitude, latitude, created_at
            "#,
        )
        .bind(account_id)
        .bind(course_id)
        .bind(event_id)
        .bind(longitude)
        .bind(latitude)
        .fetch_one(&self.pool)
        .await;
        timer.finish(&result);
        result
    }
}
