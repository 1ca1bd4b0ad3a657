//! Event repository for database operations.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::entities::EventEntity;
use crate::metrics::QueryTimer;

/// Repository for course events.
#[derive(Clone)]
pub struct EventRepository {
    pool: PgPool,
}

impl EventRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Events of a course in chronological order.
    pub async fn list_for_course(&self, course_id: i64) -> Result<Vec<EventEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_events_for_course");
        let result = sqlx::query_as::<_, EventEntity>(
            r#"
            SELECT id, course_id, location_id, name, start_at, end_at, created_at, updated_at
            FROM events
            WHERE course_id = $1
            ORDER BY start_at, id
            "#,
        )
        .bind(course_id)
        .fetch_all(&self.pool)
        .await;
        timer.finish(&result);
        result
    }

    /// Find an event, scoped to its course.
    pub async fn find(&self, course_id: i64, id: i64) -> Result<Option<EventEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_event");
        let result = sqlx::query_as::<_, EventEntity>(
            r#"
            SELECT id, course_id, location_id, name, start_at, end_at, created_at, updated_at
            FROM events
            WHERE course_id = $1 AND id = $2
            "#,
        )
        .bind(course_id)
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.finish(&result);
        result
    }

    pub async fn create(
        &self,
        course_id: i64,
        location_id: i64,
        name: &str,
        start_at: DateTime<Utc>,
        end_at: DateTime<Utc>,
    ) -> Result<EventEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_event");
        let result = sqlx::query_as::<_, EventEntity>(
            r#"
            INSERT INTO events (course_id, location_id, name, start_at, end_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, course_id, location_id, name, start_at, end_at, created_at, updated_at
            "#,
        )
        .bind(course_id)
        .bind(location_id)
        .bind(name)
        .bind(start_at)
        .bind(end_at)
        .fetch_one(&self.pool)
        .await;
        timer.finish(&result);
        result
    }

    /// Overwrite an event's fields.
    pub async fn update(
        &self,
        course_id: i64,
        id: i64,
        location_id: i64,
        name: &str,
        start_at: DateTime<Utc>,
        end_at: DateTime<Utc>,
    ) -> Result<Option<EventEntity>, sqlx::Error> {
        let timer = QueryTimer::new("update_event");
        let result = sqlx::query_as::<_, EventEntity>(
            r#"
            UPDATE events
            SET location_id = $3, name = $4, start_at = $5, end_at = $6, updated_at = NOW()
            WHERE course_id = $1 AND id = $2
            RETURNING id, course_id, location_id, name, start_at, end_at, created_at, updated_at
            "#,
        )
        .bind(course_id)
        .bind(id)
        .bind(location_id)
        .bind(name)
        .bind(start_at)
        .bind(end_at)
        .fetch_optional(&self.pool)
        .await;
        timer.finish(&result);
        result
    }

    pub async fn delete(&self, course_id: i64, id: i64) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("delete_event");
        let result = sqlx::query("DELETE FROM events WHERE course_id = $1 AND id = $2")
            .bind(course_id)
            .bind(id)
            .execute(&self.pool)
            .await;
        timer.finish(&result);
        Ok(result?.rows_affected() > 0)
    }
}
