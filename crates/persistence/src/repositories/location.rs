//! Location repository for database operations.

use sqlx::PgPool;

use crate::entities::LocationEntity;
use crate::metrics::QueryTimer;

/// Repository for course locations.
#[derive(Clone)]
pub struct LocationRepository {
    pool: PgPool,
}

impl LocationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list_for_course(&self, course_id: i64) -> Result<Vec<LocationEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_locations_for_course");
        let result = sqlx::query_as::<_, LocationEntity>(
            r#"
            SELECT id, course_id, name, longitude, latitude, created_at, updated_at
            FROM locations
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

    /// Find a location, scoped to its course.
    pub async fn find(
        &self,
        course_id: i64,
        id: i64,
    ) -> Result<Option<LocationEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_location");
        let result = sqlx::query_as::<_, LocationEntity>(
            r#"
            SELECT id, course_id, name, longitude, latitude, created_at, updated_at
            FROM locations
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
        name: &str,
        longitude: Option<f64>,
        latitude: Option<f64>,
    ) -> Result<LocationEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_location");
        let result = sqlx::query_as::<_, LocationEntity>(
            r#"
            INSERT INTO locations (course_id, name, longitude, latitude)
            VALUES ($1, $2, $3, $4)
            RETURNING id, course_id, name, longitude, latitude, created_at, updated_at
            "#,
        )
        .bind(course_id)
        .bind(name)
        .bind(longitude)
        .bind(latitude)
        .fetch_one(&self.pool)
        .await;
        timer.finish(&result);
        result
    }

    /// Overwrite a location's name and coordinates.
    pub async fn update(
        &self,
        course_id: i64,
        id: i64,
        name: &str,
        longitude: Option<f64>,
        latitude: Option<f64>,
    ) -> Result<Option<LocationEntity>, sqlx::Error> {
        let timer = QueryTimer::new("update_location");
        let result = sqlx::query_as::<_, LocationEntity>(
            r#"
            UPDATE locations
            SET name = $3, longitude = $4, latitude = $5, updated_at = NOW()
            WHERE course_id = $1 AND id = $2
            RETURNING id, course_id, name, longitude, latitude, created_at, updated_at
            "#,
        )
        .bind(course_id)
        .bind(id)
        .bind(name)
        .bind(longitude)
        .bind(latitude)
        .fetch_optional(&self.pool)
        .await;
        timer.finish(&result);
        result
    }

    /// Delete a location and, by cascade, its events.
    pub async fn delete(&self, course_id: i64, id: i64) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("delete_location");
        let result = sqlx::query("DELETE FROM locations WHERE course_id = $1 AND id = $2")
            .bind(course_id)
            .bind(id)
            .execute(&self.pool)
            .await;
        timer.finish(&result);
        Ok(result?.rows_affected() > 0)
    }
}
