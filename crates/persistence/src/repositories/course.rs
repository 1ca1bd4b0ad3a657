//! Course repository for database operations.

use sqlx::PgPool;

use crate::entities::CourseEntity;
use crate::metrics::QueryTimer;

/// Repository for course-related database operations.
#[derive(Clone)]
pub struct CourseRepository {
    pool: PgPool,
}

impl CourseRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// List every course, oldest first.
    pub async fn list_all(&self) -> Result<Vec<CourseEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_all_courses");
        let result = sqlx::query_as::<_, CourseEntity>(
            r#"
            SELECT id, name, description, created_by, created_at, updated_at
            FROM courses
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await;
        timer.finish(&result);
        result
    }

    /// List the courses an account holds at least one role in.
    pub async fn list_for_account(&self, account_id: i64) -> Result<Vec<CourseEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_courses_for_account");
        let result = sqlx::query_as::<_, CourseEntity>(
            r#"
            SELECT c.id, c.name, c.description, c.created_by, c.created_at, c.updated_at
            FROM courses c
            WHERE EXISTS (
                SELECT 1 FROM account_course_roles acr
                WHERE acr.course_id = c.id AND acr.account_id = $1
            )
            ORDER BY c.id
            "#,
        )
        .bind(account_id)
        .fetch_all(&self.pool)
        .await;
        timer.finish(&result);
        result
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<CourseEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_course_by_id");
        let result = sqlx::query_as::<_, CourseEntity>(
            r#"
            SELECT id, name, description, created_by, created_at, updated_at
            FROM courses
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.finish(&result);
        result
    }

    /// Create a course and enroll its creator with the given role.
    pub async fn create(
        &self,
        name: &str,
        description: Option<&str>,
        created_by: i64,
        creator_role_id: i64,
    ) -> Result<CourseEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_course");
        let mut tx = self.pool.begin().await?;

        let course = sqlx::query_as::<_, CourseEntity>(
            r#"
            INSERT INTO courses (name, description, created_by)
            VALUES ($1, $2, $3)
            RETURNING id, name, description, created_by, created_at, updated_at
            "#,
        )
        .bind(name)
        .bind(description)
        .bind(created_by)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            INSERT INTO account_course_roles (account_id, course_id, course_role_id)
            VALUES ($1, $2, $3)
            "#,
        )
        .bind(created_by)
        .bind(course.id)
        .bind(creator_role_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        timer.record();
        Ok(course)
    }

    /// Update a course's fields. `None` keeps the current value.
    pub async fn update(
        &self,
        id: i64,
        name: Option<&str>,
        description: Option<&str>,
    ) -> Result<Option<CourseEntity>, sqlx::Error> {
        let timer = QueryTimer::new("update_course");
        let result = sqlx::query_as::<_, CourseEntity>(
            r#"
            UPDATE courses
            SET name = COALESCE($2, name),
                description = COALESCE($3, description),
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, name, description, created_by, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(description)
        .fetch_optional(&self.pool)
        .await;
        timer.finish(&result);
        result
    }

    /// Delete a course; enrollments, locations, events and attendances
    /// cascade. Returns false if no course matched.
    pub async fn delete(&self, id: i64) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("delete_course");
        let result = sqlx::query("DELETE FROM courses WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await;
        timer.finish(&result);
        Ok(result?.rows_affected() > 0)
    }
}
