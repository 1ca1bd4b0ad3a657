//! Enrollment repository.
//!
//! Reads return raw (account, course, role) rows; aggregation into
//! enrollments happens in the domain layer.

use sqlx::{PgConnection, PgPool};
use thiserror::Error;

use crate::entities::EnrollmentRowEntity;
use crate::metrics::QueryTimer;

#[derive(Debug, Error)]
pub enum EnrollmentWriteError {
    #[error("A course must keep at least one owner")]
    LastOwner,

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

const ROW_SELECT: &str = r#"
    SELECT acr.id, acr.account_id, acr.course_id, cr.name AS role_name,
           a.email, a.name, a.avatar, acr.created_at, acr.updated_at
    FROM account_course_roles acr
    JOIN course_roles cr ON cr.id = acr.course_role_id
    JOIN accounts a ON a.id = acr.account_id
"#;

/// Repository for per-course role assignments.
#[derive(Clone)]
pub struct EnrollmentRepository {
    pool: PgPool,
}

impl EnrollmentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// All role rows of a course, grouped by account in enrollment order.
    pub async fn rows_for_course(
        &self,
        course_id: i64,
    ) -> Result<Vec<EnrollmentRowEntity>, sqlx::Error> {
        let timer = QueryTimer::new("enrollment_rows_for_course");
        let sql = format!("{ROW_SELECT} WHERE acr.course_id = $1 ORDER BY acr.account_id, acr.id");
        let result = sqlx::query_as::<_, EnrollmentRowEntity>(&sql)
            .bind(course_id)
            .fetch_all(&self.pool)
            .await;
        timer.finish(&result);
        result
    }

    /// Role rows of one account in one course.
    pub async fn rows_for_account_in_course(
        &self,
        course_id: i64,
        account_id: i64,
    ) -> Result<Vec<EnrollmentRowEntity>, sqlx::Error> {
        let timer = QueryTimer::new("enrollment_rows_for_account_in_course");
        let sql = format!(
            "{ROW_SELECT} WHERE acr.course_id = $1 AND acr.account_id = $2 ORDER BY acr.id"
        );
        let result = sqlx::query_as::<_, EnrollmentRowEntity>(&sql)
            .bind(course_id)
            .bind(account_id)
            .fetch_all(&self.pool)
            .await;
        timer.finish(&result);
        result
    }

    /// Role rows of one account across all of its courses.
    pub async fn rows_for_account(
        &self,
        account_id: i64,
    ) -> Result<Vec<EnrollmentRowEntity>, sqlx::Error> {
        let timer = QueryTimer::new("enrollment_rows_for_account");
        let sql = format!("{ROW_SELECT} WHERE acr.account_id = $1 ORDER BY acr.course_id, acr.id");
        let result = sqlx::query_as::<_, EnrollmentRowEntity>(&sql)
            .bind(account_id)
            .fetch_all(&self.pool)
            .await;
        timer.finish(&result);
        result
    }

    /// Replace an account's role set in a course.
    ///
    /// Roles outside `role_ids` are removed, missing ones inserted; held
    /// roles keep their rows. An empty slice removes the enrollment. Fails
    /// with [`EnrollmentWriteError::LastOwner`] if the course would lose its
    /// last `owner_role_id` holder.
    pub async fn set_roles(
        &self,
        course_id: i64,
        account_id: i64,
        role_ids: &[i64],
        owner_role_id: i64,
    ) -> Result<(), EnrollmentWriteError> {
        let timer = QueryTimer::new("set_enrollment_roles");
        let result = self
            .set_roles_guarded(course_id, account_id, role_ids, owner_role_id)
            .await;
        timer.finish(&result);
        result
    }

    async fn set_roles_guarded(
        &self,
        course_id: i64,
        account_id: i64,
        role_ids: &[i64],
        owner_role_id: i64,
    ) -> Result<(), EnrollmentWriteError> {
        let mut tx = self.pool.begin().await?;
        let owners_before = lock_and_count_owners(&mut *tx, course_id, owner_role_id).await?;

        sqlx::query(
            r#"
            DELETE FROM account_course_roles
            WHERE course_id = $1 AND account_id = $2 AND NOT (course_role_id = ANY($3))
            "#,
        )
        .bind(course_id)
        .bind(account_id)
        .bind(role_ids)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            INSERT INTO account_course_roles (account_id, course_id, course_role_id)
            SELECT $1, $2, role_id FROM UNNEST($3::BIGINT[]) AS role_id
            ON CONFLICT (account_id, course_id, course_role_id)
            DO UPDATE SET updated_at = NOW()
            "#,
        )
        .bind(account_id)
        .bind(course_id)
        .bind(role_ids)
        .execute(&mut *tx)
        .await?;

        ensure_owner_remains(&mut *tx, course_id, owner_role_id, owners_before).await?;
        tx.commit().await?;
        Ok(())
    }

    /// Remove every role an account holds in a course. Returns false if the
    /// account was not enrolled; fails with
    /// [`EnrollmentWriteError::LastOwner`] if it was the last owner.
    pub async fn remove(
        &self,
        course_id: i64,
        account_id: i64,
        owner_role_id: i64,
    ) -> Result<bool, EnrollmentWriteError> {
        let timer = QueryTimer::new("remove_enrollment");
        let result = self
            .remove_guarded(course_id, account_id, owner_role_id)
            .await;
        timer.finish(&result);
        result
    }

    async fn remove_guarded(
        &self,
        course_id: i64,
        account_id: i64,
        owner_role_id: i64,
    ) -> Result<bool, EnrollmentWriteError> {
        let mut tx = self.pool.begin().await?;
        let owners_before = lock_and_count_owners(&mut *tx, course_id, owner_role_id).await?;

        let removed = sqlx::query(
            "DELETE FROM account_course_roles WHERE course_id = $1 AND account_id = $2",
        )
        .bind(course_id)
        .bind(account_id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        ensure_owner_remains(&mut *tx, course_id, owner_role_id, owners_before).await?;
        tx.commit().await?;
        Ok(removed > 0)
    }

    /// Number of accounts holding the given role in a course.
    pub async fn count_with_role(&self, course_id: i64, role_id: i64) -> Result<i64, sqlx::Error> {
        let timer = QueryTimer::new("count_enrollments_with_role");
        let result = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM account_course_roles
            WHERE course_id = $1 AND course_role_id = $2
            "#,
        )
        .bind(course_id)
        .bind(role_id)
        .fetch_one(&self.pool)
        .await;
        timer.finish(&result);
        result
    }
}

/// Locks the course row so concurrent enrollment writes to the same course
/// run one at a time, then counts its owners.
async fn lock_and_count_owners(
    conn: &mut PgConnection,
    course_id: i64,
    owner_role_id: i64,
) -> Result<i64, sqlx::Error> {
    sqlx::query("SELECT id FROM courses WHERE id = $1 FOR UPDATE")
        .bind(course_id)
        .fetch_optional(&mut *conn)
        .await?;
    count_owners(conn, course_id, owner_role_id).await
}

async fn count_owners(
    conn: &mut PgConnection,
    course_id: i64,
    owner_role_id: i64,
) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM account_course_roles WHERE course_id = $1 AND course_role_id = $2",
    )
    .bind(course_id)
    .bind(owner_role_id)
    .fetch_one(&mut *conn)
    .await
}

/// A course that had owners must still have one.
async fn ensure_owner_remains(
    conn: &mut PgConnection,
    course_id: i64,
    owner_role_id: i64,
    owners_before: i64,
) -> Result<(), EnrollmentWriteError> {
    let owners_after = count_owners(conn, course_id, owner_role_id).await?;
    if owners_before > 0 && owners_after == 0 {
        return Err(EnrollmentWriteError::LastOwner);
    }
    Ok(())
}
