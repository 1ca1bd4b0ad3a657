//! Account repository for database operations.

use sqlx::PgPool;

use crate::entities::AccountEntity;
use crate::metrics::QueryTimer;

const ACCOUNT_COLUMNS: &str = r#"
    a.id, a.email, a.name, a.avatar, a.password_hash,
    COALESCE(
        ARRAY_AGG(gr.name ORDER BY gr.name) FILTER (WHERE gr.name IS NOT NULL),
        ARRAY[]::VARCHAR[]
    ) AS global_roles,
    a.created_at, a.updated_at
"#;

const ACCOUNT_JOINS: &str = r#"
    FROM accounts a
    LEFT JOIN account_global_roles agr ON agr.account_id = a.id
    LEFT JOIN global_roles gr ON gr.id = agr.global_role_id
"#;

/// Repository for accounts and their global roles.
#[derive(Clone)]
pub struct AccountRepository {
    pool: PgPool,
}

impl AccountRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find an account by ID.
    pub async fn find_by_id(&self, id: i64) -> Result<Option<AccountEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_account_by_id");
        let sql = format!(
            "SELECT {ACCOUNT_COLUMNS} {ACCOUNT_JOINS} WHERE a.id = $1 GROUP BY a.id"
        );
        let result = sqlx::query_as::<_, AccountEntity>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await;
        timer.finish(&result);
        result
    }

    /// Find an account by email address (case-insensitive).
    pub async fn find_by_email(&self, email: &str) -> Result<Option<AccountEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_account_by_email");
        let sql = format!(
            "SELECT {ACCOUNT_COLUMNS} {ACCOUNT_JOINS} WHERE LOWER(a.email) = LOWER($1) GROUP BY a.id"
        );
        let result = sqlx::query_as::<_, AccountEntity>(&sql)
            .bind(email)
            .fetch_optional(&self.pool)
            .await;
        timer.finish(&result);
        result
    }

    /// Create an account holding the given global roles.
    ///
    /// Fails with a unique violation when the email is taken.
    pub async fn create(
        &self,
        email: &str,
        name: &str,
        avatar: Option<&str>,
        password_hash: &str,
        global_roles: &[&str],
    ) -> Result<AccountEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_account");
        let mut tx = self.pool.begin().await?;

        let (id,): (i64,) = sqlx::query_as(
            r#"
            INSERT INTO accounts (email, name, avatar, password_hash)
            VALUES (LOWER($1), $2, $3, $4)
            RETURNING id
            "#,
        )
        .bind(email)
        .bind(name)
        .bind(avatar)
        .bind(password_hash)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            INSERT INTO account_global_roles (account_id, global_role_id)
            SELECT $1, id FROM global_roles WHERE name = ANY($2)
            "#,
        )
        .bind(id)
        .bind(global_roles)
        .execute(&mut *tx)
        .await?;

        let sql = format!(
            "SELECT {ACCOUNT_COLUMNS} {ACCOUNT_JOINS} WHERE a.id = $1 GROUP BY a.id"
        );
        let account = sqlx::query_as::<_, AccountEntity>(&sql)
            .bind(id)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        timer.record();
        Ok(account)
    }

    /// Grant an additional global role. Granting a held role is a no-op.
    ///
    /// Returns false when the account or the role does not exist.
    pub async fn grant_global_role(&self, account_id: i64, role: &str) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("grant_global_role");
        let result = sqlx::query(
            r#"
            INSERT INTO account_global_roles (account_id, global_role_id)
            SELECT a.id, gr.id
            FROM accounts a, global_roles gr
            WHERE a.id = $1 AND gr.name = $2
            ON CONFLICT DO NOTHING
            RETURNING account_id
            "#,
        )
        .bind(account_id)
        .bind(role)
        .fetch_optional(&self.pool)
        .await;
        timer.finish(&result);
        Ok(result?.is_some() || self.has_global_role(account_id, role).await?)
    }

    /// Revoke a global role. Returns false when it was not held.
    pub async fn revoke_global_role(&self, account_id: i64, role: &str) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("revoke_global_role");
        let result = sqlx::query(
            r#"
            DELETE FROM account_global_roles
            WHERE account_id = $1
              AND global_role_id = (SELECT id FROM global_roles WHERE name = $2)
            "#,
        )
        .bind(account_id)
        .bind(role)
        .execute(&self.pool)
        .await;
        timer.finish(&result);
        Ok(result?.rows_affected() > 0)
    }

    async fn has_global_role(&self, account_id: i64, role: &str) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("has_global_role");
        let result = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS(
                SELECT 1
                FROM account_global_roles agr
                JOIN global_roles gr ON gr.id = agr.global_role_id
                WHERE agr.account_id = $1 AND gr.name = $2
            )
            "#,
        )
        .bind(account_id)
        .bind(role)
        .fetch_one(&self.pool)
        .await;
        timer.finish(&result);
        result
    }
}
