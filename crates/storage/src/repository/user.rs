use sqlx::PgPool;
use uuid::Uuid;

use crate::error::Result;
use crate::models::UserRole;

pub struct UserRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> UserRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// One-time bootstrap: seed a minimal admin identity when the store has
    /// none, so attendance marking and prize awards have a resolvable actor
    /// on a fresh install. Runs at startup, never during request handling.
    /// Returns true when a row was inserted.
    pub async fn ensure_bootstrap_admin(
        &self,
        name: &str,
        email: &str,
        now: chrono::NaiveDateTime,
    ) -> Result<bool> {
        let existing = sqlx::query_scalar::<_, Uuid>(
            "SELECT user_id FROM users WHERE role = $1 LIMIT 1",
        )
        .bind(UserRole::Admin)
        .fetch_optional(self.pool)
        .await?;

        if existing.is_some() {
            return Ok(false);
        }

        let result = sqlx::query(
            r#"
            INSERT INTO users (user_id, name, email, role, is_active, created_at)
            VALUES ($1, $2, $3, $4, TRUE, $5)
            ON CONFLICT (email) DO NOTHING
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(name)
        .bind(email)
        .bind(UserRole::Admin)
        .bind(now)
        .execute(self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
