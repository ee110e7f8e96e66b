use crate::domain::user::{Role, User};
use anyhow::Result;
use sqlx::{PgPool, Row};
use uuid::Uuid;

#[derive(Clone)]
pub struct SessionsRepo {
    pub pool: PgPool,
}

impl SessionsRepo {
    pub async fn insert(
        &self,
        user_id: Uuid,
        token_digest: &str,
        expires_at: chrono::DateTime<chrono::Utc>,
    ) -> Result<()> {
        sqlx::query(
            "INSERT INTO sessions (session_id, user_id, token_digest, expires_at) VALUES ($1, $2, $3, $4)",
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(token_digest)
        .bind(expires_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn find_user(&self, token_digest: &str) -> Result<Option<User>> {
        let row = sqlx::query(
            r#"
            SELECT u.user_id, u.username, u.role, u.creator_id, u.invitation_accepted, u.created_at
            FROM sessions s
            JOIN users u ON u.user_id = s.user_id
            WHERE s.token_digest = $1 AND s.expires_at > now()
            "#,
        )
        .bind(token_digest)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| {
            let role: String = r.get("role");
            User {
                user_id: r.get("user_id"),
                username: r.get("username"),
                role: Role::parse(&role).unwrap_or(Role::Editor),
                creator_id: r.get("creator_id"),
                invitation_accepted: r.get("invitation_accepted"),
                created_at: r.get("created_at"),
            }
        }))
    }

    pub async fn delete(&self, token_digest: &str) -> Result<()> {
        sqlx::query("DELETE FROM sessions WHERE token_digest = $1")
            .bind(token_digest)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    pub async fn purge_expired(&self) -> Result<u64> {
        let result = sqlx::query("DELETE FROM sessions WHERE expires_at <= now()")
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}
