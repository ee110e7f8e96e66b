use crate::domain::user::{Role, User};
use anyhow::Result;
use sqlx::{PgPool, Row};
use uuid::Uuid;

#[derive(Clone)]
pub struct UsersRepo {
    pub pool: PgPool,
}

#[derive(Debug, Clone)]
pub struct UserAuthRow {
    pub user: User,
    pub password_hash: String,
}

fn user_from_row(row: &sqlx::postgres::PgRow) -> User {
    let role: String = row.get("role");
    User {
        user_id: row.get("user_id"),
        username: row.get("username"),
        role: Role::parse(&role).unwrap_or(Role::Editor),
        creator_id: row.get("creator_id"),
        invitation_accepted: row.get("invitation_accepted"),
        created_at: row.get("created_at"),
    }
}

const USER_COLUMNS: &str =
    "user_id, username, role, creator_id, invitation_accepted, created_at";

impl UsersRepo {
    pub async fn create_creator(&self, username: &str, password_hash: &str) -> Result<User> {
        let user_id = Uuid::new_v4();
        let row = sqlx::query(&format!(
            r#"
            INSERT INTO users (user_id, username, password_hash, role, invitation_accepted)
            VALUES ($1, $2, $3, 'creator', true)
            RETURNING {USER_COLUMNS}
            "#,
        ))
        .bind(user_id)
        .bind(username)
        .bind(password_hash)
        .fetch_one(&self.pool)
        .await?;

        Ok(user_from_row(&row))
    }

    pub async fn create_invited(
        &self,
        username: &str,
        role: Role,
        creator_id: Uuid,
        invited_by: Uuid,
        invitation_token: &str,
    ) -> Result<User> {
        let user_id = Uuid::new_v4();
        let row = sqlx::query(&format!(
            r#"
            INSERT INTO users (user_id, username, password_hash, role, creator_id, invited_by, invitation_token, invitation_accepted)
            VALUES ($1, $2, '', $3, $4, $5, $6, false)
            RETURNING {USER_COLUMNS}
            "#,
        ))
        .bind(user_id)
        .bind(username)
        .bind(role.as_str())
        .bind(creator_id)
        .bind(invited_by)
        .bind(invitation_token)
        .fetch_one(&self.pool)
        .await?;

        Ok(user_from_row(&row))
    }

    pub async fn find_by_username(&self, username: &str) -> Result<Option<UserAuthRow>> {
        let row = sqlx::query(&format!(
            "SELECT {USER_COLUMNS}, password_hash FROM users WHERE username = $1",
        ))
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| UserAuthRow {
            user: user_from_row(&r),
            password_hash: r.get("password_hash"),
        }))
    }

    pub async fn get(&self, user_id: Uuid) -> Result<Option<User>> {
        let row = sqlx::query(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE user_id = $1",
        ))
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| user_from_row(&r)))
    }

    pub async fn find_by_invitation_token(&self, token: &str) -> Result<Option<User>> {
        let row = sqlx::query(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE invitation_token = $1 AND invitation_accepted = false",
        ))
        .bind(token)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| user_from_row(&r)))
    }

    pub async fn accept_invitation(&self, user_id: Uuid, password_hash: &str) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE users
            SET password_hash = $2, invitation_accepted = true, invitation_token = NULL
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .bind(password_hash)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn team_members(&self, creator_id: Uuid) -> Result<Vec<User>> {
        let rows = sqlx::query(&format!(
            r#"
            SELECT {USER_COLUMNS} FROM users
            WHERE user_id = $1 OR creator_id = $1
            ORDER BY username ASC
            "#,
        ))
        .bind(creator_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(user_from_row).collect())
    }
}
