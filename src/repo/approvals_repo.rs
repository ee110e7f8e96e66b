use crate::domain::approval::{ApprovalRequest, ApprovalStatus};
use anyhow::Result;
use sqlx::{PgPool, Row};
use uuid::Uuid;

#[derive(Clone)]
pub struct ApprovalsRepo {
    pub pool: PgPool,
}

fn request_from_row(row: &sqlx::postgres::PgRow) -> ApprovalRequest {
    let status: String = row.get("status");
    ApprovalRequest {
        request_id: row.get("request_id"),
        editor_id: row.get("editor_id"),
        creator_id: row.get("creator_id"),
        file_id: row.get("file_id"),
        description: row.get("description"),
        status: ApprovalStatus::parse(&status).unwrap_or(ApprovalStatus::Pending),
        reviewed_by: row.get("reviewed_by"),
        reviewed_at: row.get("reviewed_at"),
        rejection_reason: row.get("rejection_reason"),
        youtube_video_id: row.get("youtube_video_id"),
        created_at: row.get("created_at"),
    }
}

const REQUEST_COLUMNS: &str = "request_id, editor_id, creator_id, file_id, description, status, \
     reviewed_by, reviewed_at, rejection_reason, youtube_video_id, created_at";

impl ApprovalsRepo {
    pub async fn create(
        &self,
        editor_id: Uuid,
        creator_id: Uuid,
        file_id: Uuid,
        description: &str,
    ) -> Result<ApprovalRequest> {
        let row = sqlx::query(&format!(
            r#"
            INSERT INTO approval_requests (request_id, editor_id, creator_id, file_id, description, status)
            VALUES ($1, $2, $3, $4, $5, 'pending')
            RETURNING {REQUEST_COLUMNS}
            "#,
        ))
        .bind(Uuid::new_v4())
        .bind(editor_id)
        .bind(creator_id)
        .bind(file_id)
        .bind(description)
        .fetch_one(&self.pool)
        .await?;

        Ok(request_from_row(&row))
    }

    pub async fn get(&self, request_id: Uuid) -> Result<Option<ApprovalRequest>> {
        let row = sqlx::query(&format!(
            "SELECT {REQUEST_COLUMNS} FROM approval_requests WHERE request_id = $1",
        ))
        .bind(request_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| request_from_row(&r)))
    }

    pub async fn list_for_creator(
        &self,
        creator_id: Uuid,
        status: Option<ApprovalStatus>,
    ) -> Result<Vec<ApprovalRequest>> {
        let rows = match status {
            Some(status) => {
                sqlx::query(&format!(
                    r#"
                    SELECT {REQUEST_COLUMNS} FROM approval_requests
                    WHERE creator_id = $1 AND status = $2
                    ORDER BY created_at DESC
                    "#,
                ))
                .bind(creator_id)
                .bind(status.as_str())
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query(&format!(
                    r#"
                    SELECT {REQUEST_COLUMNS} FROM approval_requests
                    WHERE creator_id = $1
                    ORDER BY created_at DESC
                    "#,
                ))
                .bind(creator_id)
                .fetch_all(&self.pool)
                .await?
            }
        };

        Ok(rows.iter().map(request_from_row).collect())
    }

    pub async fn list_for_editor(&self, editor_id: Uuid) -> Result<Vec<ApprovalRequest>> {
        let rows = sqlx::query(&format!(
            r#"
            SELECT {REQUEST_COLUMNS} FROM approval_requests
            WHERE editor_id = $1
            ORDER BY created_at DESC
            "#,
        ))
        .bind(editor_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(request_from_row).collect())
    }

    pub async fn set_review(
        &self,
        request_id: Uuid,
        status: ApprovalStatus,
        reviewed_by: Uuid,
        rejection_reason: Option<&str>,
    ) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE approval_requests
            SET status = $2, reviewed_by = $3, reviewed_at = now(), rejection_reason = $4
            WHERE request_id = $1
            "#,
        )
        .bind(request_id)
        .bind(status.as_str())
        .bind(reviewed_by)
        .bind(rejection_reason)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn set_uploaded(&self, request_id: Uuid, youtube_video_id: &str) -> Result<()> {
        sqlx::query(
            "UPDATE approval_requests SET status = 'uploaded', youtube_video_id = $2 WHERE request_id = $1",
        )
        .bind(request_id)
        .bind(youtube_video_id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn counts_by_status(&self, creator_id: Uuid) -> Result<Vec<(String, i64)>> {
        let rows = sqlx::query(
            "SELECT status, COUNT(*) AS n FROM approval_requests WHERE creator_id = $1 GROUP BY status",
        )
        .bind(creator_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|r| (r.get::<String, _>("status"), r.get::<i64, _>("n")))
            .collect())
    }
}
