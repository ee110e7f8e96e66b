use crate::domain::drive_file::DriveFile;
use crate::google::RemoteFile;
use anyhow::Result;
use sqlx::{PgPool, Row};
use uuid::Uuid;

#[derive(Clone)]
pub struct DriveFilesRepo {
    pub pool: PgPool,
}

fn file_from_row(row: &sqlx::postgres::PgRow) -> DriveFile {
    DriveFile {
        id: row.get("id"),
        file_id: row.get("file_id"),
        name: row.get("name"),
        mime_type: row.get("mime_type"),
        size: row.get("size"),
        modified_time: row.get("modified_time"),
        web_view_link: row.get("web_view_link"),
        creator_id: row.get("creator_id"),
        cached_at: row.get("cached_at"),
    }
}

const FILE_COLUMNS: &str =
    "id, file_id, name, mime_type, size, modified_time, web_view_link, creator_id, cached_at";

impl DriveFilesRepo {
    pub async fn upsert(&self, creator_id: Uuid, remote: &RemoteFile) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO drive_files (id, file_id, name, mime_type, size, modified_time, web_view_link, creator_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ON CONFLICT (creator_id, file_id) DO UPDATE SET
              name = EXCLUDED.name,
              mime_type = EXCLUDED.mime_type,
              size = EXCLUDED.size,
              modified_time = EXCLUDED.modified_time,
              web_view_link = EXCLUDED.web_view_link,
              cached_at = now()
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&remote.file_id)
        .bind(&remote.name)
        .bind(&remote.mime_type)
        .bind(remote.size)
        .bind(remote.modified_time)
        .bind(&remote.web_view_link)
        .bind(creator_id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn list(&self, creator_id: Uuid) -> Result<Vec<DriveFile>> {
        let rows = sqlx::query(&format!(
            "SELECT {FILE_COLUMNS} FROM drive_files WHERE creator_id = $1 ORDER BY modified_time DESC",
        ))
        .bind(creator_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(file_from_row).collect())
    }

    pub async fn get(&self, id: Uuid) -> Result<Option<DriveFile>> {
        let row = sqlx::query(&format!("SELECT {FILE_COLUMNS} FROM drive_files WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(|r| file_from_row(&r)))
    }

    pub async fn count(&self, creator_id: Uuid) -> Result<i64> {
        let row = sqlx::query("SELECT COUNT(*) AS n FROM drive_files WHERE creator_id = $1")
            .bind(creator_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(row.get("n"))
    }
}
