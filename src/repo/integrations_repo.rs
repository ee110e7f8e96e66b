use crate::domain::integration::{Integration, ServiceKind};
use anyhow::Result;
use sqlx::{PgPool, Row};
use uuid::Uuid;

#[derive(Clone)]
pub struct IntegrationsRepo {
    pub pool: PgPool,
}

fn integration_from_row(row: &sqlx::postgres::PgRow) -> Integration {
    let service: String = row.get("service_type");
    Integration {
        integration_id: row.get("integration_id"),
        creator_id: row.get("creator_id"),
        service: ServiceKind::parse(&service).unwrap_or(ServiceKind::Youtube),
        access_token: row.get("access_token"),
        refresh_token: row.get("refresh_token"),
        expires_at: row.get("expires_at"),
        scopes: row.get("scopes"),
        updated_at: row.get("updated_at"),
    }
}

impl IntegrationsRepo {
    #[allow(clippy::too_many_arguments)]
    pub async fn upsert(
        &self,
        creator_id: Uuid,
        service: ServiceKind,
        access_token: &str,
        refresh_token: Option<&str>,
        expires_at: chrono::DateTime<chrono::Utc>,
        scopes: &str,
    ) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO integrations (integration_id, creator_id, service_type, access_token, refresh_token, expires_at, scopes)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (creator_id, service_type) DO UPDATE SET
              access_token = EXCLUDED.access_token,
              refresh_token = COALESCE(EXCLUDED.refresh_token, integrations.refresh_token),
              expires_at = EXCLUDED.expires_at,
              scopes = EXCLUDED.scopes,
              updated_at = now()
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(creator_id)
        .bind(service.as_str())
        .bind(access_token)
        .bind(refresh_token)
        .bind(expires_at)
        .bind(scopes)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn get(&self, creator_id: Uuid, service: ServiceKind) -> Result<Option<Integration>> {
        let row = sqlx::query(
            r#"
            SELECT integration_id, creator_id, service_type, access_token, refresh_token, expires_at, scopes, updated_at
            FROM integrations
            WHERE creator_id = $1 AND service_type = $2
            "#,
        )
        .bind(creator_id)
        .bind(service.as_str())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| integration_from_row(&r)))
    }

    pub async fn update_access_token(
        &self,
        creator_id: Uuid,
        service: ServiceKind,
        access_token: &str,
        expires_at: chrono::DateTime<chrono::Utc>,
    ) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE integrations
            SET access_token = $3, expires_at = $4, updated_at = now()
            WHERE creator_id = $1 AND service_type = $2
            "#,
        )
        .bind(creator_id)
        .bind(service.as_str())
        .bind(access_token)
        .bind(expires_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn delete(&self, creator_id: Uuid, service: ServiceKind) -> Result<()> {
        sqlx::query("DELETE FROM integrations WHERE creator_id = $1 AND service_type = $2")
            .bind(creator_id)
            .bind(service.as_str())
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    pub async fn list(&self, creator_id: Uuid) -> Result<Vec<Integration>> {
        let rows = sqlx::query(
            r#"
            SELECT integration_id, creator_id, service_type, access_token, refresh_token, expires_at, scopes, updated_at
            FROM integrations
            WHERE creator_id = $1
            ORDER BY service_type ASC
            "#,
        )
        .bind(creator_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(integration_from_row).collect())
    }
}
