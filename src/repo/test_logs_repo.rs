use crate::domain::abtest::TestLogEntry;
use anyhow::Result;
use sqlx::{PgPool, Row};
use uuid::Uuid;

#[derive(Clone)]
pub struct TestLogsRepo {
    pub pool: PgPool,
}

impl TestLogsRepo {
    pub async fn append(
        &self,
        test_id: Uuid,
        action: &str,
        user_id: Option<Uuid>,
        details: serde_json::Value,
    ) -> Result<()> {
        sqlx::query(
            "INSERT INTO test_logs (log_id, test_id, action, user_id, details) VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(Uuid::new_v4())
        .bind(test_id)
        .bind(action)
        .bind(user_id)
        .bind(details)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn list(&self, test_id: Uuid) -> Result<Vec<TestLogEntry>> {
        let rows = sqlx::query(
            r#"
            SELECT test_id, action, user_id, details, timestamp
            FROM test_logs
            WHERE test_id = $1
            ORDER BY timestamp DESC
            "#,
        )
        .bind(test_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|r| TestLogEntry {
                test_id: r.get("test_id"),
                action: r.get("action"),
                user_id: r.get("user_id"),
                details: r.get("details"),
                timestamp: r.get("timestamp"),
            })
            .collect())
    }

    /// Ordered variant application history, used for metrics attribution.
    pub async fn variant_changes(
        &self,
        test_id: Uuid,
    ) -> Result<Vec<(Uuid, chrono::DateTime<chrono::Utc>)>> {
        let rows = sqlx::query(
            r#"
            SELECT (details->>'variant_id')::uuid AS variant_id, timestamp
            FROM test_logs
            WHERE test_id = $1 AND action = 'variant_changed' AND details->>'variant_id' IS NOT NULL
            ORDER BY timestamp ASC
            "#,
        )
        .bind(test_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|r| (r.get("variant_id"), r.get("timestamp")))
            .collect())
    }
}
