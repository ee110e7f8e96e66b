use crate::domain::abtest::TestResultPoint;
use anyhow::Result;
use sqlx::{PgPool, Row};
use uuid::Uuid;

#[derive(Clone)]
pub struct TestResultsRepo {
    pub pool: PgPool,
}

impl TestResultsRepo {
    pub async fn append_points(
        &self,
        test_id: Uuid,
        variant_id: Uuid,
        points: &[(&str, f64)],
    ) -> Result<()> {
        let mut tx = self.pool.begin().await?;
        for (metric_type, value) in points {
            sqlx::query(
                "INSERT INTO test_results (result_id, test_id, variant_id, metric_type, value) VALUES ($1, $2, $3, $4, $5)",
            )
            .bind(Uuid::new_v4())
            .bind(test_id)
            .bind(variant_id)
            .bind(metric_type)
            .bind(value)
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await?;
        Ok(())
    }

    pub async fn list_for_test(&self, test_id: Uuid) -> Result<Vec<TestResultPoint>> {
        let rows = sqlx::query(
            r#"
            SELECT test_id, variant_id, metric_type, value, recorded_at
            FROM test_results
            WHERE test_id = $1
            ORDER BY recorded_at DESC
            "#,
        )
        .bind(test_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|r| TestResultPoint {
                test_id: r.get("test_id"),
                variant_id: r.get("variant_id"),
                metric_type: r.get("metric_type"),
                value: r.get("value"),
                recorded_at: r.get("recorded_at"),
            })
            .collect())
    }
}
