use crate::domain::abtest::{AbTest, TestStatus, TestType, TestVariant};
use anyhow::Result;
use sqlx::{PgPool, Row};
use uuid::Uuid;

#[derive(Clone)]
pub struct AbTestsRepo {
    pub pool: PgPool,
}

#[derive(Debug, Clone)]
pub struct CreateTestInput {
    pub creator_id: Uuid,
    pub video_id: String,
    pub video_title: String,
    pub test_type: TestType,
    pub duration_hours: i32,
    pub rotation_frequency_hours: i32,
    pub performance_threshold: f64,
    pub auto_select_winner: bool,
    pub variants: Vec<CreateVariantInput>,
}

#[derive(Debug, Clone)]
pub struct CreateVariantInput {
    pub variant_name: String,
    pub thumbnail_url: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
}

fn test_from_row(row: &sqlx::postgres::PgRow) -> AbTest {
    let test_type: String = row.get("test_type");
    let status: String = row.get("status");
    AbTest {
        test_id: row.get("test_id"),
        creator_id: row.get("creator_id"),
        video_id: row.get("video_id"),
        video_title: row.get("video_title"),
        test_type: TestType::parse(&test_type).unwrap_or(TestType::Thumbnail),
        status: TestStatus::parse(&status).unwrap_or(TestStatus::Draft),
        start_date: row.get("start_date"),
        end_date: row.get("end_date"),
        duration_hours: row.get("duration_hours"),
        rotation_frequency_hours: row.get("rotation_frequency_hours"),
        performance_threshold: row.get("performance_threshold"),
        auto_select_winner: row.get("auto_select_winner"),
        winner_variant_id: row.get("winner_variant_id"),
        completed_at: row.get("completed_at"),
        created_at: row.get("created_at"),
    }
}

fn variant_from_row(row: &sqlx::postgres::PgRow) -> TestVariant {
    TestVariant {
        variant_id: row.get("variant_id"),
        test_id: row.get("test_id"),
        variant_name: row.get("variant_name"),
        thumbnail_url: row.get("thumbnail_url"),
        title: row.get("title"),
        description: row.get("description"),
        impressions: row.get("impressions"),
        clicks: row.get("clicks"),
        views: row.get("views"),
        ctr: row.get("ctr"),
        is_winner: row.get("is_winner"),
        applied_at: row.get("applied_at"),
    }
}

const TEST_COLUMNS: &str = "test_id, creator_id, video_id, video_title, test_type, status, \
     start_date, end_date, duration_hours, rotation_frequency_hours, performance_threshold, \
     auto_select_winner, winner_variant_id, completed_at, created_at";

const VARIANT_COLUMNS: &str = "variant_id, test_id, variant_name, thumbnail_url, title, \
     description, impressions, clicks, views, ctr, is_winner, applied_at";

impl AbTestsRepo {
    /// Creates the test and its variants in one transaction.
    pub async fn create_with_variants(&self, input: CreateTestInput) -> Result<AbTest> {
        let test_id = Uuid::new_v4();
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query(&format!(
            r#"
            INSERT INTO ab_tests (
                test_id, creator_id, video_id, video_title, test_type, status,
                duration_hours, rotation_frequency_hours, performance_threshold, auto_select_winner
            ) VALUES ($1, $2, $3, $4, $5, 'draft', $6, $7, $8, $9)
            RETURNING {TEST_COLUMNS}
            "#,
        ))
        .bind(test_id)
        .bind(input.creator_id)
        .bind(&input.video_id)
        .bind(&input.video_title)
        .bind(input.test_type.as_str())
        .bind(input.duration_hours)
        .bind(input.rotation_frequency_hours)
        .bind(input.performance_threshold)
        .bind(input.auto_select_winner)
        .fetch_one(&mut *tx)
        .await?;

        for variant in &input.variants {
            sqlx::query(
                r#"
                INSERT INTO test_variants (variant_id, test_id, variant_name, thumbnail_url, title, description)
                VALUES ($1, $2, $3, $4, $5, $6)
                "#,
            )
            .bind(Uuid::new_v4())
            .bind(test_id)
            .bind(&variant.variant_name)
            .bind(&variant.thumbnail_url)
            .bind(&variant.title)
            .bind(&variant.description)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(test_from_row(&row))
    }

    pub async fn get(&self, test_id: Uuid) -> Result<Option<AbTest>> {
        let row = sqlx::query(&format!("SELECT {TEST_COLUMNS} FROM ab_tests WHERE test_id = $1"))
            .bind(test_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(|r| test_from_row(&r)))
    }

    pub async fn list_for_creator(&self, creator_id: Uuid) -> Result<Vec<AbTest>> {
        let rows = sqlx::query(&format!(
            "SELECT {TEST_COLUMNS} FROM ab_tests WHERE creator_id = $1 ORDER BY created_at DESC",
        ))
        .bind(creator_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(test_from_row).collect())
    }

    pub async fn active_tests(&self) -> Result<Vec<AbTest>> {
        let rows = sqlx::query(&format!(
            "SELECT {TEST_COLUMNS} FROM ab_tests WHERE status = 'active' ORDER BY created_at ASC",
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(test_from_row).collect())
    }

    /// Variants in name order, the rotation order.
    pub async fn variants(&self, test_id: Uuid) -> Result<Vec<TestVariant>> {
        let rows = sqlx::query(&format!(
            "SELECT {VARIANT_COLUMNS} FROM test_variants WHERE test_id = $1 ORDER BY variant_name ASC",
        ))
        .bind(test_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(variant_from_row).collect())
    }

    pub async fn set_status(&self, test_id: Uuid, status: TestStatus) -> Result<()> {
        sqlx::query("UPDATE ab_tests SET status = $2, updated_at = now() WHERE test_id = $1")
            .bind(test_id)
            .bind(status.as_str())
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    pub async fn mark_started(
        &self,
        test_id: Uuid,
        start_date: chrono::DateTime<chrono::Utc>,
        end_date: chrono::DateTime<chrono::Utc>,
    ) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE ab_tests
            SET status = 'active',
                start_date = COALESCE(start_date, $2),
                end_date = $3,
                updated_at = now()
            WHERE test_id = $1
            "#,
        )
        .bind(test_id)
        .bind(start_date)
        .bind(end_date)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Marks the winner and completes the test atomically: clears any previous
    /// winner flag so at most one variant per test ever carries it.
    pub async fn set_winner_and_complete(
        &self,
        test_id: Uuid,
        variant_id: Uuid,
        completed_at: chrono::DateTime<chrono::Utc>,
    ) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("UPDATE test_variants SET is_winner = false WHERE test_id = $1")
            .bind(test_id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("UPDATE test_variants SET is_winner = true WHERE variant_id = $1")
            .bind(variant_id)
            .execute(&mut *tx)
            .await?;
        sqlx::query(
            r#"
            UPDATE ab_tests
            SET winner_variant_id = $2,
                status = 'completed',
                completed_at = COALESCE(completed_at, $3),
                updated_at = now()
            WHERE test_id = $1
            "#,
        )
        .bind(test_id)
        .bind(variant_id)
        .bind(completed_at)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(())
    }

    pub async fn set_variant_applied(
        &self,
        variant_id: Uuid,
        applied_at: chrono::DateTime<chrono::Utc>,
    ) -> Result<()> {
        sqlx::query("UPDATE test_variants SET applied_at = $2 WHERE variant_id = $1")
            .bind(variant_id)
            .bind(applied_at)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    pub async fn update_variant_metrics(
        &self,
        variant_id: Uuid,
        impressions: i64,
        clicks: i64,
        views: i64,
        ctr: f64,
    ) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE test_variants
            SET impressions = $2, clicks = $3, views = $4, ctr = $5
            WHERE variant_id = $1
            "#,
        )
        .bind(variant_id)
        .bind(impressions)
        .bind(clicks)
        .bind(views)
        .bind(ctr)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn counts_by_status(&self, creator_id: Uuid) -> Result<Vec<(String, i64)>> {
        let rows = sqlx::query(
            "SELECT status, COUNT(*) AS n FROM ab_tests WHERE creator_id = $1 GROUP BY status",
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
