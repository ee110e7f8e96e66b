use crate::analytics::posting::Recommendation;
use anyhow::Result;
use sqlx::{PgPool, Row};
use uuid::Uuid;

#[derive(Clone)]
pub struct PostingRecommendationsRepo {
    pub pool: PgPool,
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct StoredRecommendation {
    pub creator_id: Uuid,
    pub channel_id: String,
    pub day_of_week: i32,
    pub hour: i32,
    pub expected_engagement: f64,
    pub confidence_score: f64,
    pub reason: String,
    pub generated_at: chrono::DateTime<chrono::Utc>,
}

impl PostingRecommendationsRepo {
    /// Recomputed recommendations supersede the stored set wholesale.
    pub async fn replace(
        &self,
        creator_id: Uuid,
        channel_id: &str,
        recommendations: &[Recommendation],
    ) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM posting_recommendations WHERE creator_id = $1")
            .bind(creator_id)
            .execute(&mut *tx)
            .await?;

        for rec in recommendations {
            sqlx::query(
                r#"
                INSERT INTO posting_recommendations (
                    recommendation_id, creator_id, channel_id, day_of_week, hour,
                    expected_engagement, confidence_score, reason
                ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
                "#,
            )
            .bind(Uuid::new_v4())
            .bind(creator_id)
            .bind(channel_id)
            .bind(rec.day_of_week as i32)
            .bind(rec.hour as i32)
            .bind(rec.expected_engagement)
            .bind(rec.confidence_score)
            .bind(&rec.reason)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    pub async fn top_for_creator(
        &self,
        creator_id: Uuid,
        limit: i64,
    ) -> Result<Vec<StoredRecommendation>> {
        let rows = sqlx::query(
            r#"
            SELECT creator_id, channel_id, day_of_week, hour,
                   expected_engagement, confidence_score, reason, generated_at
            FROM posting_recommendations
            WHERE creator_id = $1
            ORDER BY expected_engagement DESC
            LIMIT $2
            "#,
        )
        .bind(creator_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|r| StoredRecommendation {
                creator_id: r.get("creator_id"),
                channel_id: r.get("channel_id"),
                day_of_week: r.get("day_of_week"),
                hour: r.get("hour"),
                expected_engagement: r.get("expected_engagement"),
                confidence_score: r.get("confidence_score"),
                reason: r.get("reason"),
                generated_at: r.get("generated_at"),
            })
            .collect())
    }
}
