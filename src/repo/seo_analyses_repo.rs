use anyhow::Result;
use sqlx::{PgPool, Row};
use uuid::Uuid;

#[derive(Clone)]
pub struct SeoAnalysesRepo {
    pub pool: PgPool,
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct SeoAnalysisRow {
    pub analysis_id: Uuid,
    pub creator_id: Uuid,
    pub video_id: String,
    pub title: String,
    pub seo_score: i32,
    pub keyword_suggestions: serde_json::Value,
    pub recommendations: serde_json::Value,
    pub analyzed_at: chrono::DateTime<chrono::Utc>,
}

impl SeoAnalysesRepo {
    #[allow(clippy::too_many_arguments)]
    pub async fn insert(
        &self,
        creator_id: Uuid,
        video_id: &str,
        title: &str,
        description: &str,
        tags: &[String],
        seo_score: i32,
        keyword_suggestions: &[String],
        recommendations: &[String],
    ) -> Result<Uuid> {
        let analysis_id = Uuid::new_v4();
        sqlx::query(
            r#"
            INSERT INTO seo_analyses (
                analysis_id, creator_id, video_id, title, description, tags,
                seo_score, keyword_suggestions, recommendations
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(analysis_id)
        .bind(creator_id)
        .bind(video_id)
        .bind(title)
        .bind(description)
        .bind(serde_json::json!(tags))
        .bind(seo_score)
        .bind(serde_json::json!(keyword_suggestions))
        .bind(serde_json::json!(recommendations))
        .execute(&self.pool)
        .await?;
        Ok(analysis_id)
    }

    /// Most recent analyses first.
    pub async fn recent(&self, creator_id: Uuid, limit: i64) -> Result<Vec<SeoAnalysisRow>> {
        let rows = sqlx::query(
            r#"
            SELECT analysis_id, creator_id, video_id, title, seo_score,
                   keyword_suggestions, recommendations, analyzed_at
            FROM seo_analyses
            WHERE creator_id = $1
            ORDER BY analyzed_at DESC
            LIMIT $2
            "#,
        )
        .bind(creator_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|r| SeoAnalysisRow {
                analysis_id: r.get("analysis_id"),
                creator_id: r.get("creator_id"),
                video_id: r.get("video_id"),
                title: r.get("title"),
                seo_score: r.get("seo_score"),
                keyword_suggestions: r.get("keyword_suggestions"),
                recommendations: r.get("recommendations"),
                analyzed_at: r.get("analyzed_at"),
            })
            .collect())
    }
}
