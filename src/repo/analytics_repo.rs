use anyhow::Result;
use chrono::NaiveDate;
use sqlx::{PgPool, Row};
use uuid::Uuid;

#[derive(Clone)]
pub struct AnalyticsRepo {
    pub pool: PgPool,
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct CachedMetric {
    pub video_id: String,
    pub metric_type: String,
    pub date: NaiveDate,
    pub value: f64,
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct ChannelMetricsRow {
    pub channel_id: String,
    pub date: NaiveDate,
    pub views: i64,
    pub watch_minutes: i64,
    pub subscribers_gained: i64,
    pub subscribers_lost: i64,
    pub average_view_duration: f64,
}

impl AnalyticsRepo {
    pub async fn upsert_video_metric(
        &self,
        video_id: &str,
        metric_type: &str,
        date: NaiveDate,
        value: f64,
    ) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO analytics_cache (id, video_id, metric_type, date, value)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (video_id, metric_type, date) DO UPDATE SET
              value = EXCLUDED.value,
              cached_at = now()
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(video_id)
        .bind(metric_type)
        .bind(date)
        .bind(value)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn video_metrics(
        &self,
        video_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<CachedMetric>> {
        let rows = sqlx::query(
            r#"
            SELECT video_id, metric_type, date, value
            FROM analytics_cache
            WHERE video_id = $1 AND date BETWEEN $2 AND $3
            ORDER BY date ASC, metric_type ASC
            "#,
        )
        .bind(video_id)
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|r| CachedMetric {
                video_id: r.get("video_id"),
                metric_type: r.get("metric_type"),
                date: r.get("date"),
                value: r.get("value"),
            })
            .collect())
    }

    pub async fn latest_cached_day(&self, video_id: &str) -> Result<Option<NaiveDate>> {
        let row = sqlx::query("SELECT MAX(date) AS d FROM analytics_cache WHERE video_id = $1")
            .bind(video_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(row.get("d"))
    }

    pub async fn upsert_channel_day(
        &self,
        creator_id: Uuid,
        channel_id: &str,
        row: &ChannelMetricsRow,
    ) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO channel_metrics (
                id, creator_id, channel_id, date, views, watch_minutes,
                subscribers_gained, subscribers_lost, average_view_duration
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            ON CONFLICT (channel_id, date) DO UPDATE SET
              views = EXCLUDED.views,
              watch_minutes = EXCLUDED.watch_minutes,
              subscribers_gained = EXCLUDED.subscribers_gained,
              subscribers_lost = EXCLUDED.subscribers_lost,
              average_view_duration = EXCLUDED.average_view_duration,
              cached_at = now()
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(creator_id)
        .bind(channel_id)
        .bind(row.date)
        .bind(row.views)
        .bind(row.watch_minutes)
        .bind(row.subscribers_gained)
        .bind(row.subscribers_lost)
        .bind(row.average_view_duration)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn channel_metrics(
        &self,
        channel_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<ChannelMetricsRow>> {
        let rows = sqlx::query(
            r#"
            SELECT channel_id, date, views, watch_minutes,
                   subscribers_gained, subscribers_lost, average_view_duration
            FROM channel_metrics
            WHERE channel_id = $1 AND date BETWEEN $2 AND $3
            ORDER BY date ASC
            "#,
        )
        .bind(channel_id)
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|r| ChannelMetricsRow {
                channel_id: r.get("channel_id"),
                date: r.get("date"),
                views: r.get("views"),
                watch_minutes: r.get("watch_minutes"),
                subscribers_gained: r.get("subscribers_gained"),
                subscribers_lost: r.get("subscribers_lost"),
                average_view_duration: r.get("average_view_duration"),
            })
            .collect())
    }
}
