use crate::abtest::winner::ctr_percent;
use crate::analytics::calculators;
use crate::domain::integration::ServiceKind;
use crate::export::csv::MetricsExportRow;
use crate::google::{retry_api, AnalyticsApi, ChannelInfo, VideoHost};
use crate::repo::analytics_repo::{AnalyticsRepo, CachedMetric, ChannelMetricsRow};
use crate::service::error::ServiceResult;
use crate::service::integration_service::IntegrationService;
use chrono::NaiveDate;
use std::collections::BTreeMap;
use std::sync::Arc;
use uuid::Uuid;

#[derive(Debug, serde::Serialize)]
pub struct ChannelOverview {
    pub channel: ChannelInfo,
    pub days: Vec<ChannelMetricsRow>,
}

#[derive(Clone)]
pub struct AnalyticsService {
    pub analytics_repo: AnalyticsRepo,
    pub integrations: IntegrationService,
    pub analytics: Arc<dyn AnalyticsApi>,
    pub youtube: Arc<dyn VideoHost>,
}

impl AnalyticsService {
    /// Daily metrics for one video, served from the cache. Days past the
    /// newest cached entry are fetched from the Analytics API and upserted
    /// first.
    pub async fn video_metrics(
        &self,
        creator_id: Uuid,
        video_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> ServiceResult<Vec<CachedMetric>> {
        let cached_through = self.analytics_repo.latest_cached_day(video_id).await?;
        if cached_through.map(|d| d < end).unwrap_or(true) {
            self.refresh_video_cache(creator_id, video_id, start, end)
                .await?;
        }

        Ok(self.analytics_repo.video_metrics(video_id, start, end).await?)
    }

    async fn refresh_video_cache(
        &self,
        creator_id: Uuid,
        video_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> ServiceResult<()> {
        let token = self
            .integrations
            .access_token(creator_id, ServiceKind::Youtube)
            .await?;
        let rows = retry_api(3, || {
            self.analytics.video_day_metrics(&token, video_id, start, end)
        })
        .await?;

        for row in &rows {
            let values = [
                ("views", row.views as f64),
                ("watch_minutes", row.estimated_minutes_watched as f64),
                ("likes", row.likes as f64),
                ("comments", row.comments as f64),
                ("shares", row.shares as f64),
            ];
            for (metric_type, value) in values {
                self.analytics_repo
                    .upsert_video_metric(video_id, metric_type, row.day, value)
                    .await?;
            }
        }

        tracing::info!("cached {} analytics days for video {}", rows.len(), video_id);
        Ok(())
    }

    /// Flattens cached per-metric rows into one export row per day. Derived
    /// columns use the same estimates as the test engine, so exports agree
    /// with the dashboards.
    pub async fn export_rows(
        &self,
        creator_id: Uuid,
        video_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> ServiceResult<Vec<MetricsExportRow>> {
        let cached = self
            .video_metrics(creator_id, video_id, start, end)
            .await?;

        let mut by_day: BTreeMap<NaiveDate, BTreeMap<String, f64>> = BTreeMap::new();
        for metric in cached {
            by_day
                .entry(metric.date)
                .or_default()
                .insert(metric.metric_type, metric.value);
        }

        Ok(by_day
            .into_iter()
            .map(|(date, metrics)| {
                let get = |key: &str| metrics.get(key).copied().unwrap_or(0.0) as i64;
                let views = get("views");
                let likes = get("likes");
                let comments = get("comments");
                let shares = get("shares");
                MetricsExportRow {
                    date,
                    views,
                    watch_minutes: get("watch_minutes"),
                    likes,
                    comments,
                    shares,
                    ctr: ctr_percent(views, views * 10),
                    engagement_rate: calculators::engagement_rate(
                        likes, comments, shares, views,
                    )
                    .unwrap_or(0.0),
                }
            })
            .collect())
    }

    pub async fn channel_overview(
        &self,
        creator_id: Uuid,
        start: NaiveDate,
        end: NaiveDate,
    ) -> ServiceResult<ChannelOverview> {
        let token = self
            .integrations
            .access_token(creator_id, ServiceKind::Youtube)
            .await?;

        let channel = retry_api(3, || self.youtube.channel_info(&token)).await?;
        let rows = retry_api(3, || self.analytics.channel_day_metrics(&token, start, end)).await?;

        for row in &rows {
            self.analytics_repo
                .upsert_channel_day(
                    creator_id,
                    &channel.channel_id,
                    &ChannelMetricsRow {
                        channel_id: channel.channel_id.clone(),
                        date: row.day,
                        views: row.views,
                        watch_minutes: row.estimated_minutes_watched,
                        subscribers_gained: row.subscribers_gained,
                        subscribers_lost: row.subscribers_lost,
                        average_view_duration: row.average_view_duration,
                    },
                )
                .await?;
        }

        let days = self
            .analytics_repo
            .channel_metrics(&channel.channel_id, start, end)
            .await?;
        Ok(ChannelOverview { channel, days })
    }
}
