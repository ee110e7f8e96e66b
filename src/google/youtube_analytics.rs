use crate::google::{AnalyticsApi, ApiError, ChannelDayRow, VideoDayRow};
use chrono::NaiveDate;

pub struct AnalyticsClient {
    pub base_url: String,
    pub timeout_secs: u64,
    pub client: reqwest::Client,
}

impl AnalyticsClient {
    pub fn new() -> Self {
        Self {
            base_url: "https://youtubeanalytics.googleapis.com/v2".to_string(),
            timeout_secs: 30,
            client: reqwest::Client::new(),
        }
    }

    async fn query(
        &self,
        token: &str,
        metrics: &str,
        filters: Option<String>,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<serde_json::Value, ApiError> {
        let mut params = vec![
            ("ids".to_string(), "channel==MINE".to_string()),
            ("dimensions".to_string(), "day".to_string()),
            ("metrics".to_string(), metrics.to_string()),
            ("startDate".to_string(), start.format("%Y-%m-%d").to_string()),
            ("endDate".to_string(), end.format("%Y-%m-%d").to_string()),
            ("sort".to_string(), "day".to_string()),
        ];
        if let Some(filters) = filters {
            params.push(("filters".to_string(), filters));
        }

        let resp = self
            .client
            .get(format!("{}/reports", self.base_url))
            .query(&params)
            .bearer_auth(token)
            .timeout(std::time::Duration::from_secs(self.timeout_secs))
            .send()
            .await
            .map_err(ApiError::from_reqwest)?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ApiError::from_status(status.as_u16(), &body));
        }

        resp.json().await.map_err(ApiError::from_reqwest)
    }
}

impl Default for AnalyticsClient {
    fn default() -> Self {
        Self::new()
    }
}

/// Rows come back positionally: day first, then metrics in requested order.
fn cell_i64(row: &serde_json::Value, idx: usize) -> i64 {
    row.get(idx).and_then(|v| v.as_i64()).unwrap_or_else(|| {
        row.get(idx)
            .and_then(|v| v.as_f64())
            .map(|f| f as i64)
            .unwrap_or(0)
    })
}

fn cell_f64(row: &serde_json::Value, idx: usize) -> f64 {
    row.get(idx).and_then(|v| v.as_f64()).unwrap_or(0.0)
}

fn cell_day(row: &serde_json::Value) -> Option<NaiveDate> {
    row.get(0)
        .and_then(|v| v.as_str())
        .and_then(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok())
}

#[async_trait::async_trait]
impl AnalyticsApi for AnalyticsClient {
    async fn video_day_metrics(
        &self,
        token: &str,
        video_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<VideoDayRow>, ApiError> {
        let body = self
            .query(
                token,
                "views,estimatedMinutesWatched,likes,comments,shares",
                Some(format!("video=={video_id}")),
                start,
                end,
            )
            .await?;

        let rows = body.get("rows").and_then(|v| v.as_array()).cloned().unwrap_or_default();
        Ok(rows
            .iter()
            .filter_map(|row| {
                Some(VideoDayRow {
                    day: cell_day(row)?,
                    views: cell_i64(row, 1),
                    estimated_minutes_watched: cell_i64(row, 2),
                    likes: cell_i64(row, 3),
                    comments: cell_i64(row, 4),
                    shares: cell_i64(row, 5),
                })
            })
            .collect())
    }

    async fn channel_day_metrics(
        &self,
        token: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<ChannelDayRow>, ApiError> {
        let body = self
            .query(
                token,
                "views,estimatedMinutesWatched,subscribersGained,subscribersLost,averageViewDuration",
                None,
                start,
                end,
            )
            .await?;

        let rows = body.get("rows").and_then(|v| v.as_array()).cloned().unwrap_or_default();
        Ok(rows
            .iter()
            .filter_map(|row| {
                Some(ChannelDayRow {
                    day: cell_day(row)?,
                    views: cell_i64(row, 1),
                    estimated_minutes_watched: cell_i64(row, 2),
                    subscribers_gained: cell_i64(row, 3),
                    subscribers_lost: cell_i64(row, 4),
                    average_view_duration: cell_f64(row, 5),
                })
            })
            .collect())
    }
}
