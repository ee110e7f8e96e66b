use chrono::NaiveDate;

pub mod drive;
pub mod error;
pub mod mock;
pub mod oauth;
pub mod youtube;
pub mod youtube_analytics;

pub use error::ApiError;

#[derive(Debug, Clone)]
pub struct VideoSnippet {
    pub video_id: String,
    pub title: String,
    pub description: String,
    pub tags: Vec<String>,
    pub category_id: String,
}

#[derive(Debug, Clone)]
pub struct UploadRequest {
    pub title: String,
    pub description: String,
    pub tags: Vec<String>,
    pub privacy_status: String,
    pub content: Vec<u8>,
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct UploadedVideo {
    pub video_id: String,
    pub url: String,
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct ChannelInfo {
    pub channel_id: String,
    pub title: String,
    pub subscriber_count: i64,
    pub video_count: i64,
    pub view_count: i64,
}

#[derive(Debug, Clone)]
pub struct VideoDayRow {
    pub day: NaiveDate,
    pub views: i64,
    pub estimated_minutes_watched: i64,
    pub likes: i64,
    pub comments: i64,
    pub shares: i64,
}

#[derive(Debug, Clone)]
pub struct ChannelDayRow {
    pub day: NaiveDate,
    pub views: i64,
    pub estimated_minutes_watched: i64,
    pub subscribers_gained: i64,
    pub subscribers_lost: i64,
    pub average_view_duration: f64,
}

#[derive(Debug, Clone)]
pub struct RemoteFile {
    pub file_id: String,
    pub name: String,
    pub mime_type: String,
    pub size: Option<i64>,
    pub modified_time: chrono::DateTime<chrono::Utc>,
    pub web_view_link: Option<String>,
}

/// YouTube Data API surface the backoffice needs.
#[async_trait::async_trait]
pub trait VideoHost: Send + Sync {
    async fn video_snippet(&self, token: &str, video_id: &str) -> Result<VideoSnippet, ApiError>;

    async fn update_snippet(&self, token: &str, snippet: &VideoSnippet) -> Result<(), ApiError>;

    /// Fetches the image at `thumbnail_url` and sets it as the video
    /// thumbnail.
    async fn set_thumbnail(
        &self,
        token: &str,
        video_id: &str,
        thumbnail_url: &str,
    ) -> Result<(), ApiError>;

    async fn upload_video(
        &self,
        token: &str,
        request: &UploadRequest,
    ) -> Result<UploadedVideo, ApiError>;

    async fn channel_info(&self, token: &str) -> Result<ChannelInfo, ApiError>;
}

/// YouTube Analytics API surface.
#[async_trait::async_trait]
pub trait AnalyticsApi: Send + Sync {
    async fn video_day_metrics(
        &self,
        token: &str,
        video_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<VideoDayRow>, ApiError>;

    async fn channel_day_metrics(
        &self,
        token: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<ChannelDayRow>, ApiError>;
}

/// Google Drive API surface.
#[async_trait::async_trait]
pub trait DriveApi: Send + Sync {
    async fn list_files(&self, token: &str) -> Result<Vec<RemoteFile>, ApiError>;

    async fn download(&self, token: &str, file_id: &str) -> Result<Vec<u8>, ApiError>;
}

/// Retries rate-limit, network and 5xx failures with capped exponential
/// backoff. Everything else fails immediately.
pub async fn retry_api<T, F, Fut>(max_attempts: u32, mut op: F) -> Result<T, ApiError>
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = Result<T, ApiError>>,
{
    let mut attempt = 0_u32;
    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(err) if err.is_retryable() && attempt + 1 < max_attempts => {
                let backoff = u64::min(30, 2_u64.pow(attempt));
                tracing::warn!("retryable api error (attempt {}): {}", attempt + 1, err);
                tokio::time::sleep(std::time::Duration::from_secs(backoff)).await;
                attempt += 1;
            }
            Err(err) => return Err(err),
        }
    }
}
