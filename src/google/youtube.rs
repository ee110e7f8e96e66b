use crate::google::{ApiError, ChannelInfo, UploadRequest, UploadedVideo, VideoHost, VideoSnippet};
use serde_json::json;

pub struct YouTubeClient {
    pub base_url: String,
    pub upload_url: String,
    pub timeout_secs: u64,
    pub client: reqwest::Client,
}

impl YouTubeClient {
    pub fn new() -> Self {
        Self {
            base_url: "https://www.googleapis.com/youtube/v3".to_string(),
            upload_url: "https://www.googleapis.com/upload/youtube/v3".to_string(),
            timeout_secs: 30,
            client: reqwest::Client::new(),
        }
    }

    fn timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.timeout_secs)
    }

    async fn check(resp: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        let body = resp.text().await.unwrap_or_default();
        Err(ApiError::from_status(status.as_u16(), &body))
    }
}

impl Default for YouTubeClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl VideoHost for YouTubeClient {
    async fn video_snippet(&self, token: &str, video_id: &str) -> Result<VideoSnippet, ApiError> {
        let resp = self
            .client
            .get(format!("{}/videos", self.base_url))
            .query(&[("part", "snippet"), ("id", video_id)])
            .bearer_auth(token)
            .timeout(self.timeout())
            .send()
            .await
            .map_err(ApiError::from_reqwest)?;

        let body: serde_json::Value = Self::check(resp)
            .await?
            .json()
            .await
            .map_err(ApiError::from_reqwest)?;

        let item = body
            .get("items")
            .and_then(|items| items.get(0))
            .ok_or_else(|| ApiError::NotFound(format!("video {video_id} not found")))?;
        let snippet = item
            .get("snippet")
            .ok_or_else(|| ApiError::NotFound(format!("video {video_id} has no snippet")))?;

        Ok(VideoSnippet {
            video_id: video_id.to_string(),
            title: snippet
                .get("title")
                .and_then(|v| v.as_str())
                .unwrap_or_default()
                .to_string(),
            description: snippet
                .get("description")
                .and_then(|v| v.as_str())
                .unwrap_or_default()
                .to_string(),
            tags: snippet
                .get("tags")
                .and_then(|v| v.as_array())
                .map(|tags| {
                    tags.iter()
                        .filter_map(|t| t.as_str().map(ToString::to_string))
                        .collect()
                })
                .unwrap_or_default(),
            category_id: snippet
                .get("categoryId")
                .and_then(|v| v.as_str())
                .unwrap_or("22")
                .to_string(),
        })
    }

    async fn update_snippet(&self, token: &str, snippet: &VideoSnippet) -> Result<(), ApiError> {
        let body = json!({
            "id": snippet.video_id,
            "snippet": {
                "title": snippet.title,
                "description": snippet.description,
                "tags": snippet.tags,
                "categoryId": snippet.category_id,
            }
        });

        let resp = self
            .client
            .put(format!("{}/videos", self.base_url))
            .query(&[("part", "snippet")])
            .bearer_auth(token)
            .json(&body)
            .timeout(self.timeout())
            .send()
            .await
            .map_err(ApiError::from_reqwest)?;

        Self::check(resp).await?;
        Ok(())
    }

    async fn set_thumbnail(
        &self,
        token: &str,
        video_id: &str,
        thumbnail_url: &str,
    ) -> Result<(), ApiError> {
        let image = self
            .client
            .get(thumbnail_url)
            .timeout(self.timeout())
            .send()
            .await
            .map_err(ApiError::from_reqwest)?;
        let image = Self::check(image).await?;
        let bytes = image.bytes().await.map_err(ApiError::from_reqwest)?;

        let resp = self
            .client
            .post(format!("{}/thumbnails/set", self.upload_url))
            .query(&[("videoId", video_id)])
            .bearer_auth(token)
            .header("Content-Type", "image/jpeg")
            .body(bytes.to_vec())
            .timeout(self.timeout())
            .send()
            .await
            .map_err(ApiError::from_reqwest)?;

        Self::check(resp).await?;
        Ok(())
    }

    async fn upload_video(
        &self,
        token: &str,
        request: &UploadRequest,
    ) -> Result<UploadedVideo, ApiError> {
        let metadata = json!({
            "snippet": {
                "title": request.title,
                "description": request.description,
                "tags": request.tags,
                "categoryId": "22",
            },
            "status": { "privacyStatus": request.privacy_status }
        });

        let form = reqwest::multipart::Form::new()
            .part(
                "metadata",
                reqwest::multipart::Part::text(metadata.to_string())
                    .mime_str("application/json")
                    .map_err(|e| ApiError::Network(e.to_string()))?,
            )
            .part(
                "media",
                reqwest::multipart::Part::bytes(request.content.clone())
                    .mime_str("video/*")
                    .map_err(|e| ApiError::Network(e.to_string()))?,
            );

        let resp = self
            .client
            .post(format!("{}/videos", self.upload_url))
            .query(&[("uploadType", "multipart"), ("part", "snippet,status")])
            .bearer_auth(token)
            .multipart(form)
            .timeout(std::time::Duration::from_secs(600))
            .send()
            .await
            .map_err(ApiError::from_reqwest)?;

        let body: serde_json::Value = Self::check(resp)
            .await?
            .json()
            .await
            .map_err(ApiError::from_reqwest)?;

        let video_id = body
            .get("id")
            .and_then(|v| v.as_str())
            .ok_or_else(|| ApiError::Api {
                status: 200,
                message: "upload response missing video id".to_string(),
            })?
            .to_string();

        Ok(UploadedVideo {
            url: format!("https://www.youtube.com/watch?v={video_id}"),
            video_id,
        })
    }

    async fn channel_info(&self, token: &str) -> Result<ChannelInfo, ApiError> {
        let resp = self
            .client
            .get(format!("{}/channels", self.base_url))
            .query(&[("part", "snippet,statistics"), ("mine", "true")])
            .bearer_auth(token)
            .timeout(self.timeout())
            .send()
            .await
            .map_err(ApiError::from_reqwest)?;

        let body: serde_json::Value = Self::check(resp)
            .await?
            .json()
            .await
            .map_err(ApiError::from_reqwest)?;

        let channel = body
            .get("items")
            .and_then(|items| items.get(0))
            .ok_or_else(|| ApiError::NotFound("no channel for this account".to_string()))?;

        let stat = |key: &str| -> i64 {
            channel
                .get("statistics")
                .and_then(|s| s.get(key))
                .and_then(|v| v.as_str())
                .and_then(|v| v.parse::<i64>().ok())
                .unwrap_or(0)
        };

        Ok(ChannelInfo {
            channel_id: channel
                .get("id")
                .and_then(|v| v.as_str())
                .unwrap_or_default()
                .to_string(),
            title: channel
                .get("snippet")
                .and_then(|s| s.get("title"))
                .and_then(|v| v.as_str())
                .unwrap_or_default()
                .to_string(),
            subscriber_count: stat("subscriberCount"),
            video_count: stat("videoCount"),
            view_count: stat("viewCount"),
        })
    }
}
