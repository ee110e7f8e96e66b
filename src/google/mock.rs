use crate::google::{
    AnalyticsApi, ApiError, ChannelDayRow, ChannelInfo, DriveApi, RemoteFile, UploadRequest,
    UploadedVideo, VideoDayRow, VideoHost, VideoSnippet,
};
use chrono::NaiveDate;
use std::collections::HashMap;
use std::sync::Mutex;

/// In-memory Google stand-in for tests and local development. Failure flags
/// script individual calls; the recorded video state makes half-applied
/// updates observable.
pub struct MockGoogle {
    pub fail_update_snippet: bool,
    pub fail_set_thumbnail: bool,
    pub fail_upload: bool,
    pub fail_analytics: bool,
    state: Mutex<MockState>,
}

#[derive(Debug, Clone)]
pub struct MockVideoState {
    pub title: String,
    pub description: String,
    pub thumbnail_url: Option<String>,
}

#[derive(Default)]
struct MockState {
    videos: HashMap<String, MockVideoState>,
    uploads: Vec<String>,
    video_days: HashMap<String, Vec<VideoDayRow>>,
    channel_days: Vec<ChannelDayRow>,
    files: Vec<RemoteFile>,
    file_bodies: HashMap<String, Vec<u8>>,
    upload_seq: u64,
}

impl MockGoogle {
    pub fn new() -> Self {
        Self {
            fail_update_snippet: false,
            fail_set_thumbnail: false,
            fail_upload: false,
            fail_analytics: false,
            state: Mutex::new(MockState::default()),
        }
    }

    pub fn with_video(self, video_id: &str, title: &str, description: &str) -> Self {
        self.state.lock().expect("mock state").videos.insert(
            video_id.to_string(),
            MockVideoState {
                title: title.to_string(),
                description: description.to_string(),
                thumbnail_url: None,
            },
        );
        self
    }

    pub fn with_video_days(self, video_id: &str, rows: Vec<VideoDayRow>) -> Self {
        self.state
            .lock()
            .expect("mock state")
            .video_days
            .insert(video_id.to_string(), rows);
        self
    }

    pub fn with_channel_days(self, rows: Vec<ChannelDayRow>) -> Self {
        self.state.lock().expect("mock state").channel_days = rows;
        self
    }

    pub fn with_file(self, file: RemoteFile, content: Vec<u8>) -> Self {
        {
            let mut state = self.state.lock().expect("mock state");
            state.file_bodies.insert(file.file_id.clone(), content);
            state.files.push(file);
        }
        self
    }

    pub fn video_state(&self, video_id: &str) -> Option<MockVideoState> {
        self.state
            .lock()
            .expect("mock state")
            .videos
            .get(video_id)
            .cloned()
    }

    pub fn uploaded_titles(&self) -> Vec<String> {
        self.state.lock().expect("mock state").uploads.clone()
    }
}

impl Default for MockGoogle {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl VideoHost for MockGoogle {
    async fn video_snippet(&self, _token: &str, video_id: &str) -> Result<VideoSnippet, ApiError> {
        let state = self.state.lock().expect("mock state");
        let video = state
            .videos
            .get(video_id)
            .ok_or_else(|| ApiError::NotFound(format!("video {video_id} not found")))?;
        Ok(VideoSnippet {
            video_id: video_id.to_string(),
            title: video.title.clone(),
            description: video.description.clone(),
            tags: Vec::new(),
            category_id: "22".to_string(),
        })
    }

    async fn update_snippet(&self, _token: &str, snippet: &VideoSnippet) -> Result<(), ApiError> {
        if self.fail_update_snippet {
            return Err(ApiError::Api {
                status: 500,
                message: "mock snippet update failure".to_string(),
            });
        }
        let mut state = self.state.lock().expect("mock state");
        let video = state
            .videos
            .get_mut(&snippet.video_id)
            .ok_or_else(|| ApiError::NotFound(format!("video {} not found", snippet.video_id)))?;
        video.title = snippet.title.clone();
        video.description = snippet.description.clone();
        Ok(())
    }

    async fn set_thumbnail(
        &self,
        _token: &str,
        video_id: &str,
        thumbnail_url: &str,
    ) -> Result<(), ApiError> {
        if self.fail_set_thumbnail {
            return Err(ApiError::Api {
                status: 500,
                message: "mock thumbnail failure".to_string(),
            });
        }
        let mut state = self.state.lock().expect("mock state");
        let video = state
            .videos
            .get_mut(video_id)
            .ok_or_else(|| ApiError::NotFound(format!("video {video_id} not found")))?;
        video.thumbnail_url = Some(thumbnail_url.to_string());
        Ok(())
    }

    async fn upload_video(
        &self,
        _token: &str,
        request: &UploadRequest,
    ) -> Result<UploadedVideo, ApiError> {
        if self.fail_upload {
            return Err(ApiError::Permission("mock upload quota exceeded".to_string()));
        }
        let mut state = self.state.lock().expect("mock state");
        state.upload_seq += 1;
        let video_id = format!("mock-video-{}", state.upload_seq);
        state.uploads.push(request.title.clone());
        state.videos.insert(
            video_id.clone(),
            MockVideoState {
                title: request.title.clone(),
                description: request.description.clone(),
                thumbnail_url: None,
            },
        );
        Ok(UploadedVideo {
            url: format!("https://www.youtube.com/watch?v={video_id}"),
            video_id,
        })
    }

    async fn channel_info(&self, _token: &str) -> Result<ChannelInfo, ApiError> {
        Ok(ChannelInfo {
            channel_id: "mock-channel".to_string(),
            title: "Mock Channel".to_string(),
            subscriber_count: 1000,
            video_count: 42,
            view_count: 123_456,
        })
    }
}

#[async_trait::async_trait]
impl AnalyticsApi for MockGoogle {
    async fn video_day_metrics(
        &self,
        _token: &str,
        video_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<VideoDayRow>, ApiError> {
        if self.fail_analytics {
            return Err(ApiError::RateLimited);
        }
        let state = self.state.lock().expect("mock state");
        Ok(state
            .video_days
            .get(video_id)
            .map(|rows| {
                rows.iter()
                    .filter(|r| start <= r.day && r.day <= end)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn channel_day_metrics(
        &self,
        _token: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<ChannelDayRow>, ApiError> {
        if self.fail_analytics {
            return Err(ApiError::RateLimited);
        }
        let state = self.state.lock().expect("mock state");
        Ok(state
            .channel_days
            .iter()
            .filter(|r| start <= r.day && r.day <= end)
            .cloned()
            .collect())
    }
}

#[async_trait::async_trait]
impl DriveApi for MockGoogle {
    async fn list_files(&self, _token: &str) -> Result<Vec<RemoteFile>, ApiError> {
        Ok(self.state.lock().expect("mock state").files.clone())
    }

    async fn download(&self, _token: &str, file_id: &str) -> Result<Vec<u8>, ApiError> {
        let state = self.state.lock().expect("mock state");
        state
            .file_bodies
            .get(file_id)
            .cloned()
            .ok_or_else(|| ApiError::NotFound(format!("file {file_id} not found")))
    }
}
