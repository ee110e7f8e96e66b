use chrono::NaiveDate;
use creator_backoffice::google::mock::MockGoogle;
use creator_backoffice::google::{
    retry_api, AnalyticsApi, ApiError, ChannelDayRow, DriveApi, RemoteFile, UploadRequest,
    VideoDayRow, VideoHost,
};
use std::sync::atomic::{AtomicU32, Ordering};

#[test]
fn status_codes_classify_into_error_categories() {
    assert!(matches!(ApiError::from_status(401, ""), ApiError::Auth));
    assert!(matches!(ApiError::from_status(403, "quota"), ApiError::Permission(_)));
    assert!(matches!(ApiError::from_status(404, "gone"), ApiError::NotFound(_)));
    assert!(matches!(ApiError::from_status(429, ""), ApiError::RateLimited));
    assert!(matches!(
        ApiError::from_status(500, "boom"),
        ApiError::Api { status: 500, .. }
    ));
}

#[test]
fn only_transient_failures_are_retryable() {
    assert!(ApiError::RateLimited.is_retryable());
    assert!(ApiError::Network("connection reset".to_string()).is_retryable());
    assert!(ApiError::Api {
        status: 503,
        message: String::new()
    }
    .is_retryable());

    assert!(!ApiError::Auth.is_retryable());
    assert!(!ApiError::Permission("denied".to_string()).is_retryable());
    assert!(!ApiError::NotFound("gone".to_string()).is_retryable());
    assert!(!ApiError::Api {
        status: 400,
        message: String::new()
    }
    .is_retryable());
}

#[test]
fn errors_map_to_response_statuses() {
    assert_eq!(ApiError::Auth.http_status(), 401);
    assert_eq!(ApiError::Permission(String::new()).http_status(), 403);
    assert_eq!(ApiError::NotFound(String::new()).http_status(), 404);
    assert_eq!(ApiError::RateLimited.http_status(), 429);
    assert_eq!(ApiError::Network(String::new()).http_status(), 502);
}

#[tokio::test(start_paused = true)]
async fn retry_recovers_from_transient_failures() {
    let attempts = AtomicU32::new(0);
    let result = retry_api(3, || {
        let n = attempts.fetch_add(1, Ordering::SeqCst);
        async move {
            if n < 2 {
                Err(ApiError::RateLimited)
            } else {
                Ok("done")
            }
        }
    })
    .await;

    assert_eq!(result.unwrap(), "done");
    assert_eq!(attempts.load(Ordering::SeqCst), 3);
}

#[tokio::test(start_paused = true)]
async fn retry_gives_up_after_max_attempts() {
    let attempts = AtomicU32::new(0);
    let result: Result<(), ApiError> = retry_api(3, || {
        attempts.fetch_add(1, Ordering::SeqCst);
        async { Err(ApiError::RateLimited) }
    })
    .await;

    assert!(matches!(result, Err(ApiError::RateLimited)));
    assert_eq!(attempts.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn non_retryable_errors_fail_immediately() {
    let attempts = AtomicU32::new(0);
    let result: Result<(), ApiError> = retry_api(3, || {
        attempts.fetch_add(1, Ordering::SeqCst);
        async { Err(ApiError::Auth) }
    })
    .await;

    assert!(matches!(result, Err(ApiError::Auth)));
    assert_eq!(attempts.load(Ordering::SeqCst), 1);
}

fn upload_request(title: &str) -> UploadRequest {
    UploadRequest {
        title: title.to_string(),
        description: "weekly upload".to_string(),
        tags: Vec::new(),
        privacy_status: "private".to_string(),
        content: vec![0u8; 16],
    }
}

#[tokio::test]
async fn mock_upload_records_titles_and_assigns_ids() {
    let mock = MockGoogle::new();

    let first = mock.upload_video("token", &upload_request("Launch cut")).await.unwrap();
    let second = mock.upload_video("token", &upload_request("Launch cut")).await.unwrap();
    assert_ne!(first.video_id, second.video_id);
    assert!(first.url.contains(&first.video_id));
    assert_eq!(mock.uploaded_titles(), vec!["Launch cut", "Launch cut"]);

    // The uploaded video is immediately addressable.
    let snippet = mock.video_snippet("token", &first.video_id).await.unwrap();
    assert_eq!(snippet.title, "Launch cut");
}

#[tokio::test]
async fn mock_upload_failure_is_scripted() {
    let mut mock = MockGoogle::new();
    mock.fail_upload = true;

    let err = mock
        .upload_video("token", &upload_request("Launch cut"))
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Permission(_)));
    assert!(mock.uploaded_titles().is_empty());
}

#[tokio::test]
async fn mock_drive_serves_seeded_files() {
    let file = RemoteFile {
        file_id: "f1".to_string(),
        name: "cut-final.mp4".to_string(),
        mime_type: "video/mp4".to_string(),
        size: Some(1024),
        modified_time: chrono::Utc::now(),
        web_view_link: None,
    };
    let mock = MockGoogle::new().with_file(file, b"file-bytes".to_vec());

    let files = mock.list_files("token").await.unwrap();
    assert_eq!(files.len(), 1);
    assert_eq!(files[0].name, "cut-final.mp4");

    assert_eq!(mock.download("token", "f1").await.unwrap(), b"file-bytes");
    assert!(matches!(
        mock.download("token", "missing").await,
        Err(ApiError::NotFound(_))
    ));
}

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn video_day(date: NaiveDate, views: i64) -> VideoDayRow {
    VideoDayRow {
        day: date,
        views,
        estimated_minutes_watched: views * 4,
        likes: views / 10,
        comments: views / 50,
        shares: views / 100,
    }
}

#[tokio::test]
async fn mock_analytics_filters_by_date_range() {
    let mock = MockGoogle::new()
        .with_video_days(
            "v1",
            vec![
                video_day(day(2024, 3, 1), 100),
                video_day(day(2024, 3, 2), 150),
                video_day(day(2024, 3, 5), 300),
            ],
        )
        .with_channel_days(vec![ChannelDayRow {
            day: day(2024, 3, 1),
            views: 500,
            estimated_minutes_watched: 2000,
            subscribers_gained: 12,
            subscribers_lost: 1,
            average_view_duration: 240.0,
        }]);

    let rows = mock
        .video_day_metrics("token", "v1", day(2024, 3, 1), day(2024, 3, 2))
        .await
        .unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].views, 100);

    let channel = mock
        .channel_day_metrics("token", day(2024, 3, 1), day(2024, 3, 31))
        .await
        .unwrap();
    assert_eq!(channel.len(), 1);
    assert_eq!(channel[0].subscribers_gained, 12);

    // Unknown videos report no data rather than an error.
    let empty = mock
        .video_day_metrics("token", "other", day(2024, 3, 1), day(2024, 3, 31))
        .await
        .unwrap();
    assert!(empty.is_empty());
}

#[tokio::test]
async fn mock_analytics_failure_is_scripted() {
    let mut mock = MockGoogle::new();
    mock.fail_analytics = true;

    let err = mock
        .video_day_metrics("token", "v1", day(2024, 3, 1), day(2024, 3, 2))
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::RateLimited));
}
