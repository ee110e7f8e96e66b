use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestType {
    Thumbnail,
    Title,
    Description,
    Combined,
}

impl TestType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TestType::Thumbnail => "thumbnail",
            TestType::Title => "title",
            TestType::Description => "description",
            TestType::Combined => "combined",
        }
    }

    pub fn parse(value: &str) -> Option<TestType> {
        match value {
            "thumbnail" => Some(TestType::Thumbnail),
            "title" => Some(TestType::Title),
            "description" => Some(TestType::Description),
            "combined" => Some(TestType::Combined),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestStatus {
    Draft,
    Active,
    Paused,
    Completed,
}

impl TestStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TestStatus::Draft => "draft",
            TestStatus::Active => "active",
            TestStatus::Paused => "paused",
            TestStatus::Completed => "completed",
        }
    }

    pub fn parse(value: &str) -> Option<TestStatus> {
        match value {
            "draft" => Some(TestStatus::Draft),
            "active" => Some(TestStatus::Active),
            "paused" => Some(TestStatus::Paused),
            "completed" => Some(TestStatus::Completed),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AbTest {
    pub test_id: Uuid,
    pub creator_id: Uuid,
    pub video_id: String,
    pub video_title: String,
    pub test_type: TestType,
    pub status: TestStatus,
    pub start_date: Option<chrono::DateTime<chrono::Utc>>,
    pub end_date: Option<chrono::DateTime<chrono::Utc>>,
    pub duration_hours: i32,
    pub rotation_frequency_hours: i32,
    pub performance_threshold: f64,
    pub auto_select_winner: bool,
    pub winner_variant_id: Option<Uuid>,
    pub completed_at: Option<chrono::DateTime<chrono::Utc>>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TestVariant {
    pub variant_id: Uuid,
    pub test_id: Uuid,
    pub variant_name: String,
    pub thumbnail_url: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub impressions: i64,
    pub clicks: i64,
    pub views: i64,
    pub ctr: f64,
    pub is_winner: bool,
    pub applied_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// Append-only time-series point for one variant metric.
#[derive(Debug, Clone, Serialize)]
pub struct TestResultPoint {
    pub test_id: Uuid,
    pub variant_id: Uuid,
    pub metric_type: String,
    pub value: f64,
    pub recorded_at: chrono::DateTime<chrono::Utc>,
}

/// Append-only audit row for state-changing test actions.
#[derive(Debug, Clone, Serialize)]
pub struct TestLogEntry {
    pub test_id: Uuid,
    pub action: String,
    pub user_id: Option<Uuid>,
    pub details: serde_json::Value,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Full view of a test with its variants, used by the status endpoint and the
/// exporters. Everything in here comes from stored state so exports stay
/// reproducible.
#[derive(Debug, Clone, Serialize)]
pub struct TestSnapshot {
    pub test: AbTest,
    pub variants: Vec<TestVariant>,
    pub current_variant_id: Option<Uuid>,
    pub progress_percentage: f64,
    pub time_remaining_seconds: Option<i64>,
}
