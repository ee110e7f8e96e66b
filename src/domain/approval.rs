use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApprovalStatus {
    Pending,
    Approved,
    Rejected,
    Uploaded,
}

impl ApprovalStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApprovalStatus::Pending => "pending",
            ApprovalStatus::Approved => "approved",
            ApprovalStatus::Rejected => "rejected",
            ApprovalStatus::Uploaded => "uploaded",
        }
    }

    pub fn parse(value: &str) -> Option<ApprovalStatus> {
        match value {
            "pending" => Some(ApprovalStatus::Pending),
            "approved" => Some(ApprovalStatus::Approved),
            "rejected" => Some(ApprovalStatus::Rejected),
            "uploaded" => Some(ApprovalStatus::Uploaded),
            _ => None,
        }
    }

    /// Only pending requests accept a review decision.
    pub fn can_be_reviewed(&self) -> bool {
        matches!(self, ApprovalStatus::Pending)
    }

    /// Only approved requests may be pushed to YouTube.
    pub fn can_be_uploaded(&self) -> bool {
        matches!(self, ApprovalStatus::Approved)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ApprovalRequest {
    pub request_id: Uuid,
    pub editor_id: Uuid,
    pub creator_id: Uuid,
    pub file_id: Uuid,
    pub description: String,
    pub status: ApprovalStatus,
    pub reviewed_by: Option<Uuid>,
    pub reviewed_at: Option<chrono::DateTime<chrono::Utc>>,
    pub rejection_reason: Option<String>,
    pub youtube_video_id: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}
