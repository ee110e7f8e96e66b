use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceKind {
    GoogleDrive,
    Youtube,
}

impl ServiceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceKind::GoogleDrive => "google_drive",
            ServiceKind::Youtube => "youtube",
        }
    }

    pub fn parse(value: &str) -> Option<ServiceKind> {
        match value {
            "google_drive" => Some(ServiceKind::GoogleDrive),
            "youtube" => Some(ServiceKind::Youtube),
            _ => None,
        }
    }
}

/// Stored OAuth credential set for one (creator, service) pair. Token fields
/// hold ciphertext, never the raw tokens.
#[derive(Debug, Clone)]
pub struct Integration {
    pub integration_id: Uuid,
    pub creator_id: Uuid,
    pub service: ServiceKind,
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub expires_at: chrono::DateTime<chrono::Utc>,
    pub scopes: String,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl Integration {
    pub fn is_expired(&self, now: chrono::DateTime<chrono::Utc>) -> bool {
        now >= self.expires_at
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct IntegrationStatus {
    pub service: ServiceKind,
    pub connected: bool,
    pub expired: bool,
    pub scopes: String,
}
