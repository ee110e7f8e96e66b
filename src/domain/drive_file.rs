use serde::Serialize;
use uuid::Uuid;

/// Cached Google Drive file metadata.
#[derive(Debug, Clone, Serialize)]
pub struct DriveFile {
    pub id: Uuid,
    pub file_id: String,
    pub name: String,
    pub mime_type: String,
    pub size: Option<i64>,
    pub modified_time: chrono::DateTime<chrono::Utc>,
    pub web_view_link: Option<String>,
    pub creator_id: Uuid,
    pub cached_at: chrono::DateTime<chrono::Utc>,
}

impl DriveFile {
    pub fn size_display(&self) -> String {
        let Some(size) = self.size else {
            return "Unknown".to_string();
        };

        let mut size = size as f64;
        for unit in ["B", "KB", "MB", "GB", "TB"] {
            if size < 1024.0 {
                return format!("{size:.1} {unit}");
            }
            size /= 1024.0;
        }
        format!("{size:.1} PB")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file_with_size(size: Option<i64>) -> DriveFile {
        DriveFile {
            id: Uuid::new_v4(),
            file_id: "f1".to_string(),
            name: "cut-final.mp4".to_string(),
            mime_type: "video/mp4".to_string(),
            size,
            modified_time: chrono::Utc::now(),
            web_view_link: None,
            creator_id: Uuid::new_v4(),
            cached_at: chrono::Utc::now(),
        }
    }

    #[test]
    fn size_display_scales_units() {
        assert_eq!(file_with_size(None).size_display(), "Unknown");
        assert_eq!(file_with_size(Some(512)).size_display(), "512.0 B");
        assert_eq!(file_with_size(Some(2048)).size_display(), "2.0 KB");
        assert_eq!(file_with_size(Some(5 * 1024 * 1024)).size_display(), "5.0 MB");
    }
}
