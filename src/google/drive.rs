use crate::google::{ApiError, DriveApi, RemoteFile};

pub struct DriveClient {
    pub base_url: String,
    pub timeout_secs: u64,
    pub client: reqwest::Client,
}

impl DriveClient {
    pub fn new() -> Self {
        Self {
            base_url: "https://www.googleapis.com/drive/v3".to_string(),
            timeout_secs: 30,
            client: reqwest::Client::new(),
        }
    }
}

impl Default for DriveClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl DriveApi for DriveClient {
    async fn list_files(&self, token: &str) -> Result<Vec<RemoteFile>, ApiError> {
        let mut files = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut params = vec![
                (
                    "fields".to_string(),
                    "nextPageToken,files(id,name,mimeType,size,modifiedTime,webViewLink)".to_string(),
                ),
                ("pageSize".to_string(), "100".to_string()),
                ("q".to_string(), "trashed=false".to_string()),
                ("orderBy".to_string(), "modifiedTime desc".to_string()),
            ];
            if let Some(token) = &page_token {
                params.push(("pageToken".to_string(), token.clone()));
            }

            let resp = self
                .client
                .get(format!("{}/files", self.base_url))
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

            let body: serde_json::Value = resp.json().await.map_err(ApiError::from_reqwest)?;
            for item in body.get("files").and_then(|v| v.as_array()).into_iter().flatten() {
                let Some(file_id) = item.get("id").and_then(|v| v.as_str()) else {
                    continue;
                };
                files.push(RemoteFile {
                    file_id: file_id.to_string(),
                    name: item
                        .get("name")
                        .and_then(|v| v.as_str())
                        .unwrap_or_default()
                        .to_string(),
                    mime_type: item
                        .get("mimeType")
                        .and_then(|v| v.as_str())
                        .unwrap_or_default()
                        .to_string(),
                    size: item
                        .get("size")
                        .and_then(|v| v.as_str())
                        .and_then(|s| s.parse::<i64>().ok()),
                    modified_time: item
                        .get("modifiedTime")
                        .and_then(|v| v.as_str())
                        .and_then(|s| chrono::DateTime::parse_from_rfc3339(s).ok())
                        .map(|dt| dt.with_timezone(&chrono::Utc))
                        .unwrap_or_else(chrono::Utc::now),
                    web_view_link: item
                        .get("webViewLink")
                        .and_then(|v| v.as_str())
                        .map(ToString::to_string),
                });
            }

            page_token = body
                .get("nextPageToken")
                .and_then(|v| v.as_str())
                .map(ToString::to_string);
            if page_token.is_none() {
                break;
            }
        }

        Ok(files)
    }

    async fn download(&self, token: &str, file_id: &str) -> Result<Vec<u8>, ApiError> {
        let resp = self
            .client
            .get(format!("{}/files/{}", self.base_url, file_id))
            .query(&[("alt", "media")])
            .bearer_auth(token)
            .timeout(std::time::Duration::from_secs(600))
            .send()
            .await
            .map_err(ApiError::from_reqwest)?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ApiError::from_status(status.as_u16(), &body));
        }

        Ok(resp.bytes().await.map_err(ApiError::from_reqwest)?.to_vec())
    }
}
