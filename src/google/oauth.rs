use crate::domain::integration::ServiceKind;
use crate::google::ApiError;
use serde::Deserialize;

pub const AUTH_URI: &str = "https://accounts.google.com/o/oauth2/auth";
pub const TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

pub const YOUTUBE_SCOPES: &[&str] = &[
    "https://www.googleapis.com/auth/youtube",
    "https://www.googleapis.com/auth/youtube.upload",
    "https://www.googleapis.com/auth/yt-analytics.readonly",
];

pub const DRIVE_SCOPES: &[&str] = &[
    "https://www.googleapis.com/auth/drive",
    "https://www.googleapis.com/auth/drive.file",
];

pub fn scopes_for(service: ServiceKind) -> &'static [&'static str] {
    match service {
        ServiceKind::Youtube => YOUTUBE_SCOPES,
        ServiceKind::GoogleDrive => DRIVE_SCOPES,
    }
}

/// Word the granted-scope list must contain for the grant to be usable by the
/// given service.
pub fn scope_family(service: ServiceKind) -> &'static str {
    match service {
        ServiceKind::Youtube => "youtube",
        ServiceKind::GoogleDrive => "drive",
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default = "default_expiry")]
    pub expires_in: i64,
    #[serde(default)]
    pub scope: String,
}

fn default_expiry() -> i64 {
    3600
}

#[derive(Debug, Deserialize)]
struct TokenErrorBody {
    #[serde(default)]
    error_description: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Clone)]
pub struct GoogleOAuth {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
    pub token_uri: String,
    pub client: reqwest::Client,
}

impl GoogleOAuth {
    pub fn new(client_id: String, client_secret: String, redirect_uri: String) -> Self {
        Self {
            client_id,
            client_secret,
            redirect_uri,
            token_uri: TOKEN_URI.to_string(),
            client: reqwest::Client::new(),
        }
    }

    /// Consent URL for the service scopes. `prompt=consent` forces Google to
    /// return a refresh token even on re-authorization.
    pub fn authorization_url(&self, service: ServiceKind) -> String {
        let scope = scopes_for(service).join(" ");
        format!(
            "{AUTH_URI}?response_type=code&client_id={}&redirect_uri={}&scope={}&access_type=offline&include_granted_scopes=true&prompt=consent&state={}",
            urlencode(&self.client_id),
            urlencode(&self.redirect_uri),
            urlencode(&scope),
            service.as_str(),
        )
    }

    pub async fn exchange_code(&self, code: &str) -> Result<TokenResponse, ApiError> {
        self.token_request(&[
            ("code", code),
            ("client_id", &self.client_id),
            ("client_secret", &self.client_secret),
            ("redirect_uri", &self.redirect_uri),
            ("grant_type", "authorization_code"),
        ])
        .await
    }

    pub async fn refresh(&self, refresh_token: &str) -> Result<TokenResponse, ApiError> {
        self.token_request(&[
            ("refresh_token", refresh_token),
            ("client_id", &self.client_id),
            ("client_secret", &self.client_secret),
            ("grant_type", "refresh_token"),
        ])
        .await
    }

    async fn token_request(&self, form: &[(&str, &str)]) -> Result<TokenResponse, ApiError> {
        let resp = self
            .client
            .post(&self.token_uri)
            .form(form)
            .timeout(std::time::Duration::from_secs(30))
            .send()
            .await
            .map_err(ApiError::from_reqwest)?;

        let status = resp.status();
        if status.is_success() {
            return resp.json::<TokenResponse>().await.map_err(ApiError::from_reqwest);
        }

        let body = resp.text().await.unwrap_or_default();
        let parsed: TokenErrorBody = serde_json::from_str(&body).unwrap_or(TokenErrorBody {
            error_description: None,
            error: None,
        });
        let message = parsed
            .error_description
            .or(parsed.error)
            .unwrap_or_else(|| "token exchange failed".to_string());

        // invalid_grant means the refresh token was revoked, treat as auth.
        if status.as_u16() == 400 && message.contains("invalid_grant") {
            return Err(ApiError::Auth);
        }
        Err(ApiError::from_status(status.as_u16(), &message))
    }
}

fn urlencode(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for byte in value.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(byte as char)
            }
            _ => out.push_str(&format!("%{byte:02X}")),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn authorization_url_carries_scopes() {
        let oauth = GoogleOAuth::new(
            "client-id".to_string(),
            "secret".to_string(),
            "http://localhost:3000/cb".to_string(),
        );
        let url = oauth.authorization_url(ServiceKind::Youtube);
        assert!(url.starts_with(AUTH_URI));
        assert!(url.contains("yt-analytics.readonly"));
        assert!(url.contains("prompt%3Dconsent") || url.contains("prompt=consent"));
        assert!(url.contains("state=youtube"));
    }

    #[test]
    fn urlencode_escapes_reserved() {
        assert_eq!(urlencode("a b/c"), "a%20b%2Fc");
        assert_eq!(urlencode("safe-._~"), "safe-._~");
    }
}
