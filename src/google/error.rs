use thiserror::Error;

/// Upstream Google API failures, classified for retry and response-mapping
/// decisions.
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    #[error("authentication expired, reconnect the Google account")]
    Auth,
    #[error("insufficient permissions or quota exhausted: {0}")]
    Permission(String),
    #[error("rate limited by the API")]
    RateLimited,
    #[error("not found: {0}")]
    NotFound(String),
    #[error("network error: {0}")]
    Network(String),
    #[error("api error (status {status}): {message}")]
    Api { status: u16, message: String },
}

impl ApiError {
    pub fn from_status(status: u16, body: &str) -> ApiError {
        let message: String = body.chars().take(200).collect();
        match status {
            401 => ApiError::Auth,
            403 => ApiError::Permission(message),
            404 => ApiError::NotFound(message),
            429 => ApiError::RateLimited,
            _ => ApiError::Api { status, message },
        }
    }

    pub fn from_reqwest(err: reqwest::Error) -> ApiError {
        ApiError::Network(err.to_string())
    }

    pub fn is_retryable(&self) -> bool {
        match self {
            ApiError::RateLimited | ApiError::Network(_) => true,
            ApiError::Api { status, .. } => *status >= 500,
            _ => false,
        }
    }

    /// HTTP status the API surface should answer with when this error reaches
    /// a handler.
    pub fn http_status(&self) -> u16 {
        match self {
            ApiError::Auth => 401,
            ApiError::Permission(_) => 403,
            ApiError::NotFound(_) => 404,
            ApiError::RateLimited => 429,
            ApiError::Network(_) | ApiError::Api { .. } => 502,
        }
    }
}
