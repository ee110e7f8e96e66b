use crate::google::ApiError;
use axum::http::StatusCode;
use thiserror::Error;

/// Failures crossing the service boundary, mapped onto HTTP statuses by the
/// handlers.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    Unauthorized(String),
    #[error("{0}")]
    Forbidden(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    InvalidState(String),
    #[error(transparent)]
    Upstream(#[from] ApiError),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl ServiceError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::Validation(_) => StatusCode::BAD_REQUEST,
            ServiceError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ServiceError::Forbidden(_) => StatusCode::FORBIDDEN,
            ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
            ServiceError::InvalidState(_) => StatusCode::CONFLICT,
            ServiceError::Upstream(err) => StatusCode::from_u16(err.http_status())
                .unwrap_or(StatusCode::BAD_GATEWAY),
            ServiceError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl axum::response::IntoResponse for ServiceError {
    fn into_response(self) -> axum::response::Response {
        if matches!(self, ServiceError::Internal(_) | ServiceError::Upstream(_)) {
            tracing::error!("request failed: {}", self);
        }
        (
            self.status_code(),
            axum::Json(serde_json::json!({"error": self.to_string()})),
        )
            .into_response()
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;
