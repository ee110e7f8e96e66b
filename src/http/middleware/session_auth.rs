use crate::domain::user::{Role, User};
use crate::service::auth_service::AuthService;
use crate::service::error::{ServiceError, ServiceResult};
use axum::body::Body;
use axum::extract::State;
use axum::http::{HeaderMap, Request, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;

/// Session token from `Authorization: Bearer <token>`, with
/// `X-Session-Token` as a fallback for download links.
pub fn session_token(headers: &HeaderMap) -> Option<String> {
    if let Some(value) = headers.get("authorization").and_then(|h| h.to_str().ok()) {
        if let Some(token) = value.strip_prefix("Bearer ") {
            return Some(token.trim().to_string());
        }
    }
    headers
        .get("x-session-token")
        .and_then(|h| h.to_str().ok())
        .map(|t| t.trim().to_string())
}

/// Resolves the session to a user and stashes it in request extensions for
/// the handlers.
pub async fn require_session(
    State(auth): State<AuthService>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let Some(token) = session_token(request.headers()) else {
        return unauthorized("missing session token");
    };

    match auth.current_user(&token).await {
        Ok(Some(user)) => {
            request.extensions_mut().insert(user);
            next.run(request).await
        }
        Ok(None) => unauthorized("session expired or invalid"),
        Err(err) => err.into_response(),
    }
}

pub fn require_role(user: &User, roles: &[Role]) -> ServiceResult<()> {
    if user.has_role(roles) {
        Ok(())
    } else {
        Err(ServiceError::Forbidden(
            "your role does not permit this action".to_string(),
        ))
    }
}

fn unauthorized(message: &str) -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(serde_json::json!({"error": message})),
    )
        .into_response()
}
