use crate::domain::integration::ServiceKind;
use crate::domain::user::{Role, User};
use crate::http::middleware::session_auth::require_role;
use crate::service::error::ServiceError;
use crate::AppState;
use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::{Extension, Json};

#[derive(Debug, serde::Deserialize)]
pub struct CallbackRequest {
    pub code: String,
}

fn parse_service(value: &str) -> Result<ServiceKind, ServiceError> {
    ServiceKind::parse(value)
        .ok_or_else(|| ServiceError::Validation(format!("unknown service '{value}'")))
}

pub async fn statuses(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
) -> impl IntoResponse {
    match state.integrations.statuses(user.creator_scope()).await {
        Ok(statuses) => Json(statuses).into_response(),
        Err(e) => e.into_response(),
    }
}

pub async fn connect(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(service): Path<String>,
) -> impl IntoResponse {
    if let Err(e) = require_role(&user, &[Role::Creator, Role::Manager]) {
        return e.into_response();
    }
    match parse_service(&service) {
        Ok(service) => Json(serde_json::json!({
            "authorization_url": state.integrations.connect_url(service),
        }))
        .into_response(),
        Err(e) => e.into_response(),
    }
}

pub async fn callback(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(service): Path<String>,
    Json(req): Json<CallbackRequest>,
) -> impl IntoResponse {
    if let Err(e) = require_role(&user, &[Role::Creator, Role::Manager]) {
        return e.into_response();
    }
    let service = match parse_service(&service) {
        Ok(s) => s,
        Err(e) => return e.into_response(),
    };

    match state
        .integrations
        .handle_callback(user.creator_scope(), service, &req.code)
        .await
    {
        Ok(()) => Json(serde_json::json!({"connected": true})).into_response(),
        Err(e) => e.into_response(),
    }
}

pub async fn disconnect(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(service): Path<String>,
) -> impl IntoResponse {
    if let Err(e) = require_role(&user, &[Role::Creator, Role::Manager]) {
        return e.into_response();
    }
    let service = match parse_service(&service) {
        Ok(s) => s,
        Err(e) => return e.into_response(),
    };

    match state
        .integrations
        .disconnect(user.creator_scope(), service)
        .await
    {
        Ok(()) => Json(serde_json::json!({"disconnected": true})).into_response(),
        Err(e) => e.into_response(),
    }
}
