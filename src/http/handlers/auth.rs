use crate::domain::user::{Role, User};
use crate::http::middleware::session_auth::{self, require_role};
use crate::AppState;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::response::IntoResponse;
use axum::{Extension, Json};

#[derive(Debug, serde::Deserialize)]
pub struct CredentialsRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, serde::Deserialize)]
pub struct AcceptInvitationRequest {
    pub invitation_token: String,
    pub password: String,
}

#[derive(Debug, serde::Deserialize)]
pub struct InviteRequest {
    pub username: String,
    pub role: String,
}

pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<CredentialsRequest>,
) -> impl IntoResponse {
    match state.auth.register(&req.username, &req.password).await {
        Ok((token, user)) => (
            axum::http::StatusCode::CREATED,
            Json(serde_json::json!({"token": token, "user": user})),
        )
            .into_response(),
        Err(e) => e.into_response(),
    }
}

pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<CredentialsRequest>,
) -> impl IntoResponse {
    match state.auth.login(&req.username, &req.password).await {
        Ok((token, user)) => {
            Json(serde_json::json!({"token": token, "user": user})).into_response()
        }
        Err(e) => e.into_response(),
    }
}

pub async fn accept_invitation(
    State(state): State<AppState>,
    Json(req): Json<AcceptInvitationRequest>,
) -> impl IntoResponse {
    match state
        .auth
        .accept_invitation(&req.invitation_token, &req.password)
        .await
    {
        Ok((token, user)) => {
            Json(serde_json::json!({"token": token, "user": user})).into_response()
        }
        Err(e) => e.into_response(),
    }
}

pub async fn logout(State(state): State<AppState>, headers: HeaderMap) -> impl IntoResponse {
    let Some(token) = session_auth::session_token(&headers) else {
        return Json(serde_json::json!({"logged_out": true})).into_response();
    };
    match state.auth.logout(&token).await {
        Ok(()) => Json(serde_json::json!({"logged_out": true})).into_response(),
        Err(e) => e.into_response(),
    }
}

pub async fn me(Extension(user): Extension<User>) -> impl IntoResponse {
    Json(user)
}

pub async fn invite(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Json(req): Json<InviteRequest>,
) -> impl IntoResponse {
    let Some(role) = Role::parse(&req.role) else {
        return crate::service::error::ServiceError::Validation(format!(
            "unknown role '{}'",
            req.role
        ))
        .into_response();
    };

    match state.auth.invite(&user, &req.username, role).await {
        Ok((invited, invitation_token)) => (
            axum::http::StatusCode::CREATED,
            Json(serde_json::json!({
                "user": invited,
                "invitation_token": invitation_token,
            })),
        )
            .into_response(),
        Err(e) => e.into_response(),
    }
}

pub async fn team_members(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
) -> impl IntoResponse {
    if let Err(e) = require_role(&user, &[Role::Creator, Role::Manager]) {
        return e.into_response();
    }
    match state.auth.team_members(&user).await {
        Ok(members) => Json(members).into_response(),
        Err(e) => e.into_response(),
    }
}
