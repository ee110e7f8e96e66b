use crate::analytics::{posting, seo};
use crate::domain::user::{Role, User};
use crate::http::middleware::session_auth::require_role;
use crate::service::error::ServiceError;
use crate::AppState;
use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::{Extension, Json};
use chrono::NaiveDate;

pub const DEFAULT_RANGE_DAYS: i64 = 30;

#[derive(Debug, serde::Deserialize)]
pub struct RangeQuery {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

pub fn resolve_range(query: &RangeQuery) -> Result<(NaiveDate, NaiveDate), ServiceError> {
    let end = query
        .end_date
        .unwrap_or_else(|| chrono::Utc::now().date_naive());
    let start = query
        .start_date
        .unwrap_or(end - chrono::Duration::days(DEFAULT_RANGE_DAYS - 1));

    if start > end {
        return Err(ServiceError::Validation(
            "start_date must not be after end_date".to_string(),
        ));
    }
    Ok((start, end))
}

pub async fn video_metrics(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(video_id): Path<String>,
    Query(query): Query<RangeQuery>,
) -> impl IntoResponse {
    if let Err(e) = require_role(&user, &[Role::Creator, Role::Manager]) {
        return e.into_response();
    }
    let (start, end) = match resolve_range(&query) {
        Ok(range) => range,
        Err(e) => return e.into_response(),
    };

    match state
        .analytics
        .video_metrics(user.creator_scope(), &video_id, start, end)
        .await
    {
        Ok(metrics) => Json(serde_json::json!({
            "video_id": video_id,
            "start_date": start,
            "end_date": end,
            "metrics": metrics,
        }))
        .into_response(),
        Err(e) => e.into_response(),
    }
}

pub async fn channel_overview(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Query(query): Query<RangeQuery>,
) -> impl IntoResponse {
    if let Err(e) = require_role(&user, &[Role::Creator, Role::Manager]) {
        return e.into_response();
    }
    let (start, end) = match resolve_range(&query) {
        Ok(range) => range,
        Err(e) => return e.into_response(),
    };

    match state
        .analytics
        .channel_overview(user.creator_scope(), start, end)
        .await
    {
        Ok(overview) => Json(overview).into_response(),
        Err(e) => e.into_response(),
    }
}

#[derive(Debug, serde::Deserialize)]
pub struct SeoAnalyzeRequest {
    pub video_id: String,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Scores submitted metadata and stores the analysis for the history view.
pub async fn seo_analyze(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Json(req): Json<SeoAnalyzeRequest>,
) -> impl IntoResponse {
    if let Err(e) = require_role(&user, &[Role::Creator, Role::Manager]) {
        return e.into_response();
    }
    if req.video_id.trim().is_empty() || req.title.trim().is_empty() || req.description.trim().is_empty()
    {
        return ServiceError::Validation(
            "video_id, title and description are required".to_string(),
        )
        .into_response();
    }

    let report = seo::analyze_video(&req.title, &req.description, &req.tags);
    let keyword_suggestions = seo::suggest_keywords(&req.title, &req.description);

    match state
        .seo_analyses_repo
        .insert(
            user.creator_scope(),
            &req.video_id,
            &req.title,
            &req.description,
            &req.tags,
            report.seo_score,
            &keyword_suggestions,
            &report.recommendations,
        )
        .await
    {
        Ok(analysis_id) => (
            axum::http::StatusCode::CREATED,
            Json(serde_json::json!({
                "analysis_id": analysis_id,
                "video_id": req.video_id,
                "seo_score": report.seo_score,
                "title_score": report.title_score,
                "description_score": report.description_score,
                "tags_score": report.tags_score,
                "keywords_score": report.keywords_score,
                "keyword_suggestions": keyword_suggestions,
                "recommendations": report.recommendations,
            })),
        )
            .into_response(),
        Err(e) => ServiceError::Internal(e).into_response(),
    }
}

pub async fn seo_insights(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
) -> impl IntoResponse {
    if let Err(e) = require_role(&user, &[Role::Creator, Role::Manager]) {
        return e.into_response();
    }
    match state.seo_analyses_repo.recent(user.creator_scope(), 10).await {
        Ok(analyses) => Json(analyses).into_response(),
        Err(e) => ServiceError::Internal(e).into_response(),
    }
}

#[derive(Debug, serde::Deserialize)]
pub struct PostingAnalyzeRequest {
    #[serde(default)]
    pub channel_id: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub videos: Vec<posting::VideoPerformance>,
}

#[derive(Debug, serde::Deserialize)]
pub struct PostingQuery {
    pub category: Option<String>,
}

fn formatted_recommendation(
    day_of_week: u32,
    hour: u32,
    expected_engagement: f64,
    confidence_score: f64,
    reason: &str,
) -> serde_json::Value {
    serde_json::json!({
        "day": posting::format_day_name(day_of_week),
        "time": posting::format_time(hour),
        "day_of_week": day_of_week,
        "hour": hour,
        "expected_engagement": expected_engagement,
        "confidence_score": confidence_score,
        "reason": reason,
    })
}

/// Recomputes posting-time recommendations from submitted history and stores
/// the new top 3.
pub async fn posting_analyze(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Json(req): Json<PostingAnalyzeRequest>,
) -> impl IntoResponse {
    if let Err(e) = require_role(&user, &[Role::Creator, Role::Manager]) {
        return e.into_response();
    }

    let category = req.category.as_deref().unwrap_or("default");
    let recommendations = posting::recommend_posting_times(&req.videos, category);

    match state
        .posting_recommendations_repo
        .replace(
            user.creator_scope(),
            req.channel_id.as_deref().unwrap_or(""),
            &recommendations,
        )
        .await
    {
        Ok(()) => {
            let body: Vec<serde_json::Value> = recommendations
                .iter()
                .map(|r| {
                    formatted_recommendation(
                        r.day_of_week,
                        r.hour,
                        r.expected_engagement,
                        r.confidence_score,
                        &r.reason,
                    )
                })
                .collect();
            Json(serde_json::json!({
                "sample_size": req.videos.len(),
                "recommendations": body,
            }))
            .into_response()
        }
        Err(e) => ServiceError::Internal(e).into_response(),
    }
}

/// Stored top 3, or the industry-standard slots when nothing has been
/// computed yet.
pub async fn posting_recommendations(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Query(query): Query<PostingQuery>,
) -> impl IntoResponse {
    if let Err(e) = require_role(&user, &[Role::Creator, Role::Manager]) {
        return e.into_response();
    }

    let stored = match state
        .posting_recommendations_repo
        .top_for_creator(user.creator_scope(), 3)
        .await
    {
        Ok(stored) => stored,
        Err(e) => return ServiceError::Internal(e).into_response(),
    };

    let recommendations: Vec<serde_json::Value> = if stored.is_empty() {
        let category = query.category.as_deref().unwrap_or("default");
        posting::recommend_posting_times(&[], category)
            .iter()
            .map(|r| {
                formatted_recommendation(
                    r.day_of_week,
                    r.hour,
                    r.expected_engagement,
                    r.confidence_score,
                    &r.reason,
                )
            })
            .collect()
    } else {
        stored
            .iter()
            .map(|r| {
                formatted_recommendation(
                    r.day_of_week.max(0) as u32,
                    r.hour.max(0) as u32,
                    r.expected_engagement,
                    r.confidence_score,
                    &r.reason,
                )
            })
            .collect()
    };

    Json(serde_json::json!({"recommendations": recommendations})).into_response()
}
