use axum::middleware::from_fn_with_state;
use axum::routing::{delete, get, post};
use axum::Router;
use creator_backoffice::config::AppConfig;
use creator_backoffice::google::drive::DriveClient;
use creator_backoffice::google::oauth::GoogleOAuth;
use creator_backoffice::google::youtube::YouTubeClient;
use creator_backoffice::google::youtube_analytics::AnalyticsClient;
use creator_backoffice::repo::abtests_repo::AbTestsRepo;
use creator_backoffice::repo::analytics_repo::AnalyticsRepo;
use creator_backoffice::repo::approvals_repo::ApprovalsRepo;
use creator_backoffice::repo::drive_files_repo::DriveFilesRepo;
use creator_backoffice::repo::integrations_repo::IntegrationsRepo;
use creator_backoffice::repo::posting_recommendations_repo::PostingRecommendationsRepo;
use creator_backoffice::repo::seo_analyses_repo::SeoAnalysesRepo;
use creator_backoffice::repo::sessions_repo::SessionsRepo;
use creator_backoffice::repo::test_logs_repo::TestLogsRepo;
use creator_backoffice::repo::test_results_repo::TestResultsRepo;
use creator_backoffice::repo::users_repo::UsersRepo;
use creator_backoffice::service::analytics_service::AnalyticsService;
use creator_backoffice::service::approval_service::ApprovalService;
use creator_backoffice::service::auth_service::AuthService;
use creator_backoffice::service::drive_service::DriveService;
use creator_backoffice::service::integration_service::IntegrationService;
use creator_backoffice::service::scheduler::VariantScheduler;
use creator_backoffice::service::test_engine::TestEngine;
use creator_backoffice::service::winner_selector::WinnerSelector;
use creator_backoffice::AppState;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cfg = AppConfig::from_env();

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&cfg.database_url)
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;

    let redis_client = redis::Client::open(cfg.redis_url.clone())?;

    let users_repo = UsersRepo { pool: pool.clone() };
    let sessions_repo = SessionsRepo { pool: pool.clone() };
    let integrations_repo = IntegrationsRepo { pool: pool.clone() };
    let drive_files_repo = DriveFilesRepo { pool: pool.clone() };
    let approvals_repo = ApprovalsRepo { pool: pool.clone() };
    let abtests_repo = AbTestsRepo { pool: pool.clone() };
    let test_logs_repo = TestLogsRepo { pool: pool.clone() };
    let test_results_repo = TestResultsRepo { pool: pool.clone() };
    let analytics_repo = AnalyticsRepo { pool: pool.clone() };
    let seo_analyses_repo = SeoAnalysesRepo { pool: pool.clone() };
    let posting_recommendations_repo = PostingRecommendationsRepo { pool: pool.clone() };

    let youtube = Arc::new(YouTubeClient::new());
    let drive_api = Arc::new(DriveClient::new());
    let analytics_api = Arc::new(AnalyticsClient::new());
    let oauth = GoogleOAuth::new(
        cfg.google_client_id.clone(),
        cfg.google_client_secret.clone(),
        cfg.oauth_redirect_uri.clone(),
    );

    let auth = AuthService {
        users_repo,
        sessions_repo,
        session_ttl_hours: cfg.session_ttl_hours,
    };
    let integrations = IntegrationService {
        integrations_repo,
        oauth,
        secret_key: cfg.secret_key.clone(),
    };
    let drive = DriveService {
        drive_files_repo: drive_files_repo.clone(),
        integrations: integrations.clone(),
        drive: drive_api.clone(),
    };
    let approvals = ApprovalService {
        approvals_repo: approvals_repo.clone(),
        drive_files_repo: drive_files_repo.clone(),
        integrations: integrations.clone(),
        drive: drive_api,
        youtube: youtube.clone(),
    };
    let scheduler = VariantScheduler {
        abtests_repo: abtests_repo.clone(),
        test_logs_repo: test_logs_repo.clone(),
        integrations: integrations.clone(),
        youtube: youtube.clone(),
    };
    let tests = TestEngine {
        abtests_repo: abtests_repo.clone(),
        test_logs_repo: test_logs_repo.clone(),
        test_results_repo: test_results_repo.clone(),
        scheduler: scheduler.clone(),
    };
    let winner = WinnerSelector {
        abtests_repo: abtests_repo.clone(),
        test_logs_repo: test_logs_repo.clone(),
        scheduler: scheduler.clone(),
        min_impressions: cfg.min_winner_impressions,
    };
    let analytics = AnalyticsService {
        analytics_repo,
        integrations: integrations.clone(),
        analytics: analytics_api,
        youtube,
    };

    let state = AppState {
        auth: auth.clone(),
        integrations,
        drive,
        approvals,
        tests,
        scheduler,
        winner,
        analytics,
        drive_files_repo,
        approvals_repo,
        abtests_repo,
        seo_analyses_repo,
        posting_recommendations_repo,
        pool,
        redis_client: redis_client.clone(),
    };

    let api = Router::new()
        .route("/auth/logout", post(creator_backoffice::http::handlers::auth::logout))
        .route("/auth/me", get(creator_backoffice::http::handlers::auth::me))
        .route("/team/members", get(creator_backoffice::http::handlers::auth::team_members))
        .route("/team/invitations", post(creator_backoffice::http::handlers::auth::invite))
        .route(
            "/integrations",
            get(creator_backoffice::http::handlers::integrations::statuses),
        )
        .route(
            "/integrations/:service/connect",
            get(creator_backoffice::http::handlers::integrations::connect),
        )
        .route(
            "/integrations/:service/callback",
            post(creator_backoffice::http::handlers::integrations::callback),
        )
        .route(
            "/integrations/:service",
            delete(creator_backoffice::http::handlers::integrations::disconnect),
        )
        .route("/files", get(creator_backoffice::http::handlers::files::list))
        .route("/files/sync", post(creator_backoffice::http::handlers::files::sync))
        .route(
            "/approvals",
            post(creator_backoffice::http::handlers::approvals::submit)
                .get(creator_backoffice::http::handlers::approvals::list),
        )
        .route(
            "/approvals/:request_id/review",
            post(creator_backoffice::http::handlers::approvals::review),
        )
        .route(
            "/approvals/:request_id/upload",
            post(creator_backoffice::http::handlers::approvals::upload),
        )
        .route(
            "/tests",
            post(creator_backoffice::http::handlers::abtests::create)
                .get(creator_backoffice::http::handlers::abtests::list),
        )
        .route("/tests/:test_id", get(creator_backoffice::http::handlers::abtests::status))
        .route(
            "/tests/:test_id/start",
            post(creator_backoffice::http::handlers::abtests::start),
        )
        .route(
            "/tests/:test_id/pause",
            post(creator_backoffice::http::handlers::abtests::pause),
        )
        .route(
            "/tests/:test_id/resume",
            post(creator_backoffice::http::handlers::abtests::resume),
        )
        .route(
            "/tests/:test_id/stop",
            post(creator_backoffice::http::handlers::abtests::stop),
        )
        .route(
            "/tests/:test_id/rotate",
            post(creator_backoffice::http::handlers::abtests::rotate),
        )
        .route(
            "/tests/:test_id/logs",
            get(creator_backoffice::http::handlers::abtests::logs),
        )
        .route(
            "/tests/:test_id/results",
            get(creator_backoffice::http::handlers::abtests::results),
        )
        .route(
            "/tests/:test_id/winner",
            get(creator_backoffice::http::handlers::abtests::winner_check),
        )
        .route(
            "/tests/:test_id/winner/select",
            post(creator_backoffice::http::handlers::abtests::winner_select),
        )
        .route(
            "/tests/:test_id/winner/apply",
            post(creator_backoffice::http::handlers::abtests::winner_apply),
        )
        .route(
            "/analytics/videos/:video_id",
            get(creator_backoffice::http::handlers::analytics::video_metrics),
        )
        .route(
            "/analytics/channel",
            get(creator_backoffice::http::handlers::analytics::channel_overview),
        )
        .route(
            "/analytics/seo",
            get(creator_backoffice::http::handlers::analytics::seo_insights)
                .post(creator_backoffice::http::handlers::analytics::seo_analyze),
        )
        .route(
            "/analytics/posting",
            get(creator_backoffice::http::handlers::analytics::posting_recommendations)
                .post(creator_backoffice::http::handlers::analytics::posting_analyze),
        )
        .route(
            "/exports/tests/:test_id/csv",
            get(creator_backoffice::http::handlers::exports::test_results_csv),
        )
        .route(
            "/exports/tests/:test_id/pdf",
            get(creator_backoffice::http::handlers::exports::test_results_pdf),
        )
        .route(
            "/exports/videos/:video_id/csv",
            get(creator_backoffice::http::handlers::exports::video_metrics_csv),
        )
        .route(
            "/dashboard",
            get(creator_backoffice::http::handlers::dashboard::summary),
        )
        .layer(from_fn_with_state(
            auth,
            creator_backoffice::http::middleware::session_auth::require_session,
        ))
        .layer(from_fn_with_state(
            creator_backoffice::http::middleware::rate_limit::RateLimitState {
                redis_client,
                max_per_minute: 300,
            },
            creator_backoffice::http::middleware::rate_limit::enforce,
        ));

    let app = Router::new()
        .route("/health", get(creator_backoffice::http::handlers::ops::health))
        .route("/ops/liveness", get(creator_backoffice::http::handlers::ops::liveness))
        .route("/ops/readiness", get(creator_backoffice::http::handlers::ops::readiness))
        .route(
            "/auth/register",
            post(creator_backoffice::http::handlers::auth::register),
        )
        .route("/auth/login", post(creator_backoffice::http::handlers::auth::login))
        .route(
            "/auth/accept-invitation",
            post(creator_backoffice::http::handlers::auth::accept_invitation),
        )
        .nest("/api", api)
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(&cfg.bind_addr).await?;
    tracing::info!("listening on {}", cfg.bind_addr);
    axum::serve(listener, app).await?;
    Ok(())
}
