use anyhow::Result;
use creator_backoffice::config::AppConfig;
use creator_backoffice::google::oauth::GoogleOAuth;
use creator_backoffice::google::youtube::YouTubeClient;
use creator_backoffice::repo::abtests_repo::AbTestsRepo;
use creator_backoffice::repo::integrations_repo::IntegrationsRepo;
use creator_backoffice::repo::sessions_repo::SessionsRepo;
use creator_backoffice::repo::test_logs_repo::TestLogsRepo;
use creator_backoffice::service::integration_service::IntegrationService;
use creator_backoffice::service::scheduler::VariantScheduler;
use creator_backoffice::service::winner_selector::WinnerSelector;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cfg = AppConfig::from_env();
    let interval_secs = std::env::var("ROTATION_WORKER_INTERVAL_SECS")
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(300);

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&cfg.database_url)
        .await?;

    let abtests_repo = AbTestsRepo { pool: pool.clone() };
    let test_logs_repo = TestLogsRepo { pool: pool.clone() };
    let sessions_repo = SessionsRepo { pool: pool.clone() };
    let integrations = IntegrationService {
        integrations_repo: IntegrationsRepo { pool },
        oauth: GoogleOAuth::new(
            cfg.google_client_id.clone(),
            cfg.google_client_secret.clone(),
            cfg.oauth_redirect_uri.clone(),
        ),
        secret_key: cfg.secret_key.clone(),
    };
    let scheduler = VariantScheduler {
        abtests_repo: abtests_repo.clone(),
        test_logs_repo: test_logs_repo.clone(),
        integrations,
        youtube: Arc::new(YouTubeClient::new()),
    };
    let winner = WinnerSelector {
        abtests_repo,
        test_logs_repo,
        scheduler: scheduler.clone(),
        min_impressions: cfg.min_winner_impressions,
    };

    loop {
        let now = chrono::Utc::now();

        match scheduler.rotate_due(now).await {
            Ok(rotated) if rotated > 0 => tracing::info!("rotated {} tests", rotated),
            Ok(_) => {}
            Err(err) => tracing::error!("rotation pass failed: {}", err),
        }

        match winner.complete_expired(now).await {
            Ok(completed) if completed > 0 => {
                tracing::info!("completed {} expired tests", completed)
            }
            Ok(_) => {}
            Err(err) => tracing::error!("expiry pass failed: {}", err),
        }

        // Session housekeeping rides on the same cadence.
        match sessions_repo.purge_expired().await {
            Ok(purged) if purged > 0 => tracing::info!("purged {} expired sessions", purged),
            Ok(_) => {}
            Err(err) => tracing::error!("session purge failed: {}", err),
        }

        tokio::time::sleep(std::time::Duration::from_secs(interval_secs)).await;
    }
}
