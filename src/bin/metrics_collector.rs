use anyhow::Result;
use creator_backoffice::config::AppConfig;
use creator_backoffice::google::oauth::GoogleOAuth;
use creator_backoffice::google::youtube::YouTubeClient;
use creator_backoffice::google::youtube_analytics::AnalyticsClient;
use creator_backoffice::repo::abtests_repo::AbTestsRepo;
use creator_backoffice::repo::integrations_repo::IntegrationsRepo;
use creator_backoffice::repo::test_logs_repo::TestLogsRepo;
use creator_backoffice::repo::test_results_repo::TestResultsRepo;
use creator_backoffice::service::integration_service::IntegrationService;
use creator_backoffice::service::metrics_collector::MetricsCollector;
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
    let interval_secs = std::env::var("METRICS_COLLECTOR_INTERVAL_SECS")
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(900);

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&cfg.database_url)
        .await?;

    let abtests_repo = AbTestsRepo { pool: pool.clone() };
    let test_logs_repo = TestLogsRepo { pool: pool.clone() };
    let test_results_repo = TestResultsRepo { pool: pool.clone() };
    let integrations = IntegrationService {
        integrations_repo: IntegrationsRepo { pool },
        oauth: GoogleOAuth::new(
            cfg.google_client_id.clone(),
            cfg.google_client_secret.clone(),
            cfg.oauth_redirect_uri.clone(),
        ),
        secret_key: cfg.secret_key.clone(),
    };
    let collector = MetricsCollector {
        abtests_repo: abtests_repo.clone(),
        test_logs_repo: test_logs_repo.clone(),
        test_results_repo,
        integrations: integrations.clone(),
        analytics: Arc::new(AnalyticsClient::new()),
    };
    let winner = WinnerSelector {
        abtests_repo: abtests_repo.clone(),
        test_logs_repo: test_logs_repo.clone(),
        scheduler: VariantScheduler {
            abtests_repo,
            test_logs_repo,
            integrations,
            youtube: Arc::new(YouTubeClient::new()),
        },
        min_impressions: cfg.min_winner_impressions,
    };

    loop {
        match collector.collect_active().await {
            Ok(collected) if collected > 0 => {
                tracing::info!("collected metrics for {} tests", collected)
            }
            Ok(_) => {}
            Err(err) => tracing::error!("collection pass failed: {}", err),
        }

        // Fresh metrics may push a leader over the threshold.
        match winner.check_early_winners().await {
            Ok(selected) if selected > 0 => {
                tracing::info!("auto-selected {} early winners", selected)
            }
            Ok(_) => {}
            Err(err) => tracing::error!("early-winner pass failed: {}", err),
        }

        tokio::time::sleep(std::time::Duration::from_secs(interval_secs)).await;
    }
}
