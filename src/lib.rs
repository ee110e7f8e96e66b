pub mod abtest;
pub mod analytics;
pub mod config;
pub mod crypto;
pub mod domain {
    pub mod abtest;
    pub mod approval;
    pub mod drive_file;
    pub mod integration;
    pub mod user;
}
pub mod export;
pub mod google;
pub mod http {
    pub mod handlers {
        pub mod abtests;
        pub mod analytics;
        pub mod approvals;
        pub mod auth;
        pub mod dashboard;
        pub mod exports;
        pub mod files;
        pub mod integrations;
        pub mod ops;
    }
    pub mod middleware {
        pub mod rate_limit;
        pub mod session_auth;
    }
}
pub mod repo {
    pub mod abtests_repo;
    pub mod analytics_repo;
    pub mod approvals_repo;
    pub mod drive_files_repo;
    pub mod integrations_repo;
    pub mod posting_recommendations_repo;
    pub mod seo_analyses_repo;
    pub mod sessions_repo;
    pub mod test_logs_repo;
    pub mod test_results_repo;
    pub mod users_repo;
}
pub mod service {
    pub mod analytics_service;
    pub mod approval_service;
    pub mod auth_service;
    pub mod drive_service;
    pub mod error;
    pub mod integration_service;
    pub mod metrics_collector;
    pub mod scheduler;
    pub mod test_engine;
    pub mod winner_selector;
}

#[derive(Clone)]
pub struct AppState {
    pub auth: service::auth_service::AuthService,
    pub integrations: service::integration_service::IntegrationService,
    pub drive: service::drive_service::DriveService,
    pub approvals: service::approval_service::ApprovalService,
    pub tests: service::test_engine::TestEngine,
    pub scheduler: service::scheduler::VariantScheduler,
    pub winner: service::winner_selector::WinnerSelector,
    pub analytics: service::analytics_service::AnalyticsService,
    pub drive_files_repo: repo::drive_files_repo::DriveFilesRepo,
    pub approvals_repo: repo::approvals_repo::ApprovalsRepo,
    pub abtests_repo: repo::abtests_repo::AbTestsRepo,
    pub seo_analyses_repo: repo::seo_analyses_repo::SeoAnalysesRepo,
    pub posting_recommendations_repo: repo::posting_recommendations_repo::PostingRecommendationsRepo,
    pub pool: sqlx::PgPool,
    pub redis_client: redis::Client,
}
