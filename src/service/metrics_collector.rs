use crate::abtest::attribution;
use crate::domain::abtest::AbTest;
use crate::domain::integration::ServiceKind;
use crate::google::{retry_api, AnalyticsApi};
use crate::repo::abtests_repo::AbTestsRepo;
use crate::repo::test_logs_repo::TestLogsRepo;
use crate::repo::test_results_repo::TestResultsRepo;
use crate::service::error::ServiceResult;
use crate::service::integration_service::IntegrationService;
use std::sync::Arc;

#[derive(Clone)]
pub struct MetricsCollector {
    pub abtests_repo: AbTestsRepo,
    pub test_logs_repo: TestLogsRepo,
    pub test_results_repo: TestResultsRepo,
    pub integrations: IntegrationService,
    pub analytics: Arc<dyn AnalyticsApi>,
}

impl MetricsCollector {
    /// Pulls daily video metrics for one test and attributes them to the
    /// variant that was live each day, reconstructed from the audit log.
    /// Cumulative variant stats are overwritten from the attributed totals and
    /// one time-series point per metric type is appended.
    pub async fn collect_for_test(&self, test: &AbTest) -> ServiceResult<i64> {
        let Some(start_date) = test.start_date else {
            // A test that never started has nothing to attribute.
            return Ok(0);
        };
        let until = test.completed_at.unwrap_or_else(chrono::Utc::now);

        let token = self
            .integrations
            .access_token(test.creator_id, ServiceKind::Youtube)
            .await?;
        let rows = retry_api(3, || {
            self.analytics.video_day_metrics(
                &token,
                &test.video_id,
                start_date.date_naive(),
                until.date_naive(),
            )
        })
        .await?;
        let daily_views: Vec<(chrono::NaiveDate, i64)> =
            rows.iter().map(|r| (r.day, r.views)).collect();

        let changes = self.test_logs_repo.variant_changes(test.test_id).await?;
        let periods = attribution::active_periods(&changes, until);

        let mut total_views = 0;
        for variant in self.abtests_repo.variants(test.test_id).await? {
            let views =
                attribution::views_for_variant(&periods, variant.variant_id, &daily_views);
            let est = attribution::estimate_metrics(views);
            total_views += views;

            self.abtests_repo
                .update_variant_metrics(
                    variant.variant_id,
                    est.impressions,
                    est.clicks,
                    est.views,
                    est.ctr,
                )
                .await?;
            self.test_results_repo
                .append_points(
                    test.test_id,
                    variant.variant_id,
                    &[
                        ("impressions", est.impressions as f64),
                        ("clicks", est.clicks as f64),
                        ("views", est.views as f64),
                        ("ctr", est.ctr),
                    ],
                )
                .await?;
        }

        self.test_logs_repo
            .append(
                test.test_id,
                "metrics_collected",
                None,
                serde_json::json!({
                    "days": daily_views.len(),
                    "total_views": total_views,
                }),
            )
            .await?;

        Ok(total_views)
    }

    /// Worker entry point. Per-test failures are logged and skipped.
    pub async fn collect_active(&self) -> ServiceResult<u32> {
        let mut collected = 0;
        for test in self.abtests_repo.active_tests().await? {
            match self.collect_for_test(&test).await {
                Ok(views) => {
                    collected += 1;
                    tracing::info!(
                        "collected metrics for test {} ({} attributed views)",
                        test.test_id,
                        views
                    );
                }
                Err(err) => {
                    tracing::error!(
                        "metrics collection failed for test {}: {}",
                        test.test_id,
                        err
                    );
                }
            }
        }
        Ok(collected)
    }
}
