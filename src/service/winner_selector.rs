use crate::abtest::winner::{self, WinnerCheck};
use crate::domain::abtest::{AbTest, TestStatus, TestVariant};
use crate::repo::abtests_repo::AbTestsRepo;
use crate::repo::test_logs_repo::TestLogsRepo;
use crate::service::error::{ServiceError, ServiceResult};
use crate::service::scheduler::VariantScheduler;
use uuid::Uuid;

#[derive(Clone)]
pub struct WinnerSelector {
    pub abtests_repo: AbTestsRepo,
    pub test_logs_repo: TestLogsRepo,
    pub scheduler: VariantScheduler,
    /// Every variant must carry at least this many impressions before the
    /// flat-threshold policy is allowed to crown an early winner.
    pub min_impressions: i64,
}

impl WinnerSelector {
    /// Evaluates the flat-gap early-winner policy against current standings.
    pub async fn check(&self, test: &AbTest) -> ServiceResult<WinnerCheck> {
        let variants = self.abtests_repo.variants(test.test_id).await?;
        Ok(winner::evaluate(
            &winner::standings(&variants),
            test.performance_threshold,
            self.min_impressions,
        ))
    }

    /// Manual winner choice. Completes an active or paused test; on an
    /// already-completed test it re-points the winner.
    pub async fn select(
        &self,
        actor: Option<Uuid>,
        test: &AbTest,
        variant_id: Uuid,
    ) -> ServiceResult<()> {
        if test.status == TestStatus::Draft {
            return Err(ServiceError::InvalidState(
                "cannot select a winner for a draft test".to_string(),
            ));
        }

        let variants = self.abtests_repo.variants(test.test_id).await?;
        let variant = variant_of(&variants, variant_id)?;

        self.complete_with_winner(actor, test, variant, "manual").await
    }

    /// Pushes the stored winner's content to the video permanently. Failures
    /// propagate so the caller can surface them for manual retry; the test's
    /// status is not touched.
    pub async fn apply(&self, actor: Option<Uuid>, test: &AbTest) -> ServiceResult<TestVariant> {
        let winner_id = test.winner_variant_id.ok_or_else(|| {
            ServiceError::InvalidState("test has no selected winner".to_string())
        })?;

        let variants = self.abtests_repo.variants(test.test_id).await?;
        let variant = variant_of(&variants, winner_id)?.clone();

        self.scheduler
            .push_and_record(actor, test, &variant, "winner_applied")
            .await?;
        Ok(variant)
    }

    /// Wall-clock completion trigger: every active test past its end date is
    /// completed with the CTR leader as winner, then the winning content is
    /// pushed. A failed push leaves the test completed with the error logged
    /// for manual retry.
    pub async fn complete_expired(
        &self,
        now: chrono::DateTime<chrono::Utc>,
    ) -> ServiceResult<u32> {
        let mut completed = 0;
        for test in self.abtests_repo.active_tests().await? {
            let Some(end_date) = test.end_date else {
                continue;
            };
            if now < end_date {
                continue;
            }

            let variants = self.abtests_repo.variants(test.test_id).await?;
            let standings = winner::standings(&variants);
            let Some(best) = winner::best_by_ctr(&standings) else {
                tracing::error!("expired test {} has no variants", test.test_id);
                continue;
            };
            let variant = match variant_of(&variants, best.variant_id) {
                Ok(v) => v,
                Err(err) => {
                    tracing::error!("expired test {}: {}", test.test_id, err);
                    continue;
                }
            };

            if let Err(err) = self
                .complete_with_winner(None, &test, variant, "duration_elapsed")
                .await
            {
                tracing::error!("completing expired test {} failed: {}", test.test_id, err);
                continue;
            }
            completed += 1;

            let test = match self.abtests_repo.get(test.test_id).await? {
                Some(t) => t,
                None => continue,
            };
            if let Err(err) = self.apply(None, &test).await {
                tracing::error!(
                    "winner application failed for test {} (retry manually): {}",
                    test.test_id,
                    err
                );
            }
        }
        Ok(completed)
    }

    /// Early-completion trigger: for auto-select tests whose CTR leader clears
    /// the flat threshold, the winning content is pushed first and the test is
    /// only completed once the push succeeds, so an API failure leaves the
    /// test active.
    pub async fn check_early_winners(&self) -> ServiceResult<u32> {
        let mut selected = 0;
        for test in self.abtests_repo.active_tests().await? {
            if !test.auto_select_winner {
                continue;
            }

            let verdict = match self.check(&test).await {
                Ok(v) => v,
                Err(err) => {
                    tracing::error!("winner check failed for test {}: {}", test.test_id, err);
                    continue;
                }
            };
            let WinnerCheck::Winner(variant_id) = verdict else {
                continue;
            };

            let variants = self.abtests_repo.variants(test.test_id).await?;
            let variant = match variant_of(&variants, variant_id) {
                Ok(v) => v.clone(),
                Err(err) => {
                    tracing::error!("winner check for test {}: {}", test.test_id, err);
                    continue;
                }
            };

            if let Err(err) = self
                .scheduler
                .push_and_record(None, &test, &variant, "winner_applied")
                .await
            {
                tracing::error!(
                    "early winner application failed for test {}, staying active: {}",
                    test.test_id,
                    err
                );
                continue;
            }

            match self
                .complete_with_winner(None, &test, &variant, "performance_threshold")
                .await
            {
                Ok(()) => selected += 1,
                Err(err) => {
                    tracing::error!("completing test {} failed: {}", test.test_id, err);
                }
            }
        }
        Ok(selected)
    }

    async fn complete_with_winner(
        &self,
        actor: Option<Uuid>,
        test: &AbTest,
        variant: &TestVariant,
        trigger: &str,
    ) -> ServiceResult<()> {
        self.abtests_repo
            .set_winner_and_complete(test.test_id, variant.variant_id, chrono::Utc::now())
            .await?;
        self.test_logs_repo
            .append(
                test.test_id,
                "winner_selected",
                actor,
                serde_json::json!({
                    "variant_id": variant.variant_id,
                    "variant_name": variant.variant_name,
                    "ctr": variant.ctr,
                    "trigger": trigger,
                }),
            )
            .await?;

        tracing::info!(
            "selected winner {} for test {} ({})",
            variant.variant_name,
            test.test_id,
            trigger
        );
        Ok(())
    }
}

fn variant_of(variants: &[TestVariant], variant_id: Uuid) -> ServiceResult<&TestVariant> {
    variants
        .iter()
        .find(|v| v.variant_id == variant_id)
        .ok_or_else(|| {
            ServiceError::Validation("variant does not belong to this test".to_string())
        })
}
