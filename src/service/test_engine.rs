use crate::abtest::{lifecycle, rotation, validate, winner};
use crate::domain::abtest::{
    AbTest, TestLogEntry, TestResultPoint, TestSnapshot, TestStatus, TestType,
};
use crate::domain::user::User;
use crate::repo::abtests_repo::{AbTestsRepo, CreateTestInput, CreateVariantInput};
use crate::repo::test_logs_repo::TestLogsRepo;
use crate::repo::test_results_repo::TestResultsRepo;
use crate::service::error::{ServiceError, ServiceResult};
use crate::service::scheduler::VariantScheduler;
use uuid::Uuid;

pub const DEFAULT_PERFORMANCE_THRESHOLD: f64 = 0.05;

#[derive(Debug, Clone, serde::Deserialize)]
pub struct NewTest {
    pub video_id: String,
    pub video_title: String,
    pub test_type: String,
    pub duration_hours: i32,
    pub rotation_frequency_hours: i32,
    pub performance_threshold: Option<f64>,
    pub auto_select_winner: Option<bool>,
    pub variants: Vec<validate::VariantInput>,
}

/// Outcome of starting a test. The first variant application can fail without
/// failing the start itself, so the error rides along.
#[derive(Debug, serde::Serialize)]
pub struct StartOutcome {
    pub test: AbTest,
    pub first_variant_error: Option<String>,
}

#[derive(Clone)]
pub struct TestEngine {
    pub abtests_repo: AbTestsRepo,
    pub test_logs_repo: TestLogsRepo,
    pub test_results_repo: TestResultsRepo,
    pub scheduler: VariantScheduler,
}

impl TestEngine {
    pub async fn create(&self, actor: &User, input: NewTest) -> ServiceResult<AbTest> {
        let test_type = TestType::parse(&input.test_type).ok_or_else(|| {
            ServiceError::Validation(format!("unknown test type '{}'", input.test_type))
        })?;

        if input.video_id.trim().is_empty() {
            return Err(ServiceError::Validation("video_id is required".to_string()));
        }
        validate::validate_schedule(input.duration_hours, input.rotation_frequency_hours)
            .map_err(ServiceError::Validation)?;
        validate::validate_variants(test_type, &input.variants)
            .map_err(ServiceError::Validation)?;

        let threshold = input
            .performance_threshold
            .unwrap_or(DEFAULT_PERFORMANCE_THRESHOLD);
        if !(0.0..=1.0).contains(&threshold) {
            return Err(ServiceError::Validation(
                "performance_threshold must be between 0 and 1".to_string(),
            ));
        }

        let test = self
            .abtests_repo
            .create_with_variants(CreateTestInput {
                creator_id: actor.creator_scope(),
                video_id: input.video_id.trim().to_string(),
                video_title: input.video_title.trim().to_string(),
                test_type,
                duration_hours: input.duration_hours,
                rotation_frequency_hours: input.rotation_frequency_hours,
                performance_threshold: threshold,
                auto_select_winner: input.auto_select_winner.unwrap_or(true),
                variants: input
                    .variants
                    .iter()
                    .map(|v| CreateVariantInput {
                        variant_name: v.name.trim().to_string(),
                        thumbnail_url: v.thumbnail_url.clone(),
                        title: v.title.clone(),
                        description: v.description.clone(),
                    })
                    .collect(),
            })
            .await?;

        self.test_logs_repo
            .append(
                test.test_id,
                "created",
                Some(actor.user_id),
                serde_json::json!({
                    "test_type": test.test_type.as_str(),
                    "video_id": test.video_id,
                    "variant_count": input.variants.len(),
                }),
            )
            .await?;

        Ok(test)
    }

    /// Activates a draft or paused test. The first activation pins the
    /// schedule and pushes the first variant live; a failed push leaves the
    /// test active and is reported in the outcome instead.
    pub async fn start(&self, actor: &User, test_id: Uuid) -> ServiceResult<StartOutcome> {
        let test = self.owned(actor, test_id).await?;
        let action = lifecycle::transition(test.status, TestStatus::Active)
            .map_err(ServiceError::InvalidState)?;

        let variants = self.abtests_repo.variants(test_id).await?;
        if variants.len() < validate::MIN_VARIANTS || variants.len() > validate::MAX_VARIANTS {
            return Err(ServiceError::InvalidState(format!(
                "test must have between {} and {} variants to start",
                validate::MIN_VARIANTS,
                validate::MAX_VARIANTS
            )));
        }

        if test.start_date.is_none() {
            let start = chrono::Utc::now();
            let end = start + chrono::Duration::hours(test.duration_hours as i64);
            self.abtests_repo.mark_started(test_id, start, end).await?;
        } else {
            self.abtests_repo
                .set_status(test_id, TestStatus::Active)
                .await?;
        }

        self.test_logs_repo
            .append(test_id, action, Some(actor.user_id), serde_json::json!({}))
            .await?;

        let test = self.refreshed(test_id).await?;

        let mut first_variant_error = None;
        if action == "started" {
            if let Some(first) = variants.first() {
                if let Err(err) = self.scheduler.apply_variant(Some(actor.user_id), &test, first).await
                {
                    tracing::warn!(
                        "first variant application failed for test {}: {}",
                        test_id,
                        err
                    );
                    first_variant_error = Some(err.to_string());
                }
            }
        }

        Ok(StartOutcome {
            test,
            first_variant_error,
        })
    }

    pub async fn pause(&self, actor: &User, test_id: Uuid) -> ServiceResult<AbTest> {
        self.transition_to(actor, test_id, TestStatus::Paused).await
    }

    pub async fn resume(&self, actor: &User, test_id: Uuid) -> ServiceResult<AbTest> {
        let test = self.owned(actor, test_id).await?;
        if test.status != TestStatus::Paused {
            return Err(ServiceError::InvalidState(format!(
                "cannot resume a test with status '{}'",
                test.status.as_str()
            )));
        }
        self.transition_to(actor, test_id, TestStatus::Active).await
    }

    /// Completes a test ahead of schedule. The winner is the requested
    /// variant, or the cumulative-CTR leader when none is given.
    pub async fn stop(
        &self,
        actor: &User,
        test_id: Uuid,
        winner_variant_id: Option<Uuid>,
    ) -> ServiceResult<AbTest> {
        let test = self.owned(actor, test_id).await?;
        lifecycle::transition(test.status, TestStatus::Completed)
            .map_err(ServiceError::InvalidState)?;

        let variants = self.abtests_repo.variants(test_id).await?;
        let winner_id = match winner_variant_id {
            Some(id) => {
                if !variants.iter().any(|v| v.variant_id == id) {
                    return Err(ServiceError::Validation(
                        "winner variant does not belong to this test".to_string(),
                    ));
                }
                id
            }
            None => winner::best_by_ctr(&winner::standings(&variants))
                .map(|s| s.variant_id)
                .ok_or_else(|| {
                    ServiceError::InvalidState("test has no variants".to_string())
                })?,
        };

        let completed_at = chrono::Utc::now();
        self.abtests_repo
            .set_winner_and_complete(test_id, winner_id, completed_at)
            .await?;

        self.test_logs_repo
            .append(test_id, "stopped", Some(actor.user_id), serde_json::json!({}))
            .await?;
        self.test_logs_repo
            .append(
                test_id,
                "winner_selected",
                Some(actor.user_id),
                serde_json::json!({
                    "variant_id": winner_id,
                    "manual": winner_variant_id.is_some(),
                }),
            )
            .await?;

        self.refreshed(test_id).await
    }

    pub async fn list(&self, actor: &User) -> ServiceResult<Vec<AbTest>> {
        Ok(self
            .abtests_repo
            .list_for_creator(actor.creator_scope())
            .await?)
    }

    pub async fn snapshot(&self, actor: &User, test_id: Uuid) -> ServiceResult<TestSnapshot> {
        let test = self.owned(actor, test_id).await?;
        let variants = self.abtests_repo.variants(test_id).await?;
        Ok(build_snapshot(test, variants, chrono::Utc::now()))
    }

    pub async fn logs(&self, actor: &User, test_id: Uuid) -> ServiceResult<Vec<TestLogEntry>> {
        self.owned(actor, test_id).await?;
        Ok(self.test_logs_repo.list(test_id).await?)
    }

    pub async fn results(
        &self,
        actor: &User,
        test_id: Uuid,
    ) -> ServiceResult<Vec<TestResultPoint>> {
        self.owned(actor, test_id).await?;
        Ok(self.test_results_repo.list_for_test(test_id).await?)
    }

    async fn transition_to(
        &self,
        actor: &User,
        test_id: Uuid,
        to: TestStatus,
    ) -> ServiceResult<AbTest> {
        let test = self.owned(actor, test_id).await?;
        let action =
            lifecycle::transition(test.status, to).map_err(ServiceError::InvalidState)?;

        self.abtests_repo.set_status(test_id, to).await?;
        self.test_logs_repo
            .append(test_id, action, Some(actor.user_id), serde_json::json!({}))
            .await?;

        self.refreshed(test_id).await
    }

    pub async fn owned(&self, actor: &User, test_id: Uuid) -> ServiceResult<AbTest> {
        let test = self
            .abtests_repo
            .get(test_id)
            .await?
            .ok_or_else(|| ServiceError::NotFound("test not found".to_string()))?;

        if test.creator_id != actor.creator_scope() {
            return Err(ServiceError::Forbidden(
                "test belongs to another team".to_string(),
            ));
        }
        Ok(test)
    }

    async fn refreshed(&self, test_id: Uuid) -> ServiceResult<AbTest> {
        self.abtests_repo
            .get(test_id)
            .await?
            .ok_or_else(|| ServiceError::NotFound("test not found".to_string()))
    }
}

pub fn build_snapshot(
    test: AbTest,
    variants: Vec<crate::domain::abtest::TestVariant>,
    now: chrono::DateTime<chrono::Utc>,
) -> TestSnapshot {
    let (progress, remaining) = match (test.status, test.start_date, test.end_date) {
        (TestStatus::Completed, _, _) => (100.0, None),
        (TestStatus::Draft, _, _) => (0.0, None),
        (_, Some(start), Some(end)) if end > start => {
            let total = (end - start).num_seconds() as f64;
            let elapsed = (now - start).num_seconds().max(0) as f64;
            let pct = (elapsed / total * 100.0).clamp(0.0, 100.0);
            let remaining = (end - now).num_seconds().max(0);
            (winner::round2(pct), Some(remaining))
        }
        _ => (0.0, None),
    };

    let current_variant_id = rotation::current_variant(&variants).map(|v| v.variant_id);

    TestSnapshot {
        test,
        variants,
        current_variant_id,
        progress_percentage: progress,
        time_remaining_seconds: remaining,
    }
}
