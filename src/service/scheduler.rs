use crate::abtest::rotation;
use crate::domain::abtest::{AbTest, TestStatus, TestType, TestVariant};
use crate::domain::integration::ServiceKind;
use crate::google::{retry_api, ApiError, VideoHost};
use crate::repo::abtests_repo::AbTestsRepo;
use crate::repo::test_logs_repo::TestLogsRepo;
use crate::service::error::{ServiceError, ServiceResult};
use crate::service::integration_service::IntegrationService;
use std::sync::Arc;
use uuid::Uuid;

#[derive(Clone)]
pub struct VariantScheduler {
    pub abtests_repo: AbTestsRepo,
    pub test_logs_repo: TestLogsRepo,
    pub integrations: IntegrationService,
    pub youtube: Arc<dyn VideoHost>,
}

/// Pushes one variant's content to the video. For combined tests the title
/// lands first; a thumbnail failure rolls the title back to the captured
/// value, so the video is never left half-applied.
pub async fn push_variant_content(
    youtube: &dyn VideoHost,
    token: &str,
    video_id: &str,
    test_type: TestType,
    variant: &TestVariant,
) -> Result<(), ApiError> {
    match test_type {
        TestType::Thumbnail => {
            let url = variant.thumbnail_url.as_deref().unwrap_or_default();
            youtube.set_thumbnail(token, video_id, url).await
        }
        TestType::Title => {
            let mut snippet = youtube.video_snippet(token, video_id).await?;
            snippet.title = variant.title.clone().unwrap_or_default();
            youtube.update_snippet(token, &snippet).await
        }
        TestType::Description => {
            let mut snippet = youtube.video_snippet(token, video_id).await?;
            snippet.description = variant.description.clone().unwrap_or_default();
            youtube.update_snippet(token, &snippet).await
        }
        TestType::Combined => {
            let mut snippet = youtube.video_snippet(token, video_id).await?;
            let previous_title = snippet.title.clone();
            snippet.title = variant.title.clone().unwrap_or_default();
            youtube.update_snippet(token, &snippet).await?;

            let url = variant.thumbnail_url.as_deref().unwrap_or_default();
            if let Err(err) = youtube.set_thumbnail(token, video_id, url).await {
                snippet.title = previous_title;
                if let Err(rollback_err) = youtube.update_snippet(token, &snippet).await {
                    tracing::error!(
                        "title rollback failed for video {}: {}",
                        video_id,
                        rollback_err
                    );
                }
                return Err(err);
            }
            Ok(())
        }
    }
}

impl VariantScheduler {
    pub async fn apply_variant(
        &self,
        actor: Option<Uuid>,
        test: &AbTest,
        variant: &TestVariant,
    ) -> ServiceResult<()> {
        if test.status != TestStatus::Active {
            return Err(ServiceError::InvalidState(format!(
                "cannot apply a variant for a test with status '{}'",
                test.status.as_str()
            )));
        }

        self.push_and_record(actor, test, variant, "variant_changed").await
    }

    /// Shared apply path for rotations and permanent winner application. The
    /// variant only counts as applied after the API calls succeed.
    pub async fn push_and_record(
        &self,
        actor: Option<Uuid>,
        test: &AbTest,
        variant: &TestVariant,
        log_action: &str,
    ) -> ServiceResult<()> {
        let token = self
            .integrations
            .access_token(test.creator_id, ServiceKind::Youtube)
            .await?;

        retry_api(3, || {
            push_variant_content(
                self.youtube.as_ref(),
                &token,
                &test.video_id,
                test.test_type,
                variant,
            )
        })
        .await?;

        let applied_at = chrono::Utc::now();
        self.abtests_repo
            .set_variant_applied(variant.variant_id, applied_at)
            .await?;
        self.test_logs_repo
            .append(
                test.test_id,
                log_action,
                actor,
                serde_json::json!({
                    "variant_id": variant.variant_id,
                    "variant_name": variant.variant_name,
                    "test_type": test.test_type.as_str(),
                    "applied_at": applied_at.to_rfc3339(),
                }),
            )
            .await?;

        tracing::info!(
            "applied variant {} to video {}",
            variant.variant_name,
            test.video_id
        );
        Ok(())
    }

    /// Advances an active test to the next variant in name order.
    pub async fn rotate(&self, actor: Option<Uuid>, test_id: Uuid) -> ServiceResult<TestVariant> {
        let test = self
            .abtests_repo
            .get(test_id)
            .await?
            .ok_or_else(|| ServiceError::NotFound("test not found".to_string()))?;

        if test.status != TestStatus::Active {
            return Err(ServiceError::InvalidState(format!(
                "cannot rotate variants for a test with status '{}'",
                test.status.as_str()
            )));
        }

        let variants = self.abtests_repo.variants(test_id).await?;
        let next = rotation::next_variant(&variants)
            .cloned()
            .ok_or_else(|| ServiceError::InvalidState("test has no variants".to_string()))?;

        self.apply_variant(actor, &test, &next).await?;
        Ok(next)
    }

    /// Worker entry point: rotate every active test whose dwell time has
    /// elapsed. Per-test failures are logged and skipped so one broken test
    /// cannot stall the rest.
    pub async fn rotate_due(&self, now: chrono::DateTime<chrono::Utc>) -> ServiceResult<u32> {
        let mut rotated = 0;
        for test in self.abtests_repo.active_tests().await? {
            let variants = self.abtests_repo.variants(test.test_id).await?;
            let last_applied = variants.iter().filter_map(|v| v.applied_at).max();

            if !rotation::rotation_due(last_applied, test.rotation_frequency_hours, now) {
                continue;
            }

            match self.rotate(None, test.test_id).await {
                Ok(variant) => {
                    rotated += 1;
                    tracing::info!(
                        "rotated test {} to variant {}",
                        test.test_id,
                        variant.variant_name
                    );
                }
                Err(err) => {
                    tracing::error!("rotation failed for test {}: {}", test.test_id, err);
                }
            }
        }
        Ok(rotated)
    }
}
