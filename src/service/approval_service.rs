use crate::domain::approval::{ApprovalRequest, ApprovalStatus};
use crate::domain::integration::ServiceKind;
use crate::domain::user::User;
use crate::google::{retry_api, DriveApi, UploadRequest, UploadedVideo, VideoHost};
use crate::repo::approvals_repo::ApprovalsRepo;
use crate::repo::drive_files_repo::DriveFilesRepo;
use crate::service::error::{ServiceError, ServiceResult};
use crate::service::integration_service::IntegrationService;
use std::sync::Arc;
use uuid::Uuid;

#[derive(Clone)]
pub struct ApprovalService {
    pub approvals_repo: ApprovalsRepo,
    pub drive_files_repo: DriveFilesRepo,
    pub integrations: IntegrationService,
    pub drive: Arc<dyn DriveApi>,
    pub youtube: Arc<dyn VideoHost>,
}

impl ApprovalService {
    pub async fn submit(
        &self,
        actor: &User,
        file_id: Uuid,
        description: &str,
    ) -> ServiceResult<ApprovalRequest> {
        let file = self
            .drive_files_repo
            .get(file_id)
            .await?
            .ok_or_else(|| ServiceError::NotFound("file not found".to_string()))?;

        let creator_id = actor.creator_scope();
        if file.creator_id != creator_id {
            return Err(ServiceError::Forbidden(
                "file belongs to another team".to_string(),
            ));
        }

        Ok(self
            .approvals_repo
            .create(actor.user_id, creator_id, file_id, description)
            .await?)
    }

    pub async fn review(
        &self,
        actor: &User,
        request_id: Uuid,
        approve: bool,
        rejection_reason: Option<String>,
    ) -> ServiceResult<ApprovalRequest> {
        let request = self.owned_request(actor, request_id).await?;

        if !request.status.can_be_reviewed() {
            return Err(ServiceError::InvalidState(format!(
                "cannot review a request with status '{}'",
                request.status.as_str()
            )));
        }

        let (status, reason) = if approve {
            (ApprovalStatus::Approved, None)
        } else {
            let reason = rejection_reason
                .filter(|r| !r.trim().is_empty())
                .ok_or_else(|| {
                    ServiceError::Validation("rejection requires a reason".to_string())
                })?;
            (ApprovalStatus::Rejected, Some(reason))
        };

        self.approvals_repo
            .set_review(request_id, status, actor.user_id, reason.as_deref())
            .await?;

        self.approvals_repo
            .get(request_id)
            .await?
            .ok_or_else(|| ServiceError::NotFound("approval request not found".to_string()))
    }

    /// Pushes an approved video from Drive to YouTube and records the
    /// resulting video id.
    pub async fn upload(
        &self,
        actor: &User,
        request_id: Uuid,
        privacy_status: Option<String>,
    ) -> ServiceResult<UploadedVideo> {
        let request = self.owned_request(actor, request_id).await?;

        if !request.status.can_be_uploaded() {
            return Err(ServiceError::InvalidState(format!(
                "cannot upload a request with status '{}'",
                request.status.as_str()
            )));
        }

        let file = self
            .drive_files_repo
            .get(request.file_id)
            .await?
            .ok_or_else(|| ServiceError::NotFound("file not found".to_string()))?;

        let creator_id = actor.creator_scope();
        let drive_token = self
            .integrations
            .access_token(creator_id, ServiceKind::GoogleDrive)
            .await?;
        let content = retry_api(3, || self.drive.download(&drive_token, &file.file_id)).await?;

        let youtube_token = self
            .integrations
            .access_token(creator_id, ServiceKind::Youtube)
            .await?;
        let upload = UploadRequest {
            title: file.name.clone(),
            description: request.description.clone(),
            tags: Vec::new(),
            privacy_status: privacy_status.unwrap_or_else(|| "private".to_string()),
            content,
        };
        let uploaded = self.youtube.upload_video(&youtube_token, &upload).await?;

        self.approvals_repo
            .set_uploaded(request_id, &uploaded.video_id)
            .await?;

        tracing::info!(
            "uploaded approval request {} as video {}",
            request_id,
            uploaded.video_id
        );
        Ok(uploaded)
    }

    pub async fn list_for_actor(
        &self,
        actor: &User,
        status: Option<ApprovalStatus>,
    ) -> ServiceResult<Vec<ApprovalRequest>> {
        use crate::domain::user::Role;
        match actor.role {
            Role::Editor => Ok(self.approvals_repo.list_for_editor(actor.user_id).await?),
            _ => Ok(self
                .approvals_repo
                .list_for_creator(actor.creator_scope(), status)
                .await?),
        }
    }

    async fn owned_request(&self, actor: &User, request_id: Uuid) -> ServiceResult<ApprovalRequest> {
        let request = self
            .approvals_repo
            .get(request_id)
            .await?
            .ok_or_else(|| ServiceError::NotFound("approval request not found".to_string()))?;

        if request.creator_id != actor.creator_scope() {
            return Err(ServiceError::Forbidden(
                "request belongs to another team".to_string(),
            ));
        }
        Ok(request)
    }
}
