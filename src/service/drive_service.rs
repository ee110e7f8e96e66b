use crate::domain::drive_file::DriveFile;
use crate::domain::integration::ServiceKind;
use crate::google::{retry_api, DriveApi};
use crate::repo::drive_files_repo::DriveFilesRepo;
use crate::service::error::ServiceResult;
use crate::service::integration_service::IntegrationService;
use std::sync::Arc;
use uuid::Uuid;

#[derive(Clone)]
pub struct DriveService {
    pub drive_files_repo: DriveFilesRepo,
    pub integrations: IntegrationService,
    pub drive: Arc<dyn DriveApi>,
}

impl DriveService {
    pub async fn list(&self, creator_id: Uuid) -> ServiceResult<Vec<DriveFile>> {
        Ok(self.drive_files_repo.list(creator_id).await?)
    }

    /// Refreshes the metadata cache from the Drive listing. Returns the number
    /// of files cached.
    pub async fn sync(&self, creator_id: Uuid) -> ServiceResult<usize> {
        let token = self
            .integrations
            .access_token(creator_id, ServiceKind::GoogleDrive)
            .await?;

        let files = retry_api(3, || self.drive.list_files(&token)).await?;
        for file in &files {
            self.drive_files_repo.upsert(creator_id, file).await?;
        }

        tracing::info!("synced {} drive files for creator {}", files.len(), creator_id);
        Ok(files.len())
    }
}
