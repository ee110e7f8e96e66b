use crate::crypto;
use crate::domain::integration::{IntegrationStatus, ServiceKind};
use crate::google::oauth::{scope_family, GoogleOAuth};
use crate::repo::integrations_repo::IntegrationsRepo;
use crate::service::error::{ServiceError, ServiceResult};
use uuid::Uuid;

#[derive(Clone)]
pub struct IntegrationService {
    pub integrations_repo: IntegrationsRepo,
    pub oauth: GoogleOAuth,
    pub secret_key: String,
}

impl IntegrationService {
    pub fn connect_url(&self, service: ServiceKind) -> String {
        self.oauth.authorization_url(service)
    }

    /// Authorization-code callback: exchange, verify the grant actually covers
    /// the service family, store encrypted.
    pub async fn handle_callback(
        &self,
        creator_id: Uuid,
        service: ServiceKind,
        code: &str,
    ) -> ServiceResult<()> {
        let tokens = self.oauth.exchange_code(code).await?;

        let family = scope_family(service);
        if !tokens.scope.split_whitespace().any(|s| s.contains(family)) {
            return Err(ServiceError::Validation(format!(
                "{family} access was not granted, approve the requested permissions"
            )));
        }

        let access = crypto::encrypt_token(&self.secret_key, &tokens.access_token)?;
        let refresh = tokens
            .refresh_token
            .as_deref()
            .map(|t| crypto::encrypt_token(&self.secret_key, t))
            .transpose()?;
        let expires_at = chrono::Utc::now() + chrono::Duration::seconds(tokens.expires_in);

        self.integrations_repo
            .upsert(
                creator_id,
                service,
                &access,
                refresh.as_deref(),
                expires_at,
                &tokens.scope,
            )
            .await?;
        Ok(())
    }

    /// Valid access token for the creator, refreshing through the token
    /// endpoint when the stored one has expired.
    pub async fn access_token(
        &self,
        creator_id: Uuid,
        service: ServiceKind,
    ) -> ServiceResult<String> {
        let integration = self
            .integrations_repo
            .get(creator_id, service)
            .await?
            .ok_or_else(|| {
                ServiceError::InvalidState(format!("{} is not connected", service.as_str()))
            })?;

        if !integration.is_expired(chrono::Utc::now()) {
            return Ok(crypto::decrypt_token(&self.secret_key, &integration.access_token)?);
        }

        let Some(refresh_encrypted) = integration.refresh_token.as_deref() else {
            return Err(ServiceError::Unauthorized(
                "session with Google expired, reconnect the account".to_string(),
            ));
        };
        let refresh_token = crypto::decrypt_token(&self.secret_key, refresh_encrypted)?;

        let tokens = self.oauth.refresh(&refresh_token).await.map_err(|err| {
            tracing::warn!("token refresh failed for {}: {}", service.as_str(), err);
            ServiceError::Unauthorized(
                "session with Google expired, reconnect the account".to_string(),
            )
        })?;

        let access = crypto::encrypt_token(&self.secret_key, &tokens.access_token)?;
        let expires_at = chrono::Utc::now() + chrono::Duration::seconds(tokens.expires_in);
        self.integrations_repo
            .update_access_token(creator_id, service, &access, expires_at)
            .await?;

        Ok(tokens.access_token)
    }

    pub async fn statuses(&self, creator_id: Uuid) -> ServiceResult<Vec<IntegrationStatus>> {
        let now = chrono::Utc::now();
        let connected = self.integrations_repo.list(creator_id).await?;

        Ok([ServiceKind::GoogleDrive, ServiceKind::Youtube]
            .into_iter()
            .map(|service| {
                let row = connected.iter().find(|i| i.service == service);
                IntegrationStatus {
                    service,
                    connected: row.is_some(),
                    expired: row.map(|i| i.is_expired(now)).unwrap_or(false),
                    scopes: row.map(|i| i.scopes.clone()).unwrap_or_default(),
                }
            })
            .collect())
    }

    /// Local removal only. The token is not revoked upstream: with a shared
    /// OAuth client, revoking one grant kills the sibling service's grant too.
    pub async fn disconnect(&self, creator_id: Uuid, service: ServiceKind) -> ServiceResult<()> {
        self.integrations_repo.delete(creator_id, service).await?;
        Ok(())
    }
}
