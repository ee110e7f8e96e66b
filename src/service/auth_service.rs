use crate::crypto;
use crate::domain::user::{Role, User};
use crate::repo::sessions_repo::SessionsRepo;
use crate::repo::users_repo::UsersRepo;
use crate::service::error::{ServiceError, ServiceResult};
use uuid::Uuid;

const SESSION_TOKEN_LEN: usize = 48;
const INVITATION_TOKEN_LEN: usize = 64;
const MIN_PASSWORD_LEN: usize = 8;

#[derive(Clone)]
pub struct AuthService {
    pub users_repo: UsersRepo,
    pub sessions_repo: SessionsRepo,
    pub session_ttl_hours: i64,
}

impl AuthService {
    /// Self-service registration always creates a creator; managers and
    /// editors only enter through invitations.
    pub async fn register(&self, username: &str, password: &str) -> ServiceResult<(String, User)> {
        validate_username(username)?;
        validate_password(password)?;

        if self.users_repo.find_by_username(username).await?.is_some() {
            return Err(ServiceError::Validation("username is already taken".to_string()));
        }

        let hash = crypto::hash_password(password)?;
        let user = self.users_repo.create_creator(username, &hash).await?;
        let token = self.issue_session(user.user_id).await?;
        Ok((token, user))
    }

    pub async fn login(&self, username: &str, password: &str) -> ServiceResult<(String, User)> {
        let found = self.users_repo.find_by_username(username).await?;
        let Some(row) = found else {
            return Err(ServiceError::Unauthorized("invalid credentials".to_string()));
        };

        if !row.user.invitation_accepted {
            return Err(ServiceError::Unauthorized(
                "invitation has not been accepted yet".to_string(),
            ));
        }
        if !crypto::verify_password(password, &row.password_hash) {
            return Err(ServiceError::Unauthorized("invalid credentials".to_string()));
        }

        let token = self.issue_session(row.user.user_id).await?;
        Ok((token, row.user))
    }

    pub async fn logout(&self, token: &str) -> ServiceResult<()> {
        self.sessions_repo.delete(&crypto::token_digest(token)).await?;
        Ok(())
    }

    pub async fn current_user(&self, token: &str) -> ServiceResult<Option<User>> {
        Ok(self.sessions_repo.find_user(&crypto::token_digest(token)).await?)
    }

    /// Creates a pending team member and returns the invitation token the
    /// invitee redeems via accept-invitation.
    pub async fn invite(
        &self,
        actor: &User,
        username: &str,
        role: Role,
    ) -> ServiceResult<(User, String)> {
        if !actor.has_role(&[Role::Creator, Role::Manager]) {
            return Err(ServiceError::Forbidden(
                "only creators and managers can invite team members".to_string(),
            ));
        }
        if role == Role::Creator {
            return Err(ServiceError::Validation(
                "invitations are limited to manager and editor roles".to_string(),
            ));
        }
        validate_username(username)?;
        if self.users_repo.find_by_username(username).await?.is_some() {
            return Err(ServiceError::Validation("username is already taken".to_string()));
        }

        let token = crypto::generate_token(INVITATION_TOKEN_LEN);
        let user = self
            .users_repo
            .create_invited(username, role, actor.creator_scope(), actor.user_id, &token)
            .await?;
        Ok((user, token))
    }

    pub async fn accept_invitation(
        &self,
        invitation_token: &str,
        password: &str,
    ) -> ServiceResult<(String, User)> {
        validate_password(password)?;

        let user = self
            .users_repo
            .find_by_invitation_token(invitation_token)
            .await?
            .ok_or_else(|| {
                ServiceError::NotFound("invitation not found or already accepted".to_string())
            })?;

        let hash = crypto::hash_password(password)?;
        self.users_repo.accept_invitation(user.user_id, &hash).await?;
        let token = self.issue_session(user.user_id).await?;

        let user = self
            .users_repo
            .get(user.user_id)
            .await?
            .ok_or_else(|| ServiceError::NotFound("user not found".to_string()))?;
        Ok((token, user))
    }

    pub async fn team_members(&self, actor: &User) -> ServiceResult<Vec<User>> {
        Ok(self.users_repo.team_members(actor.creator_scope()).await?)
    }

    async fn issue_session(&self, user_id: Uuid) -> ServiceResult<String> {
        let token = crypto::generate_token(SESSION_TOKEN_LEN);
        let expires_at = chrono::Utc::now() + chrono::Duration::hours(self.session_ttl_hours);
        self.sessions_repo
            .insert(user_id, &crypto::token_digest(&token), expires_at)
            .await?;
        Ok(token)
    }
}

fn validate_username(username: &str) -> ServiceResult<()> {
    let trimmed = username.trim();
    if trimmed.len() < 3 || trimmed.len() > 64 {
        return Err(ServiceError::Validation(
            "username must be between 3 and 64 characters".to_string(),
        ));
    }
    Ok(())
}

fn validate_password(password: &str) -> ServiceResult<()> {
    if password.len() < MIN_PASSWORD_LEN {
        return Err(ServiceError::Validation(format!(
            "password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    Ok(())
}
