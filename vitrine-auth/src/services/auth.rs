use std::sync::{Arc, OnceLock};

use crate::dtos::auth::{LoginRequest, LoginResponse};
use crate::services::error::AuthError;
use crate::services::jwt::TokenManager;
use crate::services::store::{OrganizationGetter, StoreError};
use crate::utils::{hash_password, PasswordVerifier};

/// Hash checked when no organization matches, so unknown emails cost the same
/// as wrong passwords.
fn dummy_hash() -> &'static str {
    static DUMMY_HASH: OnceLock<String> = OnceLock::new();
    DUMMY_HASH.get_or_init(|| {
        hash_password("vitrine-dummy-password").unwrap_or_else(|e| {
            tracing::error!(error = %e, "Failed to build dummy password hash");
            String::new()
        })
    })
}

/// Login flow: credential store, password verifier and token manager
/// orchestrated into a token plus the public organization summary.
#[derive(Clone)]
pub struct AuthService {
    organizations: Arc<dyn OrganizationGetter>,
    passwords: Arc<dyn PasswordVerifier>,
    tokens: Arc<dyn TokenManager>,
}

impl AuthService {
    pub fn new(
        organizations: Arc<dyn OrganizationGetter>,
        passwords: Arc<dyn PasswordVerifier>,
        tokens: Arc<dyn TokenManager>,
    ) -> Self {
        Self {
            organizations,
            passwords,
            tokens,
        }
    }

    #[tracing::instrument(skip_all, fields(email = %req.email))]
    pub async fn login(&self, req: LoginRequest) -> Result<LoginResponse, AuthError> {
        let organization = match self.organizations.get_by_email(&req.email).await {
            Ok(organization) => Some(organization),
            Err(StoreError::NotFound(_)) => {
                tracing::info!("Login rejected: no organization for email");
                None
            }
            Err(e) => {
                tracing::error!(error = %e, "Organization lookup failed during login");
                None
            }
        };

        let hash = match &organization {
            Some(organization) => organization.user.password.clone(),
            None => dummy_hash().to_string(),
        };
        let verified = self.verify_password(hash, req.password).await?;

        let Some(organization) = organization else {
            return Err(AuthError::InvalidCredentials);
        };

        if let Err(e) = verified {
            tracing::info!(reason = %e, user_id = organization.user.id, "Login rejected: password mismatch");
            return Err(AuthError::InvalidCredentials);
        }

        let token = self
            .tokens
            .create_token(&organization.user, None)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, user_id = organization.user.id, "Failed to sign token");
                AuthError::TokenIssuance(e)
            })?;

        tracing::info!(
            organization_id = organization.id,
            user_id = organization.user.id,
            "Organization logged in"
        );

        Ok(LoginResponse {
            organization: organization.summary(),
            token,
        })
    }

    /// Hash verification is CPU bound; keep it off the async workers.
    async fn verify_password(
        &self,
        hash: String,
        plaintext: String,
    ) -> Result<Result<(), anyhow::Error>, AuthError> {
        let verifier = Arc::clone(&self.passwords);
        tokio::task::spawn_blocking(move || verifier.compare_hash_and_password(&hash, &plaintext))
            .await
            .map_err(|e| {
                AuthError::Internal(anyhow::anyhow!("Password verification task failed: {}", e))
            })
    }
}
