use std::sync::Arc;
use validator::Validate;

use super::error::ServiceError;
use super::jwt::TokenCodec;
use super::metrics::record_login_attempt;
use super::registry::MasterRegistry;
use super::tenant_store::TenantStore;
use crate::dtos::auth::{CurrentAdmin, LoginRequest, TokenResponse};
use crate::models::AdminAccount;
use crate::utils::{normalize_email, Password, PasswordHasher};

const INVALID_CREDENTIALS: &str = "Invalid credentials";
const INACTIVE_ADMIN: &str = "Admin account is inactive";

/// Login and the per-request identity check that guards tenant mutations.
#[derive(Clone)]
pub struct AuthService {
    registry: Arc<dyn MasterRegistry>,
    tenants: Arc<dyn TenantStore>,
    hasher: Arc<dyn PasswordHasher>,
    tokens: Arc<dyn TokenCodec>,
}

impl AuthService {
    pub fn new(
        registry: Arc<dyn MasterRegistry>,
        tenants: Arc<dyn TenantStore>,
        hasher: Arc<dyn PasswordHasher>,
        tokens: Arc<dyn TokenCodec>,
    ) -> Self {
        Self {
            registry,
            tenants,
            hasher,
            tokens,
        }
    }

    /// Exchange admin credentials for a bearer token.
    ///
    /// Unknown email, missing admin document and wrong password all fail with
    /// the same `Unauthorized` message.
    pub async fn login(&self, req: LoginRequest) -> Result<TokenResponse, ServiceError> {
        req.validate()?;
        let email = normalize_email(&req.email);

        let result = self.authenticate_credentials(&email, &req.password).await;
        match &result {
            Ok(_) => record_login_attempt("success"),
            Err(e) => {
                tracing::warn!(email = %email, reason = %e, "Login rejected");
                record_login_attempt(e.outcome());
            }
        }

        let admin = result?;
        let access_token =
            self.tokens
                .encode(&admin.id, &admin.email, &admin.organization_name)?;

        tracing::info!(
            admin_id = %admin.id,
            organization = %admin.organization_name,
            "Admin logged in"
        );

        Ok(TokenResponse {
            access_token,
            token_type: "bearer".to_string(),
            expires_in: self.tokens.expires_in_seconds(),
            admin_email: admin.email,
            organization_name: admin.organization_name,
        })
    }

    async fn authenticate_credentials(
        &self,
        email: &str,
        password: &str,
    ) -> Result<AdminAccount, ServiceError> {
        let invalid = || ServiceError::Unauthorized(INVALID_CREDENTIALS.to_string());

        let org = self
            .registry
            .find_by_admin_email(email)
            .await?
            .ok_or_else(invalid)?;

        // The registry email is a cache; the tenant namespace decides.
        let admin = self
            .tenants
            .find_admin_by_email(&org.namespace, email)
            .await?
            .ok_or_else(invalid)?;

        if !self
            .hasher
            .verify(&Password::new(password), &admin.password_digest)
        {
            return Err(invalid());
        }

        if !admin.active {
            return Err(ServiceError::Forbidden(INACTIVE_ADMIN.to_string()));
        }

        Ok(admin)
    }

    /// Confirm that `admin_id` is still a live, active admin of `organization_name`.
    pub async fn verify_access(
        &self,
        admin_id: &str,
        organization_name: &str,
    ) -> Result<AdminAccount, ServiceError> {
        let org = self
            .registry
            .find_by_name(organization_name)
            .await?
            .ok_or_else(|| ServiceError::Unauthorized("Organization not found".to_string()))?;

        let admin = self
            .tenants
            .find_admin_by_id(&org.namespace, admin_id)
            .await?
            .ok_or_else(|| ServiceError::Unauthorized("Admin not found".to_string()))?;

        if !admin.active {
            return Err(ServiceError::Forbidden(INACTIVE_ADMIN.to_string()));
        }

        Ok(admin)
    }

    /// Decode a bearer token and run [`AuthService::verify_access`] on its claims.
    pub async fn authenticate(&self, token: &str) -> Result<CurrentAdmin, ServiceError> {
        let claims = self.tokens.decode(token)?;
        let admin = self
            .verify_access(&claims.admin_id, &claims.organization_name)
            .await?;

        Ok(CurrentAdmin {
            admin_id: admin.id,
            email: admin.email,
            organization_name: claims.organization_name,
        })
    }
}
