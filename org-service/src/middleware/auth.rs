use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts},
    middleware::Next,
    response::Response,
};
use service_core::error::AppError;

use crate::{dtos::auth::CurrentAdmin, AppState};

/// Require a bearer token that still resolves to a live admin.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| AppError::Unauthorized(anyhow::anyhow!("Not authenticated")))?;

    let admin = state.auth_service.authenticate(token).await?;

    tracing::debug!(
        admin_id = %admin.admin_id,
        organization = %admin.organization_name,
        "Request authenticated"
    );

    req.extensions_mut().insert(admin);
    Ok(next.run(req).await)
}

/// Extractor for the admin resolved by [`auth_middleware`].
pub struct AuthAdmin(pub CurrentAdmin);

#[axum::async_trait]
impl<S> FromRequestParts<S> for AuthAdmin
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let admin = parts.extensions.get::<CurrentAdmin>().ok_or_else(|| {
            AppError::InternalError(anyhow::anyhow!(
                "Authenticated admin missing from request extensions"
            ))
        })?;

        Ok(AuthAdmin(admin.clone()))
    }
}
