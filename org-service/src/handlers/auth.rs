use service_core::{
    axum::{extract::State, response::IntoResponse, Json},
    error::AppError,
};

use crate::{
    dtos::{auth::LoginRequest, ApiResponse},
    middleware::AuthAdmin,
    utils::ValidatedJson,
    AppState,
};

/// Login with admin email and password
#[utoipa::path(
    post,
    path = "/admin/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = TokenResponse),
        (status = 401, description = "Invalid credentials", body = ErrorResponse),
        (status = 403, description = "Admin account is inactive", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse),
        (status = 429, description = "Too many login attempts", body = ErrorResponse)
    ),
    tag = "Authentication"
)]
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    let token = state.auth_service.login(req).await?;
    Ok(Json(ApiResponse::ok("Login successful", token)))
}

/// The admin behind the presented token
#[utoipa::path(
    get,
    path = "/admin/me",
    responses(
        (status = 200, description = "Current admin", body = CurrentAdmin),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse)
    ),
    tag = "Authentication",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn me(AuthAdmin(admin): AuthAdmin) -> impl IntoResponse {
    Json(ApiResponse::ok("Current admin info retrieved", admin))
}
