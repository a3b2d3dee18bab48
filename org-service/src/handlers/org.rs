use service_core::{
    axum::{
        extract::{Query, State},
        http::StatusCode,
        response::IntoResponse,
        Json,
    },
    error::AppError,
};

use crate::{
    dtos::{
        org::{
            CreateOrganizationRequest, DeleteOrganizationRequest, DeletedOrganizationResponse,
            GetOrganizationQuery, OrganizationResponse, UpdateOrganizationRequest,
        },
        ApiResponse,
    },
    middleware::AuthAdmin,
    utils::ValidatedJson,
    AppState,
};

/// Create an organization together with its admin account
#[utoipa::path(
    post,
    path = "/org/create",
    request_body = CreateOrganizationRequest,
    responses(
        (status = 201, description = "Organization created", body = OrganizationResponse),
        (status = 400, description = "Malformed request body", body = ErrorResponse),
        (status = 409, description = "Organization name or admin email already taken", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Organizations"
)]
pub async fn create_organization(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<CreateOrganizationRequest>,
) -> Result<impl IntoResponse, AppError> {
    let record = state.lifecycle.create_organization(req).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(
            "Organization created successfully",
            OrganizationResponse::from(record),
        )),
    ))
}

/// Fetch one organization by name
#[utoipa::path(
    get,
    path = "/org/get",
    params(GetOrganizationQuery),
    responses(
        (status = 200, description = "Organization found", body = OrganizationResponse),
        (status = 404, description = "Organization not found", body = ErrorResponse)
    ),
    tag = "Organizations"
)]
pub async fn get_organization(
    State(state): State<AppState>,
    Query(query): Query<GetOrganizationQuery>,
) -> Result<impl IntoResponse, AppError> {
    let record = state
        .lifecycle
        .get_organization(&query.organization_name)
        .await?;
    Ok(Json(ApiResponse::ok(
        "Organization retrieved successfully",
        OrganizationResponse::from(record),
    )))
}

/// List every organization in creation order
#[utoipa::path(
    get,
    path = "/org/list",
    responses(
        (status = 200, description = "All organizations", body = [OrganizationResponse])
    ),
    tag = "Organizations"
)]
pub async fn list_organizations(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let organizations: Vec<OrganizationResponse> = state
        .lifecycle
        .list_organizations()
        .await?
        .into_iter()
        .map(OrganizationResponse::from)
        .collect();

    Ok(Json(ApiResponse::ok(
        format!("Retrieved {} organization(s)", organizations.len()),
        organizations,
    )))
}

/// Rename the caller's organization and/or change its admin credentials
#[utoipa::path(
    put,
    path = "/org/update",
    request_body = UpdateOrganizationRequest,
    responses(
        (status = 200, description = "Organization updated", body = OrganizationResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Not the caller's organization", body = ErrorResponse),
        (status = 404, description = "Organization not found", body = ErrorResponse),
        (status = 409, description = "New name or email already taken", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse)
    ),
    tag = "Organizations",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn update_organization(
    State(state): State<AppState>,
    AuthAdmin(admin): AuthAdmin,
    ValidatedJson(req): ValidatedJson<UpdateOrganizationRequest>,
) -> Result<impl IntoResponse, AppError> {
    let record = state
        .lifecycle
        .rename_organization(req, &admin.organization_name)
        .await?;
    Ok(Json(ApiResponse::ok(
        "Organization updated successfully",
        OrganizationResponse::from(record),
    )))
}

/// Delete the caller's organization and its tenant namespace
#[utoipa::path(
    delete,
    path = "/org/delete",
    request_body = DeleteOrganizationRequest,
    responses(
        (status = 200, description = "Organization deleted", body = DeletedOrganizationResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Not the caller's organization", body = ErrorResponse),
        (status = 404, description = "Organization not found", body = ErrorResponse)
    ),
    tag = "Organizations",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn delete_organization(
    State(state): State<AppState>,
    AuthAdmin(admin): AuthAdmin,
    ValidatedJson(req): ValidatedJson<DeleteOrganizationRequest>,
) -> Result<impl IntoResponse, AppError> {
    let record = state
        .lifecycle
        .delete_organization(&req.organization_name, &admin.organization_name)
        .await?;

    Ok(Json(ApiResponse::ok(
        format!("Organization '{}' deleted successfully", record.name),
        DeletedOrganizationResponse {
            organization_name: record.name,
            deleted_collection: record.namespace,
        },
    )))
}
