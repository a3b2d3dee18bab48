use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::models::OrganizationRecord;
use crate::utils::validate_org_name;

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateOrganizationRequest {
    #[validate(custom(function = "validate_org_name"))]
    #[schema(example = "acme_corp")]
    pub organization_name: String,
    #[validate(email(message = "Invalid email format"))]
    #[schema(example = "admin@acme.com")]
    pub email: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    #[schema(example = "TestPass123!")]
    pub password: String,
}

/// Rename and/or change the admin credentials of an organization.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct UpdateOrganizationRequest {
    #[validate(length(min = 1, message = "Current organization name is required"))]
    pub old_organization_name: String,
    #[validate(custom(function = "validate_org_name"))]
    pub new_organization_name: Option<String>,
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct DeleteOrganizationRequest {
    #[validate(length(min = 1, message = "Organization name is required"))]
    pub organization_name: String,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct GetOrganizationQuery {
    /// Organization name to retrieve
    pub organization_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct OrganizationResponse {
    pub organization_name: String,
    #[schema(example = "org_acme_corp")]
    pub collection_name: String,
    pub admin_email: String,
    pub admin_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub is_active: bool,
}

impl From<OrganizationRecord> for OrganizationResponse {
    fn from(record: OrganizationRecord) -> Self {
        Self {
            organization_name: record.name,
            collection_name: record.namespace,
            admin_email: record.admin_email,
            admin_id: record.admin_id,
            created_at: record.created_at,
            updated_at: record.updated_at,
            is_active: record.active,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DeletedOrganizationResponse {
    pub organization_name: String,
    pub deleted_collection: String,
}
