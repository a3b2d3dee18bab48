use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A tenant as the master registry sees it.
///
/// `namespace` is always `"org_" + name`; both are only ever changed together by
/// the rename migration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrganizationRecord {
    /// MongoDB document ID (UUID string)
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "organization_name")]
    pub name: String,
    #[serde(rename = "collection_name")]
    pub namespace: String,
    /// Id of the admin document inside `namespace`
    pub admin_id: String,
    /// Cached copy of the admin's email; the tenant namespace is authoritative
    pub admin_email: String,
    #[serde(with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub updated_at: DateTime<Utc>,
    #[serde(rename = "is_active")]
    pub active: bool,
}

impl OrganizationRecord {
    pub fn new(name: String, namespace: String, admin_id: String, admin_email: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            name,
            namespace,
            admin_id,
            admin_email,
            created_at: now,
            updated_at: now,
            active: true,
        }
    }
}
