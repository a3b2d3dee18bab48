use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The single administrator document stored inside a tenant namespace.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AdminAccount {
    #[serde(rename = "_id")]
    pub id: String,
    pub email: String,
    #[serde(rename = "hashed_password")]
    pub password_digest: String,
    pub organization_name: String,
    #[serde(rename = "is_active")]
    pub active: bool,
    #[serde(with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
}

impl AdminAccount {
    pub fn new(email: String, password_digest: String, organization_name: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            email,
            password_digest,
            organization_name,
            active: true,
            created_at: Utc::now(),
        }
    }
}
