//! Master registry of organizations.
//!
//! One record per tenant, keyed by organization name. Insert-time uniqueness is
//! the authoritative gate for both the name and the admin email: callers may
//! pre-check with [`MasterRegistry::exists_by_name`], but a concurrent writer can
//! still lose at [`MasterRegistry::create`] or [`MasterRegistry::update`] with
//! `Conflict`.

use async_trait::async_trait;
use chrono::Utc;
use futures::TryStreamExt;
use mongodb::{
    bson::{doc, DateTime as BsonDateTime},
    options::{FindOptions, IndexOptions},
    Collection, IndexModel,
};
use tokio::sync::RwLock;

use super::database::MongoDb;
use super::error::{is_duplicate_key, ServiceError};
use crate::models::OrganizationRecord;

const NAME_INDEX: &str = "organization_name_unique";
const ADMIN_EMAIL_INDEX: &str = "admin_email_unique";

#[async_trait]
pub trait MasterRegistry: Send + Sync {
    /// Persist a new record. Fails with `Conflict` if the name or admin email is taken.
    async fn create(&self, record: &OrganizationRecord) -> Result<(), ServiceError>;

    async fn find_by_name(&self, name: &str) -> Result<Option<OrganizationRecord>, ServiceError>;

    async fn find_by_admin_email(
        &self,
        email: &str,
    ) -> Result<Option<OrganizationRecord>, ServiceError>;

    async fn exists_by_name(&self, name: &str) -> Result<bool, ServiceError>;

    /// Rekey the record for `old_name`, refreshing `updated_at`.
    ///
    /// Fails with `NotFound` if `old_name` is absent and with `Conflict` if
    /// `new_name` or `new_admin_email` belongs to another record.
    async fn update(
        &self,
        old_name: &str,
        new_name: &str,
        new_namespace: &str,
        new_admin_email: Option<&str>,
    ) -> Result<(), ServiceError>;

    /// Remove the record. Returns `false` when there was nothing to remove.
    async fn delete(&self, name: &str) -> Result<bool, ServiceError>;

    async fn list_all(&self) -> Result<Vec<OrganizationRecord>, ServiceError>;

    async fn health_check(&self) -> Result<(), ServiceError>;
}

fn name_conflict(name: &str) -> ServiceError {
    ServiceError::Conflict(format!("Organization '{}' already exists", name))
}

fn email_conflict(email: &str) -> ServiceError {
    ServiceError::Conflict(format!(
        "Admin email '{}' is already registered to another organization",
        email
    ))
}

fn not_found(name: &str) -> ServiceError {
    ServiceError::NotFound(format!("Organization '{}' not found", name))
}

/// Registry backed by the master MongoDB collection.
#[derive(Clone)]
pub struct MongoRegistry {
    db: MongoDb,
    collection: Collection<OrganizationRecord>,
}

impl MongoRegistry {
    pub fn new(db: MongoDb, collection_name: &str) -> Self {
        let collection = db.collection(collection_name);
        Self { db, collection }
    }

    pub async fn initialize_indexes(&self) -> Result<(), ServiceError> {
        tracing::info!("Creating MongoDB indexes for master registry");

        let name_index = IndexModel::builder()
            .keys(doc! { "organization_name": 1 })
            .options(
                IndexOptions::builder()
                    .name(NAME_INDEX.to_string())
                    .unique(true)
                    .build(),
            )
            .build();

        self.collection
            .create_index(name_index, None)
            .await
            .map_err(|e| {
                tracing::error!("Failed to create organization_name index: {}", e);
                ServiceError::from(e)
            })?;

        let email_index = IndexModel::builder()
            .keys(doc! { "admin_email": 1 })
            .options(
                IndexOptions::builder()
                    .name(ADMIN_EMAIL_INDEX.to_string())
                    .unique(true)
                    .build(),
            )
            .build();

        self.collection
            .create_index(email_index, None)
            .await
            .map_err(|e| {
                tracing::error!("Failed to create admin_email index: {}", e);
                ServiceError::from(e)
            })?;

        tracing::info!("Created unique indexes on organization_name and admin_email");
        Ok(())
    }

    /// Translate a unique index violation into the matching `Conflict`.
    fn map_write_error(err: mongodb::error::Error, name: &str, email: Option<&str>) -> ServiceError {
        if !is_duplicate_key(&err) {
            return ServiceError::from(err);
        }
        match email {
            Some(email) if err.to_string().contains(ADMIN_EMAIL_INDEX) => email_conflict(email),
            _ => name_conflict(name),
        }
    }
}

#[async_trait]
impl MasterRegistry for MongoRegistry {
    async fn create(&self, record: &OrganizationRecord) -> Result<(), ServiceError> {
        self.collection
            .insert_one(record, None)
            .await
            .map_err(|e| Self::map_write_error(e, &record.name, Some(&record.admin_email)))?;
        Ok(())
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<OrganizationRecord>, ServiceError> {
        Ok(self
            .collection
            .find_one(doc! { "organization_name": name }, None)
            .await?)
    }

    async fn find_by_admin_email(
        &self,
        email: &str,
    ) -> Result<Option<OrganizationRecord>, ServiceError> {
        Ok(self
            .collection
            .find_one(doc! { "admin_email": email }, None)
            .await?)
    }

    async fn exists_by_name(&self, name: &str) -> Result<bool, ServiceError> {
        let count = self
            .collection
            .count_documents(doc! { "organization_name": name }, None)
            .await?;
        Ok(count > 0)
    }

    async fn update(
        &self,
        old_name: &str,
        new_name: &str,
        new_namespace: &str,
        new_admin_email: Option<&str>,
    ) -> Result<(), ServiceError> {
        let mut set = doc! {
            "organization_name": new_name,
            "collection_name": new_namespace,
            "updated_at": BsonDateTime::from_chrono(Utc::now()),
        };
        if let Some(email) = new_admin_email {
            set.insert("admin_email", email);
        }

        let result = self
            .collection
            .update_one(doc! { "organization_name": old_name }, doc! { "$set": set }, None)
            .await
            .map_err(|e| Self::map_write_error(e, new_name, new_admin_email))?;

        if result.matched_count == 0 {
            return Err(not_found(old_name));
        }
        Ok(())
    }

    async fn delete(&self, name: &str) -> Result<bool, ServiceError> {
        let result = self
            .collection
            .delete_one(doc! { "organization_name": name }, None)
            .await?;
        Ok(result.deleted_count > 0)
    }

    async fn list_all(&self) -> Result<Vec<OrganizationRecord>, ServiceError> {
        let options = FindOptions::builder().sort(doc! { "created_at": 1 }).build();
        let cursor = self.collection.find(None, options).await?;
        Ok(cursor.try_collect().await?)
    }

    async fn health_check(&self) -> Result<(), ServiceError> {
        self.db
            .health_check()
            .await
            .map_err(|e| ServiceError::Internal(anyhow::anyhow!(e.to_string())))
    }
}

/// Insertion-ordered registry held in process memory.
#[derive(Default)]
pub struct InMemoryRegistry {
    records: RwLock<Vec<OrganizationRecord>>,
}

impl InMemoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MasterRegistry for InMemoryRegistry {
    async fn create(&self, record: &OrganizationRecord) -> Result<(), ServiceError> {
        let mut records = self.records.write().await;
        if records.iter().any(|r| r.name == record.name) {
            return Err(name_conflict(&record.name));
        }
        if records.iter().any(|r| r.admin_email == record.admin_email) {
            return Err(email_conflict(&record.admin_email));
        }
        records.push(record.clone());
        Ok(())
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<OrganizationRecord>, ServiceError> {
        let records = self.records.read().await;
        Ok(records.iter().find(|r| r.name == name).cloned())
    }

    async fn find_by_admin_email(
        &self,
        email: &str,
    ) -> Result<Option<OrganizationRecord>, ServiceError> {
        let records = self.records.read().await;
        Ok(records.iter().find(|r| r.admin_email == email).cloned())
    }

    async fn exists_by_name(&self, name: &str) -> Result<bool, ServiceError> {
        let records = self.records.read().await;
        Ok(records.iter().any(|r| r.name == name))
    }

    async fn update(
        &self,
        old_name: &str,
        new_name: &str,
        new_namespace: &str,
        new_admin_email: Option<&str>,
    ) -> Result<(), ServiceError> {
        let mut records = self.records.write().await;
        let position = records
            .iter()
            .position(|r| r.name == old_name)
            .ok_or_else(|| not_found(old_name))?;

        let others = || {
            records
                .iter()
                .enumerate()
                .filter(move |(i, _)| *i != position)
                .map(|(_, r)| r)
        };
        if others().any(|r| r.name == new_name) {
            return Err(name_conflict(new_name));
        }
        if let Some(email) = new_admin_email {
            if others().any(|r| r.admin_email == email) {
                return Err(email_conflict(email));
            }
        }

        let record = &mut records[position];
        record.name = new_name.to_string();
        record.namespace = new_namespace.to_string();
        if let Some(email) = new_admin_email {
            record.admin_email = email.to_string();
        }
        record.updated_at = Utc::now();
        Ok(())
    }

    async fn delete(&self, name: &str) -> Result<bool, ServiceError> {
        let mut records = self.records.write().await;
        let before = records.len();
        records.retain(|r| r.name != name);
        Ok(records.len() < before)
    }

    async fn list_all(&self) -> Result<Vec<OrganizationRecord>, ServiceError> {
        Ok(self.records.read().await.clone())
    }

    async fn health_check(&self) -> Result<(), ServiceError> {
        Ok(())
    }
}
