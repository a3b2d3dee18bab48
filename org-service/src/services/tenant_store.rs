//! Per-tenant storage namespaces.
//!
//! Every organization owns one namespace named `org_<name>`. The namespace holds
//! the organization's admin document plus any tenant data; the rename migration
//! moves it wholesale with [`TenantStore::copy_all_documents`] followed by
//! [`TenantStore::drop_namespace`].

use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{
    bson::{self, doc, Document},
    options::{IndexOptions, ReplaceOptions},
    Collection, IndexModel,
};
use std::collections::BTreeMap;
use tokio::sync::RwLock;

use super::database::MongoDb;
use super::error::{is_duplicate_key, ServiceError};
use crate::models::AdminAccount;

pub const NAMESPACE_PREFIX: &str = "org_";

const EMAIL_FIELD: &str = "email";
const DIGEST_FIELD: &str = "hashed_password";
const ORG_NAME_FIELD: &str = "organization_name";

/// Storage namespace owned by the organization `name`.
pub fn namespace_for(name: &str) -> String {
    format!("{}{}", NAMESPACE_PREFIX, name)
}

/// In-place changes to an admin document.
#[derive(Debug, Clone, Default)]
pub struct AdminPatch {
    pub email: Option<String>,
    pub password_digest: Option<String>,
}

impl AdminPatch {
    pub fn is_empty(&self) -> bool {
        self.email.is_none() && self.password_digest.is_none()
    }
}

/// Field rewrite applied to every document moved by a rename.
///
/// Credentials are rewritten only on the admin document itself. The
/// organization name is rewritten on any document that carries it, so tenant
/// data documents keep their own shape.
#[derive(Debug, Clone)]
pub struct DocumentRewrite {
    pub admin_id: String,
    pub email: Option<String>,
    pub password_digest: Option<String>,
    pub organization_name: String,
}

impl DocumentRewrite {
    pub fn apply(&self, mut document: Document) -> Document {
        if has_str(&document, "_id", &self.admin_id) {
            if let Some(email) = &self.email {
                document.insert(EMAIL_FIELD, email.as_str());
            }
            if let Some(digest) = &self.password_digest {
                document.insert(DIGEST_FIELD, digest.as_str());
            }
        }
        if document.contains_key(ORG_NAME_FIELD) {
            document.insert(ORG_NAME_FIELD, self.organization_name.as_str());
        }
        document
    }
}

#[async_trait]
pub trait TenantStore: Send + Sync {
    /// Make sure `namespace` exists. Safe to call repeatedly.
    async fn ensure(&self, namespace: &str) -> Result<(), ServiceError>;

    async fn insert_admin(
        &self,
        namespace: &str,
        account: &AdminAccount,
    ) -> Result<String, ServiceError>;

    async fn find_admin_by_email(
        &self,
        namespace: &str,
        email: &str,
    ) -> Result<Option<AdminAccount>, ServiceError>;

    async fn find_admin_by_id(
        &self,
        namespace: &str,
        id: &str,
    ) -> Result<Option<AdminAccount>, ServiceError>;

    /// Fails with `NotFound` if no admin with `id` lives in `namespace`.
    async fn update_admin_fields(
        &self,
        namespace: &str,
        id: &str,
        patch: &AdminPatch,
    ) -> Result<(), ServiceError>;

    async fn delete_admin(&self, namespace: &str, id: &str) -> Result<bool, ServiceError>;

    /// Copy every document of `source` into `target`, rewritten by `rewrite`.
    ///
    /// Writes are upserts keyed by `_id`, so a copy interrupted part way can be
    /// run again. Returns the number of documents copied.
    async fn copy_all_documents(
        &self,
        source: &str,
        target: &str,
        rewrite: &DocumentRewrite,
    ) -> Result<u64, ServiceError>;

    /// Irreversibly destroy `namespace` and everything in it.
    async fn drop_namespace(&self, namespace: &str) -> Result<(), ServiceError>;

    /// Names of all tenant namespaces currently present in storage.
    async fn list_namespaces(&self) -> Result<Vec<String>, ServiceError>;
}

fn admin_not_found() -> ServiceError {
    ServiceError::NotFound("Admin not found".to_string())
}

fn duplicate_admin(email: &str) -> ServiceError {
    ServiceError::Conflict(format!("Admin email '{}' already exists", email))
}

fn to_document(account: &AdminAccount) -> Result<Document, ServiceError> {
    bson::to_document(account)
        .map_err(|e| ServiceError::Internal(anyhow::anyhow!("failed to encode admin: {}", e)))
}

fn from_document(document: Document) -> Result<AdminAccount, ServiceError> {
    bson::from_document(document)
        .map_err(|e| ServiceError::Internal(anyhow::anyhow!("failed to decode admin: {}", e)))
}

/// One MongoDB collection per tenant inside the master database.
#[derive(Clone)]
pub struct MongoTenantStore {
    db: MongoDb,
}

impl MongoTenantStore {
    pub fn new(db: MongoDb) -> Self {
        Self { db }
    }

    fn admins(&self, namespace: &str) -> Collection<AdminAccount> {
        self.db.collection(namespace)
    }

    fn raw(&self, namespace: &str) -> Collection<Document> {
        self.db.collection(namespace)
    }
}

#[async_trait]
impl TenantStore for MongoTenantStore {
    async fn ensure(&self, namespace: &str) -> Result<(), ServiceError> {
        // Creating the index creates the collection. Sparse so tenant data
        // documents without an email are unaffected.
        let email_index = IndexModel::builder()
            .keys(doc! { "email": 1 })
            .options(
                IndexOptions::builder()
                    .name("email_unique".to_string())
                    .unique(true)
                    .sparse(true)
                    .build(),
            )
            .build();

        self.raw(namespace)
            .create_index(email_index, None)
            .await
            .map_err(|e| {
                tracing::error!(namespace = %namespace, "Failed to prepare tenant namespace: {}", e);
                ServiceError::from(e)
            })?;
        Ok(())
    }

    async fn insert_admin(
        &self,
        namespace: &str,
        account: &AdminAccount,
    ) -> Result<String, ServiceError> {
        self.admins(namespace)
            .insert_one(account, None)
            .await
            .map_err(|e| {
                if is_duplicate_key(&e) {
                    duplicate_admin(&account.email)
                } else {
                    ServiceError::from(e)
                }
            })?;
        Ok(account.id.clone())
    }

    async fn find_admin_by_email(
        &self,
        namespace: &str,
        email: &str,
    ) -> Result<Option<AdminAccount>, ServiceError> {
        Ok(self
            .admins(namespace)
            .find_one(doc! { "email": email }, None)
            .await?)
    }

    async fn find_admin_by_id(
        &self,
        namespace: &str,
        id: &str,
    ) -> Result<Option<AdminAccount>, ServiceError> {
        Ok(self
            .admins(namespace)
            .find_one(doc! { "_id": id }, None)
            .await?)
    }

    async fn update_admin_fields(
        &self,
        namespace: &str,
        id: &str,
        patch: &AdminPatch,
    ) -> Result<(), ServiceError> {
        let mut set = Document::new();
        if let Some(email) = &patch.email {
            set.insert(EMAIL_FIELD, email.as_str());
        }
        if let Some(digest) = &patch.password_digest {
            set.insert(DIGEST_FIELD, digest.as_str());
        }
        if set.is_empty() {
            return Ok(());
        }

        let result = self
            .raw(namespace)
            .update_one(doc! { "_id": id }, doc! { "$set": set }, None)
            .await
            .map_err(|e| match (&patch.email, is_duplicate_key(&e)) {
                (Some(email), true) => duplicate_admin(email),
                _ => ServiceError::from(e),
            })?;

        if result.matched_count == 0 {
            return Err(admin_not_found());
        }
        Ok(())
    }

    async fn delete_admin(&self, namespace: &str, id: &str) -> Result<bool, ServiceError> {
        let result = self
            .raw(namespace)
            .delete_one(doc! { "_id": id }, None)
            .await?;
        Ok(result.deleted_count > 0)
    }

    async fn copy_all_documents(
        &self,
        source: &str,
        target: &str,
        rewrite: &DocumentRewrite,
    ) -> Result<u64, ServiceError> {
        let target_collection = self.raw(target);
        let mut cursor = self.raw(source).find(None, None).await?;
        let mut copied = 0u64;

        while let Some(document) = cursor.try_next().await? {
            let document = rewrite.apply(document);
            match document.get("_id").cloned() {
                Some(id) => {
                    target_collection
                        .replace_one(
                            doc! { "_id": id },
                            &document,
                            ReplaceOptions::builder().upsert(true).build(),
                        )
                        .await?;
                }
                None => {
                    target_collection.insert_one(&document, None).await?;
                }
            }
            copied += 1;
        }

        Ok(copied)
    }

    async fn drop_namespace(&self, namespace: &str) -> Result<(), ServiceError> {
        self.raw(namespace).drop(None).await?;
        Ok(())
    }

    async fn list_namespaces(&self) -> Result<Vec<String>, ServiceError> {
        let filter = doc! { "name": { "$regex": format!("^{}", NAMESPACE_PREFIX) } };
        Ok(self.db.database().list_collection_names(filter).await?)
    }
}

/// Namespaces held in process memory as raw BSON documents.
#[derive(Default)]
pub struct InMemoryTenantStore {
    namespaces: RwLock<BTreeMap<String, Vec<Document>>>,
}

impl InMemoryTenantStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw documents of a namespace, for inspection in tests.
    pub async fn documents(&self, namespace: &str) -> Vec<Document> {
        self.namespaces
            .read()
            .await
            .get(namespace)
            .cloned()
            .unwrap_or_default()
    }

    /// Insert an arbitrary tenant document.
    pub async fn insert_document(&self, namespace: &str, document: Document) {
        self.namespaces
            .write()
            .await
            .entry(namespace.to_string())
            .or_default()
            .push(document);
    }
}

fn has_str(document: &Document, key: &str, value: &str) -> bool {
    document.get_str(key).map(|v| v == value).unwrap_or(false)
}

#[async_trait]
impl TenantStore for InMemoryTenantStore {
    async fn ensure(&self, namespace: &str) -> Result<(), ServiceError> {
        self.namespaces
            .write()
            .await
            .entry(namespace.to_string())
            .or_default();
        Ok(())
    }

    async fn insert_admin(
        &self,
        namespace: &str,
        account: &AdminAccount,
    ) -> Result<String, ServiceError> {
        let document = to_document(account)?;
        let mut namespaces = self.namespaces.write().await;
        let documents = namespaces.entry(namespace.to_string()).or_default();
        if documents
            .iter()
            .any(|d| has_str(d, EMAIL_FIELD, &account.email))
        {
            return Err(duplicate_admin(&account.email));
        }
        documents.push(document);
        Ok(account.id.clone())
    }

    async fn find_admin_by_email(
        &self,
        namespace: &str,
        email: &str,
    ) -> Result<Option<AdminAccount>, ServiceError> {
        let namespaces = self.namespaces.read().await;
        namespaces
            .get(namespace)
            .and_then(|docs| docs.iter().find(|d| has_str(d, EMAIL_FIELD, email)))
            .cloned()
            .map(from_document)
            .transpose()
    }

    async fn find_admin_by_id(
        &self,
        namespace: &str,
        id: &str,
    ) -> Result<Option<AdminAccount>, ServiceError> {
        let namespaces = self.namespaces.read().await;
        namespaces
            .get(namespace)
            .and_then(|docs| docs.iter().find(|d| has_str(d, "_id", id)))
            .cloned()
            .map(from_document)
            .transpose()
    }

    async fn update_admin_fields(
        &self,
        namespace: &str,
        id: &str,
        patch: &AdminPatch,
    ) -> Result<(), ServiceError> {
        let mut namespaces = self.namespaces.write().await;
        let documents = namespaces.get_mut(namespace).ok_or_else(admin_not_found)?;
        let position = documents
            .iter()
            .position(|d| has_str(d, "_id", id))
            .ok_or_else(admin_not_found)?;

        if let Some(email) = &patch.email {
            let taken = documents
                .iter()
                .any(|d| !has_str(d, "_id", id) && has_str(d, EMAIL_FIELD, email));
            if taken {
                return Err(duplicate_admin(email));
            }
        }

        let document = &mut documents[position];
        if let Some(email) = &patch.email {
            document.insert(EMAIL_FIELD, email.as_str());
        }
        if let Some(digest) = &patch.password_digest {
            document.insert(DIGEST_FIELD, digest.as_str());
        }
        Ok(())
    }

    async fn delete_admin(&self, namespace: &str, id: &str) -> Result<bool, ServiceError> {
        let mut namespaces = self.namespaces.write().await;
        let Some(documents) = namespaces.get_mut(namespace) else {
            return Ok(false);
        };
        let before = documents.len();
        documents.retain(|d| !has_str(d, "_id", id));
        Ok(documents.len() < before)
    }

    async fn copy_all_documents(
        &self,
        source: &str,
        target: &str,
        rewrite: &DocumentRewrite,
    ) -> Result<u64, ServiceError> {
        let mut namespaces = self.namespaces.write().await;
        let source_documents = namespaces.get(source).cloned().unwrap_or_default();
        let target_documents = namespaces.entry(target.to_string()).or_default();

        for document in source_documents.iter().cloned() {
            let document = rewrite.apply(document);
            let existing = document.get("_id").and_then(|id| {
                target_documents
                    .iter()
                    .position(|d| d.get("_id") == Some(id))
            });
            match existing {
                Some(index) => target_documents[index] = document,
                None => target_documents.push(document),
            }
        }

        Ok(source_documents.len() as u64)
    }

    async fn drop_namespace(&self, namespace: &str) -> Result<(), ServiceError> {
        self.namespaces.write().await.remove(namespace);
        Ok(())
    }

    async fn list_namespaces(&self) -> Result<Vec<String>, ServiceError> {
        Ok(self
            .namespaces
            .read()
            .await
            .keys()
            .filter(|name| name.starts_with(NAMESPACE_PREFIX))
            .cloned()
            .collect())
    }
}
