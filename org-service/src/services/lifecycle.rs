//! Organization lifecycle: create, rename (with namespace migration) and delete.
//!
//! There is no transaction spanning the registry and the tenant namespaces.
//! Consistency comes from write order alone:
//!
//! * create writes the admin document before the registry record, so a crash
//!   leaves an invisible namespace rather than a record pointing at nothing;
//! * an update that keeps the name writes the registry first, since it holds
//!   the unique email gate, and restores it if the tenant write fails;
//! * rename copies into the new namespace, drops the old one, then rekeys the
//!   registry;
//! * delete drops the namespace before removing the record.
//!
//! A crash inside a rename can leave both namespaces present or the registry
//! pointing at the old one. [`OrgLifecycleManager::orphaned_namespaces`]
//! reports namespaces no record points at.

use std::collections::HashSet;
use std::sync::Arc;
use validator::Validate;

use super::error::ServiceError;
use super::metrics::record_lifecycle_operation;
use super::registry::MasterRegistry;
use super::tenant_store::{namespace_for, AdminPatch, DocumentRewrite, TenantStore};
use crate::dtos::org::{CreateOrganizationRequest, UpdateOrganizationRequest};
use crate::models::{AdminAccount, OrganizationRecord};
use crate::utils::{normalize_email, normalize_org_name, Password, PasswordHasher};

#[derive(Clone)]
pub struct OrgLifecycleManager {
    registry: Arc<dyn MasterRegistry>,
    tenants: Arc<dyn TenantStore>,
    hasher: Arc<dyn PasswordHasher>,
}

fn org_not_found(name: &str) -> ServiceError {
    ServiceError::NotFound(format!("Organization '{}' not found", name))
}

fn org_exists(name: &str) -> ServiceError {
    ServiceError::Conflict(format!("Organization '{}' already exists", name))
}

fn email_taken(email: &str) -> ServiceError {
    ServiceError::Conflict(format!(
        "Admin email '{}' is already registered to another organization",
        email
    ))
}

fn observe<T>(operation: &'static str, result: &Result<T, ServiceError>) {
    match result {
        Ok(_) => record_lifecycle_operation(operation, "success"),
        Err(e) => {
            tracing::warn!(operation = operation, error = %e, "Lifecycle operation failed");
            record_lifecycle_operation(operation, e.outcome());
        }
    }
}

impl OrgLifecycleManager {
    pub fn new(
        registry: Arc<dyn MasterRegistry>,
        tenants: Arc<dyn TenantStore>,
        hasher: Arc<dyn PasswordHasher>,
    ) -> Self {
        Self {
            registry,
            tenants,
            hasher,
        }
    }

    pub async fn create_organization(
        &self,
        req: CreateOrganizationRequest,
    ) -> Result<OrganizationRecord, ServiceError> {
        let result = self.create(req).await;
        observe("create", &result);
        result
    }

    async fn create(
        &self,
        req: CreateOrganizationRequest,
    ) -> Result<OrganizationRecord, ServiceError> {
        req.validate()?;
        let name = normalize_org_name(&req.organization_name);
        let email = normalize_email(&req.email);

        if self.registry.exists_by_name(&name).await? {
            return Err(org_exists(&name));
        }
        if self.registry.find_by_admin_email(&email).await?.is_some() {
            return Err(email_taken(&email));
        }

        let namespace = namespace_for(&name);
        let digest = self.hasher.hash(&Password::new(req.password))?;

        self.tenants.ensure(&namespace).await?;
        let admin = AdminAccount::new(email.clone(), digest, name.clone());
        let admin_id = self.tenants.insert_admin(&namespace, &admin).await?;

        let record = OrganizationRecord::new(name, namespace, admin_id, email);
        if let Err(e) = self.registry.create(&record).await {
            self.compensate_failed_create(&record, &e).await;
            return Err(e);
        }

        tracing::info!(
            organization = %record.name,
            namespace = %record.namespace,
            admin_id = %record.admin_id,
            "Organization created"
        );
        Ok(record)
    }

    /// Undo the admin insert of a create that lost the registry race. The
    /// namespace itself is left alone since the winner may be using it.
    async fn compensate_failed_create(&self, record: &OrganizationRecord, cause: &ServiceError) {
        if !matches!(cause, ServiceError::Conflict(_)) {
            tracing::error!(
                organization = %record.name,
                namespace = %record.namespace,
                admin_id = %record.admin_id,
                error = %cause,
                "Registry write failed after admin insert; namespace may be orphaned"
            );
            return;
        }

        match self
            .tenants
            .delete_admin(&record.namespace, &record.admin_id)
            .await
        {
            Ok(_) => tracing::warn!(
                organization = %record.name,
                admin_id = %record.admin_id,
                "Lost create race; removed inserted admin"
            ),
            Err(e) => tracing::error!(
                organization = %record.name,
                admin_id = %record.admin_id,
                error = %e,
                "Failed to remove admin after lost create race"
            ),
        }
    }

    pub async fn get_organization(&self, name: &str) -> Result<OrganizationRecord, ServiceError> {
        let name = normalize_org_name(name);
        self.registry
            .find_by_name(&name)
            .await?
            .ok_or_else(|| org_not_found(&name))
    }

    pub async fn list_organizations(&self) -> Result<Vec<OrganizationRecord>, ServiceError> {
        self.registry.list_all().await
    }

    /// Rename an organization and/or change its admin credentials.
    ///
    /// `requesting_org` is the organization of the authenticated caller; admins
    /// may only modify their own organization. A rename invalidates tokens
    /// issued under the old name.
    pub async fn rename_organization(
        &self,
        req: UpdateOrganizationRequest,
        requesting_org: &str,
    ) -> Result<OrganizationRecord, ServiceError> {
        let result = self.rename(req, requesting_org).await;
        observe("rename", &result);
        result
    }

    async fn rename(
        &self,
        req: UpdateOrganizationRequest,
        requesting_org: &str,
    ) -> Result<OrganizationRecord, ServiceError> {
        req.validate()?;
        let old_name = normalize_org_name(&req.old_organization_name);

        if requesting_org != old_name {
            return Err(ServiceError::Forbidden(
                "You can only update your own organization".to_string(),
            ));
        }

        let record = self
            .registry
            .find_by_name(&old_name)
            .await?
            .ok_or_else(|| org_not_found(&old_name))?;

        let new_name = req
            .new_organization_name
            .as_deref()
            .map(normalize_org_name)
            .unwrap_or_else(|| old_name.clone());

        if new_name != old_name && self.registry.exists_by_name(&new_name).await? {
            return Err(org_exists(&new_name));
        }

        let new_email = req
            .email
            .as_deref()
            .map(normalize_email)
            .filter(|email| *email != record.admin_email);

        if let Some(email) = &new_email {
            if let Some(owner) = self.registry.find_by_admin_email(email).await? {
                if owner.name != old_name {
                    return Err(email_taken(email));
                }
            }
        }

        let new_digest = req
            .password
            .map(|password| self.hasher.hash(&Password::new(password)))
            .transpose()?;

        if new_name == old_name {
            self.update_in_place(&record, new_email, new_digest).await?;
        } else {
            self.migrate(&record, &new_name, new_email, new_digest)
                .await?;
        }

        self.registry
            .find_by_name(&new_name)
            .await?
            .ok_or_else(|| org_not_found(&new_name))
    }

    async fn update_in_place(
        &self,
        record: &OrganizationRecord,
        new_email: Option<String>,
        new_digest: Option<String>,
    ) -> Result<(), ServiceError> {
        let patch = AdminPatch {
            email: new_email,
            password_digest: new_digest,
        };
        if patch.is_empty() {
            tracing::debug!(organization = %record.name, "Update requested no changes");
            return Ok(());
        }

        // The registry write is the unique email gate and must precede the tenant write.
        self.registry
            .update(
                &record.name,
                &record.name,
                &record.namespace,
                patch.email.as_deref(),
            )
            .await?;

        if let Err(e) = self
            .tenants
            .update_admin_fields(&record.namespace, &record.admin_id, &patch)
            .await
        {
            if patch.email.is_some() {
                self.restore_registry_email(record).await;
            }
            return Err(e);
        }

        tracing::info!(
            organization = %record.name,
            admin_id = %record.admin_id,
            email_changed = patch.email.is_some(),
            password_changed = patch.password_digest.is_some(),
            "Organization admin updated"
        );
        Ok(())
    }

    async fn restore_registry_email(&self, record: &OrganizationRecord) {
        if let Err(e) = self
            .registry
            .update(
                &record.name,
                &record.name,
                &record.namespace,
                Some(&record.admin_email),
            )
            .await
        {
            tracing::error!(
                organization = %record.name,
                error = %e,
                "Failed to restore registry email after tenant update failure"
            );
        }
    }

    async fn migrate(
        &self,
        record: &OrganizationRecord,
        new_name: &str,
        new_email: Option<String>,
        new_digest: Option<String>,
    ) -> Result<(), ServiceError> {
        let old_namespace = record.namespace.as_str();
        let new_namespace = namespace_for(new_name);

        tracing::info!(
            organization = %record.name,
            new_organization = %new_name,
            from = %old_namespace,
            to = %new_namespace,
            "Starting namespace migration"
        );

        self.tenants.ensure(&new_namespace).await?;
        let rewrite = DocumentRewrite {
            admin_id: record.admin_id.clone(),
            email: new_email.clone(),
            password_digest: new_digest,
            organization_name: new_name.to_string(),
        };
        let copied = self
            .tenants
            .copy_all_documents(old_namespace, &new_namespace, &rewrite)
            .await
            .map_err(|e| {
                tracing::error!(
                    from = %old_namespace,
                    to = %new_namespace,
                    error = %e,
                    "Namespace copy failed; source left intact"
                );
                e
            })?;
        tracing::info!(from = %old_namespace, to = %new_namespace, copied, "Namespace copied");

        self.tenants
            .drop_namespace(old_namespace)
            .await
            .map_err(|e| {
                tracing::error!(
                    namespace = %old_namespace,
                    error = %e,
                    "Failed to drop old namespace after copy; both namespaces exist"
                );
                e
            })?;
        tracing::info!(namespace = %old_namespace, "Old namespace dropped");

        self.registry
            .update(&record.name, new_name, &new_namespace, new_email.as_deref())
            .await
            .map_err(|e| {
                tracing::error!(
                    organization = %record.name,
                    new_organization = %new_name,
                    namespace = %new_namespace,
                    error = %e,
                    "Registry update failed after namespace migration"
                );
                e
            })?;

        tracing::info!(
            organization = %new_name,
            namespace = %new_namespace,
            previous = %record.name,
            "Organization renamed"
        );
        Ok(())
    }

    /// Delete an organization. Returns the record that was removed.
    pub async fn delete_organization(
        &self,
        name: &str,
        requesting_org: &str,
    ) -> Result<OrganizationRecord, ServiceError> {
        let result = self.delete(name, requesting_org).await;
        observe("delete", &result);
        result
    }

    async fn delete(
        &self,
        name: &str,
        requesting_org: &str,
    ) -> Result<OrganizationRecord, ServiceError> {
        let name = normalize_org_name(name);
        if requesting_org != name {
            return Err(ServiceError::Forbidden(
                "You can only delete your own organization".to_string(),
            ));
        }

        let record = self
            .registry
            .find_by_name(&name)
            .await?
            .ok_or_else(|| org_not_found(&name))?;

        self.tenants.drop_namespace(&record.namespace).await?;
        if !self.registry.delete(&name).await? {
            tracing::warn!(organization = %name, "Registry record already gone during delete");
        }

        tracing::info!(
            organization = %record.name,
            namespace = %record.namespace,
            "Organization deleted"
        );
        Ok(record)
    }

    /// Tenant namespaces present in storage that no registry record points at.
    /// Read-only; dropping them is left to an operator.
    pub async fn orphaned_namespaces(&self) -> Result<Vec<String>, ServiceError> {
        let owned: HashSet<String> = self
            .registry
            .list_all()
            .await?
            .into_iter()
            .map(|record| record.namespace)
            .collect();

        let mut orphans: Vec<String> = self
            .tenants
            .list_namespaces()
            .await?
            .into_iter()
            .filter(|namespace| !owned.contains(namespace))
            .collect();
        orphans.sort();
        Ok(orphans)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::error::ErrorKind;
    use crate::services::registry::InMemoryRegistry;
    use crate::services::tenant_store::InMemoryTenantStore;
    use crate::utils::Argon2Hasher;
    use mongodb::bson::doc;

    struct Fixture {
        manager: OrgLifecycleManager,
        registry: Arc<InMemoryRegistry>,
        tenants: Arc<InMemoryTenantStore>,
        hasher: Arc<Argon2Hasher>,
    }

    fn fixture() -> Fixture {
        let registry = Arc::new(InMemoryRegistry::new());
        let tenants = Arc::new(InMemoryTenantStore::new());
        let hasher = Arc::new(Argon2Hasher::with_params(64, 1, 1).unwrap());
        Fixture {
            manager: OrgLifecycleManager::new(registry.clone(), tenants.clone(), hasher.clone()),
            registry,
            tenants,
            hasher,
        }
    }

    /// Registry whose `update` always loses a concurrent email claim.
    struct ContendedRegistry(InMemoryRegistry);

    #[async_trait::async_trait]
    impl MasterRegistry for ContendedRegistry {
        async fn create(&self, record: &OrganizationRecord) -> Result<(), ServiceError> {
            self.0.create(record).await
        }

        async fn find_by_name(
            &self,
            name: &str,
        ) -> Result<Option<OrganizationRecord>, ServiceError> {
            self.0.find_by_name(name).await
        }

        async fn find_by_admin_email(
            &self,
            email: &str,
        ) -> Result<Option<OrganizationRecord>, ServiceError> {
            self.0.find_by_admin_email(email).await
        }

        async fn exists_by_name(&self, name: &str) -> Result<bool, ServiceError> {
            self.0.exists_by_name(name).await
        }

        async fn update(
            &self,
            _old_name: &str,
            _new_name: &str,
            _new_namespace: &str,
            _new_admin_email: Option<&str>,
        ) -> Result<(), ServiceError> {
            Err(ServiceError::Conflict("Admin email already registered".to_string()))
        }

        async fn delete(&self, name: &str) -> Result<bool, ServiceError> {
            self.0.delete(name).await
        }

        async fn list_all(&self) -> Result<Vec<OrganizationRecord>, ServiceError> {
            self.0.list_all().await
        }

        async fn health_check(&self) -> Result<(), ServiceError> {
            self.0.health_check().await
        }
    }

    fn create_req(name: &str, email: &str) -> CreateOrganizationRequest {
        CreateOrganizationRequest {
            organization_name: name.to_string(),
            email: email.to_string(),
            password: "TestPass123!".to_string(),
        }
    }

    fn update_req(old: &str) -> UpdateOrganizationRequest {
        UpdateOrganizationRequest {
            old_organization_name: old.to_string(),
            new_organization_name: None,
            email: None,
            password: None,
        }
    }

    #[tokio::test]
    async fn test_create_writes_admin_and_record() {
        let f = fixture();
        let record = f
            .manager
            .create_organization(create_req("Alpha", "Admin@Alpha.io"))
            .await
            .unwrap();

        assert_eq!(record.name, "alpha");
        assert_eq!(record.namespace, "org_alpha");
        assert_eq!(record.admin_email, "admin@alpha.io");
        assert!(record.active);

        let admin = f
            .tenants
            .find_admin_by_id("org_alpha", &record.admin_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(admin.organization_name, "alpha");
        assert!(f
            .hasher
            .verify(&Password::new("TestPass123!"), &admin.password_digest));
    }

    #[tokio::test]
    async fn test_create_conflicts() {
        let f = fixture();
        f.manager
            .create_organization(create_req("alpha", "a@alpha.io"))
            .await
            .unwrap();

        let err = f
            .manager
            .create_organization(create_req("ALPHA", "other@alpha.io"))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Conflict);

        let err = f
            .manager
            .create_organization(create_req("beta", "a@alpha.io"))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Conflict);

        assert_eq!(f.registry.list_all().await.unwrap().len(), 1);
        assert_eq!(f.tenants.documents("org_alpha").await.len(), 1);
    }

    #[tokio::test]
    async fn test_create_rejects_invalid_input_before_storage() {
        let f = fixture();
        let err = f
            .manager
            .create_organization(create_req("a-b", "a@alpha.io"))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert!(f.tenants.list_namespaces().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_lost_create_race_removes_inserted_admin() {
        let f = fixture();
        // Simulate the winner registering between our pre-check and our insert
        let winner = OrganizationRecord::new(
            "alpha".to_string(),
            "org_alpha".to_string(),
            "winner-admin".to_string(),
            "winner@alpha.io".to_string(),
        );
        let loser = OrganizationRecord::new(
            "alpha".to_string(),
            "org_alpha".to_string(),
            "loser-admin".to_string(),
            "loser@alpha.io".to_string(),
        );
        f.registry.create(&winner).await.unwrap();
        f.tenants
            .insert_document("org_alpha", doc! { "_id": "loser-admin", "email": "loser@alpha.io" })
            .await;

        let err = f.registry.create(&loser).await.unwrap_err();
        f.manager.compensate_failed_create(&loser, &err).await;

        let remaining = f.tenants.documents("org_alpha").await;
        assert!(remaining.is_empty());
        assert_eq!(f.registry.list_all().await.unwrap(), vec![winner]);
    }

    #[tokio::test]
    async fn test_rename_migrates_namespace() {
        let f = fixture();
        let created = f
            .manager
            .create_organization(create_req("alpha", "a@alpha.io"))
            .await
            .unwrap();
        f.tenants
            .insert_document("org_alpha", doc! { "_id": "d1", "organization_name": "alpha", "sku": "X-1" })
            .await;

        let mut req = update_req("alpha");
        req.new_organization_name = Some("Gamma".to_string());
        req.email = Some("g@gamma.io".to_string());
        req.password = Some("NewPass456!".to_string());

        let renamed = f.manager.rename_organization(req, "alpha").await.unwrap();
        assert_eq!(renamed.name, "gamma");
        assert_eq!(renamed.namespace, "org_gamma");
        assert_eq!(renamed.admin_email, "g@gamma.io");
        assert_eq!(renamed.admin_id, created.admin_id);
        assert_eq!(renamed.created_at, created.created_at);

        assert!(f.tenants.documents("org_alpha").await.is_empty());
        assert_eq!(f.tenants.list_namespaces().await.unwrap(), vec!["org_gamma"]);

        let admin = f
            .tenants
            .find_admin_by_email("org_gamma", "g@gamma.io")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(admin.organization_name, "gamma");
        assert!(f
            .hasher
            .verify(&Password::new("NewPass456!"), &admin.password_digest));

        let data = f
            .tenants
            .documents("org_gamma")
            .await
            .into_iter()
            .find(|d| d.get_str("_id").ok() == Some("d1"))
            .unwrap();
        assert_eq!(data.get_str("organization_name").unwrap(), "gamma");
        assert!(!data.contains_key("email"));

        assert!(f.manager.get_organization("alpha").await.is_err());
    }

    #[tokio::test]
    async fn test_rename_in_place_updates_admin_and_registry() {
        let f = fixture();
        let created = f
            .manager
            .create_organization(create_req("alpha", "a@alpha.io"))
            .await
            .unwrap();

        let mut req = update_req("alpha");
        req.email = Some("new@alpha.io".to_string());
        let updated = f.manager.rename_organization(req, "alpha").await.unwrap();

        assert_eq!(updated.namespace, "org_alpha");
        assert_eq!(updated.admin_email, "new@alpha.io");
        assert!(updated.updated_at >= created.updated_at);
        let admin = f
            .tenants
            .find_admin_by_id("org_alpha", &created.admin_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(admin.email, "new@alpha.io");
    }

    #[tokio::test]
    async fn test_in_place_update_losing_email_race_keeps_login() {
        let registry = Arc::new(ContendedRegistry(InMemoryRegistry::new()));
        let tenants = Arc::new(InMemoryTenantStore::new());
        let hasher = Arc::new(Argon2Hasher::with_params(64, 1, 1).unwrap());
        let manager = OrgLifecycleManager::new(registry.clone(), tenants.clone(), hasher.clone());
        let created = manager
            .create_organization(create_req("alpha", "a@alpha.io"))
            .await
            .unwrap();

        let mut req = update_req("alpha");
        req.email = Some("new@alpha.io".to_string());
        req.password = Some("NewPass456!".to_string());
        let err = manager.rename_organization(req, "alpha").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Conflict);

        let record = registry.find_by_name("alpha").await.unwrap().unwrap();
        assert_eq!(record.admin_email, "a@alpha.io");
        let admin = tenants
            .find_admin_by_email("org_alpha", "a@alpha.io")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(admin.id, created.admin_id);
        assert!(hasher.verify(&Password::new("TestPass123!"), &admin.password_digest));
        assert!(tenants
            .find_admin_by_email("org_alpha", "new@alpha.io")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_noop_rename_changes_nothing() {
        let f = fixture();
        let created = f
            .manager
            .create_organization(create_req("alpha", "a@alpha.io"))
            .await
            .unwrap();

        let mut req = update_req("alpha");
        req.new_organization_name = Some("alpha".to_string());
        req.email = Some("A@alpha.io".to_string());
        let same = f.manager.rename_organization(req, "alpha").await.unwrap();

        assert_eq!(same, created);
    }

    #[tokio::test]
    async fn test_rename_guards() {
        let f = fixture();
        f.manager
            .create_organization(create_req("alpha", "a@alpha.io"))
            .await
            .unwrap();
        f.manager
            .create_organization(create_req("beta", "b@beta.io"))
            .await
            .unwrap();

        let err = f
            .manager
            .rename_organization(update_req("alpha"), "beta")
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Forbidden);

        let mut req = update_req("alpha");
        req.new_organization_name = Some("beta".to_string());
        let err = f.manager.rename_organization(req, "alpha").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Conflict);

        let mut req = update_req("alpha");
        req.email = Some("b@beta.io".to_string());
        let err = f.manager.rename_organization(req, "alpha").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Conflict);

        let mut req = update_req("alpha");
        req.password = Some("short".to_string());
        let err = f.manager.rename_organization(req, "alpha").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);

        // Nothing moved
        assert_eq!(
            f.tenants.list_namespaces().await.unwrap(),
            vec!["org_alpha", "org_beta"]
        );
    }

    #[tokio::test]
    async fn test_rename_missing_org() {
        let f = fixture();
        let err = f
            .manager
            .rename_organization(update_req("ghost"), "ghost")
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_delete() {
        let f = fixture();
        f.manager
            .create_organization(create_req("alpha", "a@alpha.io"))
            .await
            .unwrap();

        let err = f
            .manager
            .delete_organization("alpha", "beta")
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Forbidden);

        let removed = f
            .manager
            .delete_organization("alpha", "alpha")
            .await
            .unwrap();
        assert_eq!(removed.namespace, "org_alpha");

        assert!(f.registry.find_by_name("alpha").await.unwrap().is_none());
        assert!(f.tenants.list_namespaces().await.unwrap().is_empty());

        let err = f
            .manager
            .delete_organization("alpha", "alpha")
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_orphaned_namespaces() {
        let f = fixture();
        f.manager
            .create_organization(create_req("alpha", "a@alpha.io"))
            .await
            .unwrap();
        f.tenants
            .insert_document("org_leftover", doc! { "_id": "x" })
            .await;
        f.tenants
            .insert_document("system_stuff", doc! { "_id": "y" })
            .await;

        assert_eq!(
            f.manager.orphaned_namespaces().await.unwrap(),
            vec!["org_leftover"]
        );
    }
}
