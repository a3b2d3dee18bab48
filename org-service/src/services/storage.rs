use secrecy::ExposeSecret;
use service_core::error::AppError;
use std::sync::Arc;

use super::database::MongoDb;
use super::registry::{InMemoryRegistry, MasterRegistry, MongoRegistry};
use super::tenant_store::{InMemoryTenantStore, MongoTenantStore, TenantStore};
use crate::config::{StorageBackend, StorageConfig};

/// The registry and tenant store pair selected by `STORAGE_BACKEND`.
#[derive(Clone)]
pub struct Storage {
    pub registry: Arc<dyn MasterRegistry>,
    pub tenants: Arc<dyn TenantStore>,
    mongo: Option<MongoDb>,
}

impl Storage {
    pub async fn connect(config: &StorageConfig) -> Result<Self, AppError> {
        match config.backend {
            StorageBackend::MongoDb => {
                let url = config.mongo_url.as_ref().ok_or_else(|| {
                    AppError::ConfigError(anyhow::anyhow!(
                        "MONGO_URL is required for the mongodb storage backend"
                    ))
                })?;
                let db = MongoDb::connect(url.expose_secret(), &config.master_db_name).await?;

                let registry = MongoRegistry::new(db.clone(), &config.master_collection);
                registry.initialize_indexes().await?;
                tracing::info!(
                    database = %config.master_db_name,
                    collection = %config.master_collection,
                    "Master registry initialized"
                );

                Ok(Self {
                    registry: Arc::new(registry),
                    tenants: Arc::new(MongoTenantStore::new(db.clone())),
                    mongo: Some(db),
                })
            }
            StorageBackend::Memory => {
                tracing::warn!("Using in-memory storage; data will not survive a restart");
                Ok(Self::in_memory())
            }
        }
    }

    pub fn in_memory() -> Self {
        Self {
            registry: Arc::new(InMemoryRegistry::new()),
            tenants: Arc::new(InMemoryTenantStore::new()),
            mongo: None,
        }
    }

    pub async fn close(self) {
        if let Some(db) = self.mongo {
            db.close().await;
        }
    }
}
