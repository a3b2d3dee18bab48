//! Domain services: registry, tenant storage, authentication and the
//! organization lifecycle built on top of them.

mod auth;
mod database;
pub mod error;
mod jwt;
mod lifecycle;
pub mod metrics;
mod registry;
mod storage;
mod tenant_store;

pub use auth::AuthService;
pub use database::MongoDb;
pub use error::{ErrorKind, ServiceError};
pub use jwt::{AuthClaims, JwtService, TokenCodec};
pub use lifecycle::OrgLifecycleManager;
pub use registry::{InMemoryRegistry, MasterRegistry, MongoRegistry};
pub use storage::Storage;
pub use tenant_store::{
    namespace_for, AdminPatch, DocumentRewrite, InMemoryTenantStore, MongoTenantStore,
    TenantStore, NAMESPACE_PREFIX,
};
