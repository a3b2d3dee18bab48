//! Shared harness for org-service integration tests.
//!
//! Wires the router to in-memory storage, a cheap argon2 parameter set and an
//! HS256 token codec, then drives it with `tower::ServiceExt::oneshot`.

#![allow(dead_code)]

use axum::{
    body::Body,
    extract::ConnectInfo,
    http::{header, HeaderMap, Method, Request, StatusCode},
    Router,
};
use org_service::{
    build_router,
    config::{
        Environment, JwtConfig, OrgConfig, RateLimitConfig, SecurityConfig, StorageBackend,
        StorageConfig,
    },
    services::{
        AuthService, InMemoryRegistry, InMemoryTenantStore, JwtService, OrgLifecycleManager,
    },
    utils::Argon2Hasher,
    AppState,
};
use secrecy::Secret;
use serde_json::{json, Value};
use service_core::middleware::rate_limit::create_ip_rate_limiter;
use std::net::SocketAddr;
use std::sync::Arc;
use tower::ServiceExt;

pub const TEST_PASSWORD: &str = "TestPass123!";

pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub registry: Arc<InMemoryRegistry>,
    pub tenants: Arc<InMemoryTenantStore>,
    pub tokens: Arc<JwtService>,
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
    pub text: String,
}

pub fn test_config() -> OrgConfig {
    OrgConfig {
        common: service_core::config::Config {
            host: "127.0.0.1".to_string(),
            port: 8000,
        },
        environment: Environment::Dev,
        service_name: "org-service-test".to_string(),
        service_version: "test".to_string(),
        log_level: "error".to_string(),
        otlp_endpoint: None,
        storage: StorageConfig {
            backend: StorageBackend::Memory,
            mongo_url: None,
            master_db_name: "multi_tenant_master".to_string(),
            master_collection: "master_organizations".to_string(),
        },
        jwt: JwtConfig {
            secret: Secret::new("integration-test-secret".to_string()),
            algorithm: "HS256".to_string(),
            expire_hours: 24,
        },
        security: SecurityConfig {
            allowed_origins: vec!["*".to_string()],
        },
        rate_limit: RateLimitConfig {
            login_attempts: 1000,
            login_window_seconds: 60,
            global_ip_limit: 10000,
            global_ip_window_seconds: 60,
        },
    }
}

impl TestApp {
    pub async fn spawn() -> Self {
        Self::spawn_with(|_| {}).await
    }

    pub async fn spawn_with(configure: impl FnOnce(&mut OrgConfig)) -> Self {
        let mut config = test_config();
        configure(&mut config);

        let registry = Arc::new(InMemoryRegistry::new());
        let tenants = Arc::new(InMemoryTenantStore::new());
        let hasher = Arc::new(Argon2Hasher::with_params(64, 1, 1).expect("argon2 params"));
        let tokens = Arc::new(JwtService::new(&config.jwt).expect("jwt service"));

        let auth_service = AuthService::new(
            registry.clone(),
            tenants.clone(),
            hasher.clone(),
            tokens.clone(),
        );
        let lifecycle = OrgLifecycleManager::new(registry.clone(), tenants.clone(), hasher);

        let state = AppState {
            config: config.clone(),
            registry: registry.clone(),
            auth_service,
            lifecycle,
            login_rate_limiter: create_ip_rate_limiter(
                config.rate_limit.login_attempts,
                config.rate_limit.login_window_seconds,
            ),
            ip_rate_limiter: create_ip_rate_limiter(
                config.rate_limit.global_ip_limit,
                config.rate_limit.global_ip_window_seconds,
            ),
        };

        let router = build_router(state.clone())
            .await
            .expect("Failed to build router");

        Self {
            router,
            state,
            registry,
            tenants,
            tokens,
        }
    }

    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> TestResponse {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .extension(ConnectInfo(SocketAddr::from(([127, 0, 0, 1], 40000))));
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        self.send(request).await
    }

    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let text = String::from_utf8_lossy(&bytes).to_string();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

        TestResponse {
            status,
            headers,
            body,
            text,
        }
    }

    pub async fn get(&self, uri: &str) -> TestResponse {
        self.request(Method::GET, uri, None, None).await
    }

    pub async fn create_org(&self, name: &str, email: &str, password: &str) -> TestResponse {
        self.request(
            Method::POST,
            "/org/create",
            Some(json!({
                "organization_name": name,
                "email": email,
                "password": password,
            })),
            None,
        )
        .await
    }

    pub async fn login_response(&self, email: &str, password: &str) -> TestResponse {
        self.request(
            Method::POST,
            "/admin/login",
            Some(json!({ "email": email, "password": password })),
            None,
        )
        .await
    }

    /// Log in and return the access token, failing the test on anything but 200.
    pub async fn login(&self, email: &str, password: &str) -> String {
        let res = self.login_response(email, password).await;
        assert_eq!(res.status, StatusCode::OK, "login failed: {}", res.text);
        res.body["data"]["access_token"]
            .as_str()
            .expect("access_token in login response")
            .to_string()
    }

    /// Create an organization with [`TEST_PASSWORD`] and log its admin in.
    pub async fn create_and_login(&self, name: &str, email: &str) -> String {
        let res = self.create_org(name, email, TEST_PASSWORD).await;
        assert_eq!(res.status, StatusCode::CREATED, "create failed: {}", res.text);
        self.login(email, TEST_PASSWORD).await
    }
}
