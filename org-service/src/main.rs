use org_service::{
    build_router,
    config::OrgConfig,
    services::{metrics::init_metrics, AuthService, JwtService, OrgLifecycleManager, Storage},
    utils::Argon2Hasher,
    AppState,
};
use service_core::error::AppError;
use service_core::middleware::rate_limit::create_ip_rate_limiter;
use service_core::observability::logging::init_tracing;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    // Load configuration - fail fast if invalid
    let config = OrgConfig::from_env()?;

    init_tracing(
        &config.service_name,
        &config.log_level,
        config.otlp_endpoint.as_deref(),
    );

    init_metrics()?;

    tracing::info!(
        service = %config.service_name,
        version = %config.service_version,
        environment = ?config.environment,
        backend = ?config.storage.backend,
        "Starting organization service"
    );

    let storage = Storage::connect(&config.storage).await?;
    tracing::info!("Storage initialized");

    let hasher = Arc::new(Argon2Hasher::new());
    let tokens = Arc::new(JwtService::new(&config.jwt).map_err(AppError::ConfigError)?);

    let auth_service = AuthService::new(
        storage.registry.clone(),
        storage.tenants.clone(),
        hasher.clone(),
        tokens,
    );
    let lifecycle =
        OrgLifecycleManager::new(storage.registry.clone(), storage.tenants.clone(), hasher);

    match lifecycle.orphaned_namespaces().await {
        Ok(orphans) if !orphans.is_empty() => tracing::warn!(
            count = orphans.len(),
            namespaces = ?orphans,
            "Tenant namespaces without a registry record"
        ),
        Ok(_) => {}
        Err(e) => tracing::warn!(error = %e, "Could not check for orphaned namespaces"),
    }

    let login_rate_limiter = create_ip_rate_limiter(
        config.rate_limit.login_attempts,
        config.rate_limit.login_window_seconds,
    );
    let ip_rate_limiter = create_ip_rate_limiter(
        config.rate_limit.global_ip_limit,
        config.rate_limit.global_ip_window_seconds,
    );

    let state = AppState {
        config: config.clone(),
        registry: storage.registry.clone(),
        auth_service,
        lifecycle,
        login_rate_limiter,
        ip_rate_limiter,
    };
    let app = build_router(state).await?;

    let addr = config.common.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Listening");

    service_core::axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    storage.close().await;
    tracing::info!("Service shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received SIGINT, starting graceful shutdown");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        },
    }
}
