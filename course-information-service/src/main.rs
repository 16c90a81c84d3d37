use course_information_service::{build_router, config::CourseConfig, connect_catalog, AppState};
use service_core::error::AppError;
use service_core::metrics::init_metrics;
use service_core::middleware::rate_limit::spawn_rate_limit_pruner;
use service_core::observability::init_tracing;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::signal;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    // Load configuration - fail fast if invalid
    let config = CourseConfig::load()?;

    init_tracing(
        &config.service_name,
        &config.log_level,
        config.otlp_endpoint.as_deref(),
    )?;

    // Must run before any metric is recorded
    init_metrics()?;

    tracing::info!(
        service = %config.service_name,
        version = %config.service_version,
        environment = ?config.environment,
        backend = ?config.catalog.backend,
        "Starting course information service"
    );

    let catalog = connect_catalog(&config).await.map_err(|e| {
        tracing::error!("Failed to initialize catalog backend: {}", e);
        e
    })?;
    tracing::info!("Catalog backend initialized");

    let addr = config.common.socket_addr();
    let prune_every = Duration::from_secs(config.rate_limit.window_seconds.max(1));
    let state = AppState::new(config, catalog);
    spawn_rate_limit_pruner(state.ip_rate_limit.limiter.clone(), prune_every);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(addr).await.map_err(|e| {
        tracing::error!("Failed to bind TCP listener to {}: {}", addr, e);
        AppError::from(e)
    })?;
    tracing::info!(address = %addr, "Listening");

    service_core::axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    tracing::info!("Service shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
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
