use diabetes_screening_api::{
    api::{build_router, AppState},
    config::Config,
    metrics,
    ml::ModelRegistry,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "diabetes_screening_api=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::load().unwrap_or_else(|e| {
        eprintln!("Failed to load configuration: {}", e);
        eprintln!("Using default configuration");
        Config::default()
    });

    tracing::info!(
        "Starting diabetes screening API v{}",
        env!("CARGO_PKG_VERSION")
    );
    tracing::info!("Deployment mode: {:?}", config.deployment.mode);

    // Initialize Prometheus metrics
    if config.observability.prometheus_enabled {
        if let Err(e) = metrics::init_metrics() {
            tracing::warn!("Failed to initialize metrics: {}", e);
            tracing::warn!("Continuing without metrics");
        }
    } else {
        tracing::info!("Prometheus metrics disabled in configuration");
    }

    // Load model artifacts; failed slots stay unavailable and the process
    // keeps serving in degraded mode
    tracing::info!("Model directory: {}", config.models.dir.display());
    let registry = Arc::new(ModelRegistry::load(&config.models, config.deployment.mode));

    for (name, loaded) in registry.availability() {
        metrics::MODELS_LOADED
            .with_label_values(&[name.as_str()])
            .set(if loaded { 1.0 } else { 0.0 });
        if loaded {
            tracing::info!("Model slot '{}' ready", name);
        } else {
            tracing::warn!("Model slot '{}' unavailable, its endpoint will return errors", name);
        }
    }

    // Create application state and HTTP router
    let state = AppState::new(registry, config.deployment.mode);
    let app = build_router(state);

    // Start HTTP server
    let http_addr = format!("{}:{}", config.server.host, config.server.http_port);
    let http_listener = tokio::net::TcpListener::bind(&http_addr).await?;

    tracing::info!("HTTP API server listening on http://{}", http_addr);
    tracing::info!("   Health check: http://{}/health", http_addr);
    tracing::info!("   Metrics: http://{}/metrics", http_addr);

    let http_handle = tokio::spawn(async move {
        if let Err(e) = axum::serve(http_listener, app).await {
            tracing::error!("HTTP server error: {}", e);
        }
    });

    tokio::select! {
        _ = http_handle => {
            tracing::warn!("HTTP server stopped");
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutdown signal received");
        }
    }

    tracing::info!("Shutting down gracefully...");
    Ok(())
}
