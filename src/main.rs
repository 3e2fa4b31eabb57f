//! HealthGuard - Main Entry Point
//!
//! Loads the three domain classifiers and serves the assessment forms over
//! HTTP. A domain whose model fails to load stays disabled; the others keep
//! working.

use anyhow::{Context, Result};
use healthguard::{
    config::{AppConfig, LoggingConfig},
    metrics::{AssessmentMetrics, MetricsReporter},
    models::inference::InferenceEngine,
    web::{build_router, AppState},
};
use std::sync::Arc;
use tracing::{info, warn};

fn init_logging(logging: &LoggingConfig) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(format!("healthguard={}", logging.level).parse()?);

    if logging.format.eq_ignore_ascii_case("json") {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration
    let config = AppConfig::load()?;

    // Initialize logging
    init_logging(&config.logging)?;

    info!("Starting HealthGuard");
    info!(
        models_dir = %config.models.models_dir,
        listen_addr = %config.server.listen_addr,
        "Configuration loaded successfully"
    );

    // Initialize metrics
    let metrics = Arc::new(AssessmentMetrics::new());

    // Load models once; failures disable their domain only
    let engine = Arc::new(InferenceEngine::from_config(&config, metrics.clone()));
    for error in engine.registry().load_errors() {
        warn!(domain = %error.domain(), error = %error, "Domain disabled");
    }
    info!(
        available = ?engine.registry().available_domains(),
        "Inference engine ready"
    );

    // Start metrics reporter
    let reporter = MetricsReporter::new(metrics.clone(), config.metrics.report_interval_secs);
    tokio::spawn(reporter.start());

    let app = build_router(AppState::new(engine));

    let listener = tokio::net::TcpListener::bind(&config.server.listen_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.server.listen_addr))?;
    info!(listen_addr = %config.server.listen_addr, "HealthGuard listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("HealthGuard shutting down...");
    metrics.print_summary();

    Ok(())
}
