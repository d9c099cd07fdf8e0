//! Demo dashboard - server-side rendered walkthrough dashboard
//!
//! Polls the demo application's API, renders the walkthrough page, and
//! serves it together with health and metrics endpoints.

use anyhow::{Context, Result};
use dashboard_lib::{
    controller::DemoController,
    health::{components, HealthRegistry},
    HttpDemoApi,
};
use demo_dashboard::{api, config::DashboardConfig};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const DASHBOARD_VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing with JSON output and env filter
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(fmt::layer().json())
        .init();

    info!("Starting demo-dashboard");

    let config = DashboardConfig::load()?;
    info!(api_url = %config.api_url, port = config.port, "Dashboard configured");

    let health_registry = HealthRegistry::new();
    health_registry.register(components::DEMO_API).await;
    health_registry.register(components::POLLER).await;

    let demo_api = HttpDemoApi::new(&config.client_config())
        .context("Failed to build demo API client")?;
    let controller = DemoController::new(
        Arc::new(demo_api),
        config.controller_config(),
        health_registry.clone(),
    );
    controller
        .logger()
        .log_startup(DASHBOARD_VERSION, config.poll_interval_secs);

    // Serve right away; /readyz stays 503 until the first poll finishes
    let app_state = Arc::new(api::AppState::new(controller.clone(), health_registry));
    let server = tokio::spawn(api::serve(config.port, app_state));

    let poller = controller.initialize().await;

    let outcome = tokio::select! {
        signal = tokio::signal::ctrl_c() => signal
            .context("Failed to listen for shutdown signal")
            .map(|_| "SIGINT received"),
        joined = server => joined
            .context("Dashboard server task panicked")
            .and_then(|served| served)
            .map(|_| "Dashboard server exited"),
    };

    poller.stop().await;
    controller.shutdown().await;

    match &outcome {
        Ok(reason) => controller.logger().log_shutdown(reason),
        Err(e) => controller.logger().log_shutdown(&e.to_string()),
    }
    info!("Shutting down");

    outcome.map(|_| ())
}
