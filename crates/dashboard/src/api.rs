//! HTTP surface of the dashboard: the rendered page, user actions,
//! health checks and Prometheus metrics

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect},
    routing::{get, post},
    Form, Json, Router,
};
use dashboard_lib::{
    controller::DemoController,
    health::{ComponentStatus, HealthRegistry},
    state::Panel,
};
use prometheus::{Encoder, TextEncoder};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{error, info};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub controller: DemoController,
    pub health_registry: HealthRegistry,
}

impl AppState {
    pub fn new(controller: DemoController, health_registry: HealthRegistry) -> Self {
        Self {
            controller,
            health_registry,
        }
    }
}

type SharedState = State<Arc<AppState>>;

async fn index(State(state): SharedState) -> Html<String> {
    Html(state.controller.render_page().await)
}

/// One panel's markup, for partial refreshes
async fn panel(State(state): SharedState, Path(id): Path<String>) -> impl IntoResponse {
    match id.parse::<Panel>() {
        Ok(panel) => Ok(Html(state.controller.panel(panel).await)),
        Err(message) => Err((StatusCode::NOT_FOUND, message)),
    }
}

async fn snapshot(State(state): SharedState) -> impl IntoResponse {
    Json(state.controller.snapshot().await)
}

fn back_to_page() -> Redirect {
    Redirect::to("/")
}

async fn test_persistence(State(state): SharedState) -> Redirect {
    state.controller.test_persistence().await;
    back_to_page()
}

/// The notice is painted before redirecting; the reset follows in the background
async fn reload(State(state): SharedState) -> Redirect {
    state.controller.show_reload_notice().await;
    let controller = state.controller.clone();
    tokio::spawn(async move { controller.finish_reload().await });
    back_to_page()
}

async fn check_probes(State(state): SharedState) -> Redirect {
    state.controller.check_probe_status().await;
    back_to_page()
}

async fn test_health(State(state): SharedState) -> Redirect {
    state.controller.test_health_endpoints().await;
    back_to_page()
}

async fn complete_step(State(state): SharedState, Path(step_id): Path<u32>) -> Redirect {
    state.controller.complete_step(step_id).await;
    back_to_page()
}

async fn complete_current_step(State(state): SharedState) -> Redirect {
    state.controller.complete_current_step().await;
    back_to_page()
}

/// An unchecked checkbox is simply absent from the form
#[derive(Debug, Deserialize)]
struct Step4Form {
    #[serde(default)]
    checked: Option<String>,
}

async fn toggle_step4(State(state): SharedState, Form(form): Form<Step4Form>) -> Redirect {
    let checked = matches!(form.checked.as_deref(), Some("true" | "on" | "1"));
    state.controller.toggle_step4_complete(checked).await;
    back_to_page()
}

#[derive(Debug, Deserialize)]
struct LoadTestForm {
    #[serde(default)]
    duration: Option<u64>,
    #[serde(default)]
    cpu_intensive: Option<bool>,
}

async fn start_load_test(State(state): SharedState, Form(form): Form<LoadTestForm>) -> Redirect {
    let duration = form
        .duration
        .unwrap_or(state.controller.config().load_test_duration);
    let cpu_intensive = form.cpu_intensive.unwrap_or(true);
    state.controller.run_load_test(duration, cpu_intensive).await;
    back_to_page()
}

async fn stop_load_test(State(state): SharedState) -> Redirect {
    state.controller.stop_load_test().await;
    back_to_page()
}

async fn traffic(State(state): SharedState) -> Redirect {
    state.controller.generate_traffic().await;
    back_to_page()
}

/// Health check response - returns 200 if healthy, 503 if unhealthy
async fn healthz(State(state): SharedState) -> impl IntoResponse {
    let health = state.health_registry.health().await;

    let status_code = match health.status {
        ComponentStatus::Healthy => StatusCode::OK,
        // A flaky demo API should not get the dashboard restarted
        ComponentStatus::Degraded => StatusCode::OK,
        ComponentStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
    };

    (status_code, Json(health))
}

/// Readiness check response - returns 200 if ready, 503 if not ready
async fn readyz(State(state): SharedState) -> impl IntoResponse {
    let readiness = state.health_registry.readiness().await;

    let status_code = if readiness.ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status_code, Json(readiness))
}

/// Prometheus metrics endpoint
async fn metrics() -> impl IntoResponse {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();

    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        error!(error = %e, "Failed to encode metrics");
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            [("content-type", "text/plain; charset=utf-8")],
            Vec::new(),
        );
    }

    (
        StatusCode::OK,
        [("content-type", "text/plain; charset=utf-8")],
        buffer,
    )
}

/// Create the dashboard router
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/panels/:panel", get(panel))
        .route("/state", get(snapshot))
        .route("/actions/test-persistence", post(test_persistence))
        .route("/actions/reload", post(reload))
        .route("/actions/check-probes", post(check_probes))
        .route("/actions/test-health", post(test_health))
        .route("/actions/complete-step/:id", post(complete_step))
        .route("/actions/complete-current-step", post(complete_current_step))
        .route("/actions/toggle-step4", post(toggle_step4))
        .route("/actions/load-test", post(start_load_test))
        .route("/actions/load-test/stop", post(stop_load_test))
        .route("/actions/traffic", post(traffic))
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        .route("/metrics", get(metrics))
        .with_state(state)
}

/// Start the dashboard server
pub async fn serve(port: u16, state: Arc<AppState>) -> anyhow::Result<()> {
    let app = create_router(state);

    let addr = format!("0.0.0.0:{}", port);
    info!(addr = %addr, "Starting dashboard server");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
