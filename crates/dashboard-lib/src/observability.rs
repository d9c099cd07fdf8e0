//! Observability infrastructure for the dashboard
//!
//! Provides:
//! - Prometheus metrics (fetch counts, fetch errors, fetch latency, step progress, load test)
//! - Structured JSON logging with tracing

use prometheus::{
    register_histogram_vec, register_int_counter_vec, register_int_gauge, HistogramVec,
    IntCounterVec, IntGauge,
};
use std::sync::OnceLock;
use tracing::{info, warn};

/// Histogram buckets for demo API round trips (in seconds)
const LATENCY_BUCKETS: &[f64] = &[0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0];

/// Global metrics instance (registered once)
static GLOBAL_METRICS: OnceLock<DashboardMetricsInner> = OnceLock::new();

struct DashboardMetricsInner {
    fetches: IntCounterVec,
    fetch_errors: IntCounterVec,
    fetch_latency_seconds: HistogramVec,
    current_step: IntGauge,
    completed_steps: IntGauge,
    load_test_active: IntGauge,
    polls: IntCounterVec,
}

impl DashboardMetricsInner {
    fn new() -> Self {
        Self {
            fetches: register_int_counter_vec!(
                "demo_dashboard_fetches_total",
                "Requests issued to the demo API",
                &["endpoint"]
            )
            .expect("Failed to register fetches_total"),

            fetch_errors: register_int_counter_vec!(
                "demo_dashboard_fetch_errors_total",
                "Failed requests to the demo API by failure kind",
                &["endpoint", "kind"]
            )
            .expect("Failed to register fetch_errors_total"),

            fetch_latency_seconds: register_histogram_vec!(
                "demo_dashboard_fetch_latency_seconds",
                "Round trip time of demo API requests",
                &["endpoint"],
                LATENCY_BUCKETS.to_vec()
            )
            .expect("Failed to register fetch_latency_seconds"),

            current_step: register_int_gauge!(
                "demo_dashboard_current_step",
                "Walkthrough step the dashboard currently shows"
            )
            .expect("Failed to register current_step"),

            completed_steps: register_int_gauge!(
                "demo_dashboard_completed_steps",
                "Number of completed walkthrough steps"
            )
            .expect("Failed to register completed_steps"),

            load_test_active: register_int_gauge!(
                "demo_dashboard_load_test_active",
                "1 while a server-side load test is being monitored"
            )
            .expect("Failed to register load_test_active"),

            polls: register_int_counter_vec!(
                "demo_dashboard_polls_total",
                "Polling rounds executed",
                &["kind"]
            )
            .expect("Failed to register polls_total"),
        }
    }
}

/// Dashboard metrics for Prometheus exposition
///
/// This is a lightweight handle to the global metrics instance.
/// Multiple clones share the same underlying metrics.
#[derive(Clone)]
pub struct DashboardMetrics {
    _private: (),
}

impl Default for DashboardMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl DashboardMetrics {
    /// Create a new metrics handle (initializes global metrics if needed)
    pub fn new() -> Self {
        GLOBAL_METRICS.get_or_init(DashboardMetricsInner::new);
        Self { _private: () }
    }

    fn inner(&self) -> &DashboardMetricsInner {
        GLOBAL_METRICS.get().expect("Metrics not initialized")
    }

    /// Record a completed request and its latency
    pub fn observe_fetch(&self, endpoint: &str, duration_secs: f64) {
        self.inner().fetches.with_label_values(&[endpoint]).inc();
        self.inner()
            .fetch_latency_seconds
            .with_label_values(&[endpoint])
            .observe(duration_secs);
    }

    pub fn inc_fetch_errors(&self, endpoint: &str, kind: &str) {
        self.inner()
            .fetch_errors
            .with_label_values(&[endpoint, kind])
            .inc();
    }

    pub fn fetch_error_count(&self, endpoint: &str, kind: &str) -> u64 {
        self.inner()
            .fetch_errors
            .with_label_values(&[endpoint, kind])
            .get()
    }

    pub fn set_step_progress(&self, current_step: u32, completed: usize) {
        self.inner().current_step.set(current_step as i64);
        self.inner().completed_steps.set(completed as i64);
    }

    pub fn set_load_test_active(&self, active: bool) {
        self.inner().load_test_active.set(active as i64);
    }

    /// `kind` is "initial" or "periodic"
    pub fn inc_polls(&self, kind: &str) {
        self.inner().polls.with_label_values(&[kind]).inc();
    }
}

/// Structured logger for dashboard events
#[derive(Clone)]
pub struct StructuredLogger {
    api_url: String,
}

impl StructuredLogger {
    pub fn new(api_url: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into(),
        }
    }

    pub fn log_startup(&self, version: &str, poll_interval_secs: u64) {
        info!(
            event = "dashboard_started",
            api_url = %self.api_url,
            version = %version,
            poll_interval_secs = poll_interval_secs,
            "Demo dashboard started"
        );
    }

    pub fn log_shutdown(&self, reason: &str) {
        info!(
            event = "dashboard_shutdown",
            api_url = %self.api_url,
            reason = %reason,
            "Demo dashboard shutting down"
        );
    }

    /// A request failed; the panel shows a fixed message instead
    pub fn log_fetch_failure(&self, endpoint: &str, kind: &str, error: &str) {
        warn!(
            event = "fetch_failed",
            api_url = %self.api_url,
            endpoint = %endpoint,
            kind = %kind,
            error = %error,
            "Demo API request failed"
        );
    }

    pub fn log_step_completed(&self, step_id: u32, current_step: u32) {
        info!(
            event = "step_completed",
            step_id = step_id,
            current_step = current_step,
            "Walkthrough step completed"
        );
    }

    pub fn log_step4_toggle(&self, checked: bool, current_step: u32) {
        info!(
            event = "step4_toggled",
            checked = checked,
            current_step = current_step,
            "Step 4 toggled locally without server confirmation"
        );
    }

    pub fn log_load_test(&self, action: &str, duration: u64, cpu_intensive: bool) {
        info!(
            event = "load_test",
            action = %action,
            duration = duration,
            cpu_intensive = cpu_intensive,
            "Load test {}",
            action
        );
    }

    pub fn log_celebration(&self) {
        info!(event = "walkthrough_completed", "All walkthrough steps completed");
    }
}
