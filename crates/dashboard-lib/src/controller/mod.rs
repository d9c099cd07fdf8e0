//! Dashboard controller
//!
//! Owns the application state and drives every poll and user action
//! against the demo API. No operation returns an error: a failed request
//! is logged, counted and painted into the panel it was meant for.

use crate::api::{paths, DemoApi, HealthEndpoint};
use crate::error::{FetchError, FetchResult};
use crate::health::{components, HealthRegistry};
use crate::models::{LoadTestRequest, PersistenceTestResponse, StepCompletion, StepStatus};
use crate::observability::{DashboardMetrics, StructuredLogger};
use crate::poller::{self, PollerHandle, Schedule, TickOutcome};
use crate::render;
use crate::state::{AppState, Panel};
use crate::steps::LAST_STEP;
use chrono::Local;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinSet;
use tracing::{debug, info, warn};


/// Step that generated traffic completes
const TRAFFIC_STEP: u32 = 5;

/// Timings and display settings of the controller
#[derive(Debug, Clone)]
pub struct ControllerConfig {
    /// Cadence of the periodic status poll
    pub poll_interval: Duration,
    /// Pause between the reload notice and the state reset
    pub reload_delay: Duration,
    /// How long the celebration class stays on the page
    pub celebration_duration: Duration,
    /// Wait before the first load-test status check
    pub load_monitor_delay: Duration,
    /// Wait between load-test status checks
    pub load_monitor_interval: Duration,
    /// Wait after generating traffic before completing step 5
    pub traffic_followup_delay: Duration,
    /// Load test duration used when an action does not name one
    pub load_test_duration: u64,
    /// Deployment name shown in remediation hints
    pub app_name: String,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(30),
            reload_delay: Duration::from_secs(2),
            celebration_duration: Duration::from_secs(2),
            load_monitor_delay: Duration::from_secs(1),
            load_monitor_interval: Duration::from_secs(2),
            traffic_followup_delay: Duration::from_secs(3),
            load_test_duration: 120,
            app_name: "demo-app".to_string(),
        }
    }
}

/// Drives the walkthrough dashboard
///
/// Cheap to clone; clones share state, the load-test monitor and the
/// celebration timer.
#[derive(Clone)]
pub struct DemoController {
    api: Arc<dyn DemoApi>,
    state: Arc<RwLock<AppState>>,
    config: Arc<ControllerConfig>,
    metrics: DashboardMetrics,
    logger: StructuredLogger,
    health: HealthRegistry,
    load_monitor: Arc<Mutex<Option<PollerHandle>>>,
    celebration: Arc<AtomicU64>,
}

impl DemoController {
    pub fn new(api: Arc<dyn DemoApi>, config: ControllerConfig, health: HealthRegistry) -> Self {
        let logger = StructuredLogger::new(api.base_url());
        Self {
            api,
            state: Arc::new(RwLock::new(AppState::default())),
            config: Arc::new(config),
            metrics: DashboardMetrics::new(),
            logger,
            health,
            load_monitor: Arc::new(Mutex::new(None)),
            celebration: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    pub fn logger(&self) -> &StructuredLogger {
        &self.logger
    }

    /// Copy of everything currently on screen
    pub async fn snapshot(&self) -> AppState {
        self.state.read().await.clone()
    }

    /// Markup currently painted into one panel
    pub async fn panel(&self, panel: Panel) -> String {
        self.state.read().await.panel(panel).to_string()
    }

    /// The whole dashboard page
    pub async fn render_page(&self) -> String {
        let stats_url = self.view_api_status();
        let state = self.state.read().await;
        render::page(&state, &self.config.app_name, &stats_url)
    }

    /// Absolute URL of the persistence stats endpoint
    pub fn view_api_status(&self) -> String {
        format!("{}{}", self.api.base_url(), paths::PERSISTENCE_STATS)
    }

    async fn paint(&self, panel: Panel, markup: impl Into<String>) {
        self.state.write().await.set_panel(panel, markup);
    }

    /// Await a request, timing it and recording any failure
    async fn fetch<T, F>(&self, endpoint: &'static str, request: F) -> FetchResult<T>
    where
        F: Future<Output = FetchResult<T>>,
    {
        let started = Instant::now();
        let result = request.await;
        self.metrics
            .observe_fetch(endpoint, started.elapsed().as_secs_f64());
        if let Err(e) = &result {
            self.record_failure(endpoint, e);
        }
        result
    }

    fn record_failure(&self, endpoint: &str, error: &FetchError) {
        self.metrics.inc_fetch_errors(endpoint, error.kind());
        self.logger
            .log_fetch_failure(endpoint, error.kind(), &error.to_string());
    }

    /// Record an envelope that came back with `success: false` and return
    /// the message to show
    fn rejected(&self, endpoint: &str, error: Option<String>) -> String {
        let error = FetchError::Rejected(error.unwrap_or_else(|| "Unknown error".to_string()));
        self.record_failure(endpoint, &error);
        error.to_string()
    }

    /// Run the initial poll, then keep polling until the handle is stopped
    pub async fn initialize(&self) -> PollerHandle {
        self.initial_poll().await;
        self.health.set_healthy(components::POLLER).await;
        self.health.set_ready(true).await;

        let controller = self.clone();
        poller::spawn(
            "status_poll",
            Schedule::every(self.config.poll_interval),
            move || {
                let controller = controller.clone();
                async move {
                    controller.poll_tick().await;
                    TickOutcome::Continue
                }
            },
        )
    }

    /// Everything the page shows on first load
    pub async fn initial_poll(&self) {
        self.metrics.inc_polls("initial");
        tokio::join!(
            self.refresh_status(),
            self.refresh_persistence_stats(),
            self.refresh_metrics(),
            self.load_health_status(),
            self.load_probe_status(),
        );
    }

    /// One round of the periodic poll
    pub async fn poll_tick(&self) {
        self.metrics.inc_polls("periodic");
        tokio::join!(
            self.refresh_status(),
            self.refresh_metrics(),
            self.load_health_status(),
            self.load_probe_status(),
        );
    }

    pub async fn refresh_status(&self) {
        match self.fetch(paths::STATUS, self.api.status()).await {
            Ok(status) => {
                let completed = status
                    .steps
                    .iter()
                    .filter(|s| s.status == StepStatus::Completed)
                    .count();
                let summary =
                    render::status_summary(status.current_step, completed, &status.deployment_info);
                {
                    let mut state = self.state.write().await;
                    state.apply_status(&status);
                    state.set_panel(Panel::AppStatus, summary);
                }
                self.metrics
                    .set_step_progress(status.current_step, completed);
                self.health.set_healthy(components::DEMO_API).await;
            }
            Err(e) => {
                self.paint(Panel::AppStatus, render::STATUS_ERROR).await;
                self.health
                    .set_degraded(components::DEMO_API, e.to_string())
                    .await;
            }
        }
    }

    pub async fn refresh_metrics(&self) {
        let markup = match self.fetch(paths::METRICS, self.api.metrics()).await {
            Ok(snapshot) => render::metrics(&snapshot, Local::now()),
            Err(_) => render::METRICS_ERROR.to_string(),
        };
        self.paint(Panel::MetricsDisplay, markup).await;
    }

    pub async fn refresh_persistence_stats(&self) {
        let markup = match self
            .fetch(paths::PERSISTENCE_STATS, self.api.persistence_stats())
            .await
        {
            Ok(stats) => render::persistence_stats(&stats),
            Err(_) => render::PERSISTENCE_STATS_ERROR.to_string(),
        };
        self.paint(Panel::PersistenceStatus, markup).await;
    }

    /// Write a timestamped entry and show it with fresh totals
    pub async fn test_persistence(&self) {
        self.paint(Panel::PersistenceStatus, render::PERSISTENCE_TESTING)
            .await;

        let data = format!(
            "Database test entry {}",
            chrono::Utc::now().timestamp_millis()
        );
        let markup = match self
            .fetch(
                paths::PERSISTENCE_TEST,
                self.api.create_persistence_entry(&data),
            )
            .await
        {
            Ok(PersistenceTestResponse {
                success: true,
                entry: Some(entry),
                ..
            }) => {
                // Totals are cosmetic; a failed refetch shows 0 / Unknown
                let stats = self
                    .fetch(paths::PERSISTENCE_STATS, self.api.persistence_stats())
                    .await
                    .ok();
                render::persistence_saved(&entry, stats.as_ref())
            }
            Ok(response) => {
                let error = self.rejected(paths::PERSISTENCE_TEST, response.error);
                render::persistence_failed(&error)
            }
            Err(_) => render::PERSISTENCE_TEST_ERROR.to_string(),
        };
        self.paint(Panel::PersistenceStatus, markup).await;
    }

    /// Show the reload notice, then start over from a fresh state
    pub async fn reload_demo(&self) {
        self.show_reload_notice().await;
        self.finish_reload().await;
    }

    pub async fn show_reload_notice(&self) {
        let mut state = self.state.write().await;
        state.set_panel(Panel::AppStatus, render::RELOAD_STATUS);
        state.set_panel(Panel::PersistenceStatus, render::RELOAD_PERSISTENCE);
    }

    /// Second half of a reload: wait out the notice, reset, and poll again
    pub async fn finish_reload(&self) {
        tokio::time::sleep(self.config.reload_delay).await;

        self.stop_load_monitor().await;
        *self.state.write().await = AppState::default();
        info!(event = "demo_reloaded", "Dashboard state reset");

        self.initial_poll().await;
    }

    pub async fn run_load_test(&self, duration: u64, cpu_intensive: bool) {
        self.paint(Panel::LoadTestStatus, render::LOAD_TEST_STARTING)
            .await;

        let request = LoadTestRequest {
            duration,
            cpu_intensive,
        };
        match self
            .fetch(paths::LOAD_TEST, self.api.start_load_test(&request))
            .await
        {
            Ok(started) if started.success => {
                self.logger
                    .log_load_test("started", duration, cpu_intensive);
                self.paint(
                    Panel::LoadTestStatus,
                    render::load_test_started(
                        duration,
                        cpu_intensive,
                        started.start_time.as_deref(),
                    ),
                )
                .await;
                self.metrics.set_load_test_active(true);
                self.monitor_load_test().await;
            }
            Ok(started) => {
                let error = self.rejected(paths::LOAD_TEST, started.error);
                self.paint(
                    Panel::LoadTestStatus,
                    render::load_test_failed("Failed to start", &error),
                )
                .await;
            }
            Err(e) => {
                self.paint(Panel::LoadTestStatus, render::error_message(&e.to_string()))
                    .await;
            }
        }
    }

    pub async fn stop_load_test(&self) {
        match self
            .fetch(paths::LOAD_TEST, self.api.stop_load_test())
            .await
        {
            Ok(stopped) if stopped.success => {
                // Keep the stop summary instead of a later "completed" paint
                self.stop_load_monitor().await;
                self.metrics.set_load_test_active(false);
                self.logger.log_load_test("stopped", 0, false);
                self.paint(
                    Panel::LoadTestStatus,
                    render::load_test_stopped(stopped.requests_generated, Local::now()),
                )
                .await;
            }
            Ok(stopped) => {
                let error = self.rejected(paths::LOAD_TEST, stopped.error);
                self.paint(
                    Panel::LoadTestStatus,
                    render::load_test_failed("Stop failed", &error),
                )
                .await;
            }
            Err(e) => {
                self.paint(Panel::LoadTestStatus, render::error_message(&e.to_string()))
                    .await;
            }
        }
    }

    /// Follow the running load test until the server reports it inactive
    ///
    /// Replaces any monitor already running.
    pub async fn monitor_load_test(&self) {
        let controller = self.clone();
        let handle = poller::spawn(
            "load_test_monitor",
            Schedule {
                initial_delay: self.config.load_monitor_delay,
                period: self.config.load_monitor_interval,
            },
            move || {
                let controller = controller.clone();
                async move { controller.check_load_test().await }
            },
        );

        let previous = self.load_monitor.lock().await.replace(handle);
        if let Some(previous) = previous {
            debug!("Replacing running load test monitor");
            previous.stop().await;
        }
    }

    async fn check_load_test(&self) -> TickOutcome {
        match self
            .fetch(paths::LOAD_STATUS, self.api.load_status())
            .await
        {
            Ok(status) if status.active => {
                self.paint(Panel::LoadTestStatus, render::load_test_running(&status))
                    .await;
                TickOutcome::Continue
            }
            Ok(status) => {
                self.paint(Panel::LoadTestStatus, render::load_test_completed(&status))
                    .await;
                self.metrics.set_load_test_active(false);
                self.logger
                    .log_load_test("completed", status.duration, status.cpu_intensive);
                TickOutcome::Stop
            }
            Err(_) => {
                self.metrics.set_load_test_active(false);
                TickOutcome::Stop
            }
        }
    }

    async fn stop_load_monitor(&self) {
        let handle = self.load_monitor.lock().await.take();
        if let Some(handle) = handle {
            handle.stop().await;
        }
    }

    /// Whether a load-test monitor is still following a test
    pub async fn load_monitor_running(&self) -> bool {
        self.load_monitor
            .lock()
            .await
            .as_ref()
            .map(|h| !h.is_finished())
            .unwrap_or(false)
    }

    /// Detailed probe check behind the "Check Probes" action
    pub async fn check_probe_status(&self) {
        self.paint(Panel::ProbeConfigStatus, render::PROBE_CHECKING)
            .await;

        let markup = match self
            .fetch(paths::PROBE_STATUS, self.api.probe_status())
            .await
        {
            Ok(status) if status.step_6_complete => {
                self.complete_step(LAST_STEP).await;
                render::probes_configured(&status.probe_details)
            }
            Ok(status) => {
                render::probes_not_configured(&status.probe_details, &self.config.app_name)
            }
            Err(e) => render::error_message(&e.to_string()),
        };
        self.paint(Panel::ProbeConfigStatus, markup).await;
    }

    /// Compact probe check run by the poll
    pub async fn load_probe_status(&self) {
        let markup = match self
            .fetch(paths::PROBE_STATUS, self.api.probe_status())
            .await
        {
            Ok(status) => {
                if status.step_6_complete {
                    self.complete_step(LAST_STEP).await;
                }
                render::probe_summary(status.step_6_complete)
            }
            Err(_) => render::probe_summary_error(),
        };
        self.paint(Panel::ProbeConfigStatus, markup).await;
    }

    /// Periodic availability check of the three health endpoints
    pub async fn load_health_status(&self) {
        let [live, ready, startup] = HealthEndpoint::ALL;
        let (live, ready, startup) = tokio::join!(
            self.fetch(live.path(), self.api.health(live)),
            self.fetch(ready.path(), self.api.health(ready)),
            self.fetch(startup.path(), self.api.health(startup)),
        );

        let markup = match live.and(ready).and(startup) {
            Ok(_) => render::health_available(&self.config.app_name),
            Err(e) => render::health_unavailable(&e.to_string()),
        };
        self.paint(Panel::HealthStatus, markup).await;
    }

    /// On-demand status code check of the three health endpoints
    pub async fn test_health_endpoints(&self) {
        self.paint(Panel::HealthStatus, render::HEALTH_TESTING).await;

        let [live, ready, startup] = HealthEndpoint::ALL;
        let checks = tokio::join!(
            self.fetch(live.path(), self.api.check_endpoint(live)),
            self.fetch(ready.path(), self.api.check_endpoint(ready)),
            self.fetch(startup.path(), self.api.check_endpoint(startup)),
        );

        let markup = match checks {
            (Ok(live), Ok(ready), Ok(startup)) => render::health_results(&[live, ready, startup]),
            (Err(e), _, _) | (_, Err(e), _) | (_, _, Err(e)) => {
                render::health_test_failed(&e.to_string())
            }
        };
        self.paint(Panel::HealthStatus, markup).await;
    }

    /// Ask the external generator for traffic, falling back to local requests
    pub async fn generate_traffic(&self) {
        self.paint(Panel::MetricsDisplay, render::TRAFFIC_CONTACTING)
            .await;

        let markup = match self
            .fetch(paths::TRAFFIC_GENERATE, self.api.generate_traffic())
            .await
        {
            Ok(report) if report.success => render::traffic_report(&report, Local::now()),
            Ok(report) => {
                let error = self.rejected(paths::TRAFFIC_GENERATE, report.error);
                warn!(error = %error, "Traffic generator failed, falling back to local requests");
                self.generate_local_traffic().await;
                render::traffic_fallback(Some(&error), Local::now())
            }
            Err(_) => {
                self.generate_local_traffic().await;
                render::traffic_fallback(None, Local::now())
            }
        };
        self.paint(Panel::MetricsDisplay, markup).await;

        if self.state.read().await.current_step == TRAFFIC_STEP {
            let controller = self.clone();
            let delay = self.config.traffic_followup_delay;
            tokio::spawn(async move {
                tokio::time::sleep(delay).await;
                controller.complete_current_step().await;
            });
        }
    }

    async fn generate_local_traffic(&self) {
        let mut requests = JoinSet::new();
        for _ in 0..render::LOCAL_TRAFFIC_REQUESTS {
            let api = self.api.clone();
            requests.spawn(async move { api.health(HealthEndpoint::Liveness).await });
        }

        let mut failed = 0usize;
        while let Some(result) = requests.join_next().await {
            if !matches!(result, Ok(Ok(_))) {
                failed += 1;
            }
        }
        debug!(
            requests = render::LOCAL_TRAFFIC_REQUESTS,
            failed = failed,
            "Local traffic sent"
        );
    }

    async fn post_step(&self, step_id: u32) -> Option<StepCompletion> {
        let endpoint = paths::STEP_LABEL;
        match self
            .fetch(endpoint, self.api.complete_step(step_id))
            .await
        {
            Ok(completion) if completion.success => {
                self.logger
                    .log_step_completed(step_id, completion.current_step);
                Some(completion)
            }
            Ok(_) => {
                self.rejected(endpoint, Some(format!("step {} was not accepted", step_id)));
                None
            }
            Err(_) => None,
        }
    }

    /// Mark a step done on the server and refresh
    pub async fn complete_step(&self, step_id: u32) {
        let Some(completion) = self.post_step(step_id).await else {
            return;
        };
        self.refresh_status().await;
        if step_id == LAST_STEP || completion.current_step > LAST_STEP {
            self.celebrate().await;
        }
    }

    pub async fn complete_current_step(&self) {
        let current = self.state.read().await.current_step;
        if current > LAST_STEP {
            self.paint(Panel::AppStatus, render::ALL_STEPS_DONE).await;
            return;
        }

        let Some(completion) = self.post_step(current).await else {
            return;
        };
        self.refresh_status().await;
        if completion.current_step > LAST_STEP {
            self.celebrate().await;
        }
    }

    /// Announce completion and flash the page for a moment
    pub async fn celebrate(&self) {
        let generation = self.celebration.fetch_add(1, Ordering::SeqCst) + 1;
        {
            let mut state = self.state.write().await;
            state.set_panel(Panel::AppStatus, render::CELEBRATION);
            state.celebrating = true;
        }
        self.logger.log_celebration();

        let controller = self.clone();
        let duration = self.config.celebration_duration;
        tokio::spawn(async move {
            tokio::time::sleep(duration).await;
            // A newer celebration owns the flag now
            if controller.celebration.load(Ordering::SeqCst) == generation {
                controller.state.write().await.celebrating = false;
            }
        });
    }

    /// Local-only step 4 checkbox; the server is never told
    pub async fn toggle_step4_complete(&self, checked: bool) {
        let mut state = self.state.write().await;
        state.toggle_step4(checked);
        self.logger.log_step4_toggle(checked, state.current_step);
        self.metrics
            .set_step_progress(state.current_step, state.board.completed_count());
    }

    /// Stop background work owned by the controller
    pub async fn shutdown(&self) {
        self.stop_load_monitor().await;
        self.health
            .set_unhealthy(components::POLLER, "Dashboard shutting down")
            .await;
    }
}
