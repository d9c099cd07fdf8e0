//! Access to the demo application's REST API
//!
//! The controller only talks to [`DemoApi`]; [`HttpDemoApi`] is the
//! production implementation over reqwest.

mod http;

pub use http::{ClientConfig, HttpDemoApi};

use crate::error::FetchResult;
use crate::models::{
    EndpointCheck, LoadTestRequest, LoadTestStarted, LoadTestStatus, LoadTestStopped,
    MetricsResponse, PersistenceStats, PersistenceTestResponse, ProbeStatus, StatusResponse,
    StepCompletion, TrafficReport,
};
use async_trait::async_trait;

/// API paths, relative to the base URL
pub mod paths {
    pub const STATUS: &str = "api/status";
    pub const METRICS: &str = "api/metrics";
    pub const PERSISTENCE_STATS: &str = "api/persistence/stats";
    pub const PERSISTENCE_TEST: &str = "api/persistence/test";
    pub const PROBE_STATUS: &str = "api/probe-status";
    pub const LOAD_TEST: &str = "api/load-test";
    pub const LOAD_STATUS: &str = "api/load-status";
    pub const TRAFFIC_GENERATE: &str = "api/traffic/generate";
    /// Metric label shared by every per-step completion request
    pub const STEP_LABEL: &str = "api/step";

    pub fn step(id: u32) -> String {
        format!("api/step/{}", id)
    }
}

/// The three probe endpoints the demo app exposes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HealthEndpoint {
    Liveness,
    Readiness,
    Startup,
}

impl HealthEndpoint {
    pub const ALL: [HealthEndpoint; 3] = [
        HealthEndpoint::Liveness,
        HealthEndpoint::Readiness,
        HealthEndpoint::Startup,
    ];

    /// Path relative to the base URL
    pub fn path(&self) -> &'static str {
        match self {
            HealthEndpoint::Liveness => "api/health",
            HealthEndpoint::Readiness => "api/ready",
            HealthEndpoint::Startup => "api/startup",
        }
    }

    /// Absolute path as shown to users
    pub fn display_path(&self) -> &'static str {
        match self {
            HealthEndpoint::Liveness => "/api/health",
            HealthEndpoint::Readiness => "/api/ready",
            HealthEndpoint::Startup => "/api/startup",
        }
    }

    pub fn probe_name(&self) -> &'static str {
        match self {
            HealthEndpoint::Liveness => "Liveness",
            HealthEndpoint::Readiness => "Readiness",
            HealthEndpoint::Startup => "Startup",
        }
    }
}

/// Operations the dashboard needs from the demo application
///
/// Envelope responses (`success` + `error`) are returned as-is even when
/// `success` is false; deciding what to render is the caller's job.
#[async_trait]
pub trait DemoApi: Send + Sync {
    /// Base URL the API is reached at, with a trailing slash
    fn base_url(&self) -> &str;

    async fn status(&self) -> FetchResult<StatusResponse>;

    async fn metrics(&self) -> FetchResult<MetricsResponse>;

    async fn persistence_stats(&self) -> FetchResult<PersistenceStats>;

    async fn create_persistence_entry(&self, data: &str) -> FetchResult<PersistenceTestResponse>;

    async fn complete_step(&self, step_id: u32) -> FetchResult<StepCompletion>;

    /// GET a health endpoint and parse its JSON body
    async fn health(&self, endpoint: HealthEndpoint) -> FetchResult<serde_json::Value>;

    /// GET a health endpoint and only report the status code
    async fn check_endpoint(&self, endpoint: HealthEndpoint) -> FetchResult<EndpointCheck>;

    async fn probe_status(&self) -> FetchResult<ProbeStatus>;

    async fn start_load_test(&self, request: &LoadTestRequest) -> FetchResult<LoadTestStarted>;

    async fn stop_load_test(&self) -> FetchResult<LoadTestStopped>;

    async fn load_status(&self) -> FetchResult<LoadTestStatus>;

    async fn generate_traffic(&self) -> FetchResult<TrafficReport>;
}
