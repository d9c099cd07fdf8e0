//! Wire models for the demo application's REST API
//!
//! Every payload is tolerant of missing optional fields: numbers default
//! to zero, strings to empty (rendered as "Unknown"), and unrecognised
//! enum values fall back to a catch-all variant.

use serde::{Deserialize, Serialize};

/// Progress of a single walkthrough step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepStatus {
    Pending,
    Current,
    Completed,
}

impl StepStatus {
    /// CSS class / wire name
    pub fn as_str(&self) -> &'static str {
        match self {
            StepStatus::Pending => "pending",
            StepStatus::Current => "current",
            StepStatus::Completed => "completed",
        }
    }
}

/// A step as reported by `GET /api/status`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Step {
    pub id: u32,
    #[serde(default)]
    pub name: String,
    pub status: StepStatus,
}

/// Descriptive deployment strings, display only
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DeploymentInfo {
    pub namespace: String,
    pub hostname: String,
    pub version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub app_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deployed_at: Option<String>,
}

/// `GET /api/status`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub current_step: u32,
    #[serde(default)]
    pub steps: Vec<Step>,
    #[serde(default)]
    pub deployment_info: DeploymentInfo,
}

/// Where the server read its container numbers from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricsSource {
    Psutil,
    Cgroups,
    ProcMeminfo,
    #[default]
    #[serde(other)]
    Other,
}

impl MetricsSource {
    /// Human readable label shown under the metrics panel
    pub fn label(&self) -> &'static str {
        match self {
            MetricsSource::Psutil => "Host System",
            MetricsSource::Cgroups => "Pod Limits",
            MetricsSource::ProcMeminfo => "Host Fallback",
            MetricsSource::Other => "Unknown Source",
        }
    }
}

/// Container resource snapshot
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ContainerMetrics {
    pub cpu_percent: f64,
    pub cpu_limit_cores: f64,
    pub cpu_limit: String,
    pub cpu_limit_percent: f64,
    pub memory_percent: f64,
    pub memory_used_mb: f64,
    pub memory_total_mb: f64,
    pub memory_limit_mb: f64,
    pub memory_limit_percent: f64,
    pub metrics_source: MetricsSource,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hostname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EndpointCount {
    pub endpoint: String,
    #[serde(default)]
    pub count: u64,
}

/// Inbound connection statistics
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkMetrics {
    pub active_connections: u64,
    pub total_requests: u64,
    pub requests_per_minute: f64,
    pub top_endpoints: Vec<EndpointCount>,
}

/// `GET /api/metrics`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricsResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub container: Option<ContainerMetrics>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub network: Option<NetworkMetrics>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_steps: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_steps: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_step: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub persistence_entries: Option<u64>,
}

/// A row of the demo's persistence table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersistenceEntry {
    pub id: i64,
    #[serde(default)]
    pub data: String,
    #[serde(default)]
    pub timestamp: String,
}

/// `GET /api/persistence/stats`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PersistenceStats {
    pub total_entries: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latest_entry: Option<PersistenceEntry>,
    pub database_type: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersistenceTestRequest {
    pub data: String,
}

/// `POST /api/persistence/test`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersistenceTestResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entry: Option<PersistenceEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// `POST /api/step/{id}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepCompletion {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub current_step: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadTestRequest {
    pub duration: u64,
    pub cpu_intensive: bool,
}

/// `POST /api/load-test`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadTestStarted {
    #[serde(default)]
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// `DELETE /api/load-test`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadTestStopped {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub requests_generated: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// `GET /api/load-status`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoadTestStatus {
    pub active: bool,
    pub requests_generated: u64,
    pub elapsed_seconds: f64,
    pub duration: u64,
    pub cpu_intensive: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProbeDetails {
    pub liveness: bool,
    pub readiness: bool,
    pub startup: bool,
}

/// `GET /api/probe-status`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProbeStatus {
    pub step_6_complete: bool,
    pub probe_details: ProbeDetails,
}

/// `POST /api/traffic/generate`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TrafficReport {
    pub success: bool,
    pub app_url: String,
    pub duration: String,
    pub rate: String,
    pub requests_sent: u64,
    pub errors: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl TrafficReport {
    /// Share of requests that got through, as a percentage
    pub fn success_rate(&self) -> f64 {
        if self.requests_sent == 0 {
            return 0.0;
        }
        self.requests_sent as f64 / (self.requests_sent + self.errors) as f64 * 100.0
    }
}

/// Outcome of hitting one health endpoint, body ignored
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndpointCheck {
    pub path: String,
    pub status_code: u16,
}

impl EndpointCheck {
    pub fn is_ok(&self) -> bool {
        (200..300).contains(&self.status_code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_response_tolerates_missing_deployment_info() {
        let json = r#"{"current_step": 4, "steps": [{"id": 4, "status": "current"}]}"#;
        let status: StatusResponse = serde_json::from_str(json).unwrap();

        assert_eq!(status.current_step, 4);
        assert_eq!(status.steps[0].status, StepStatus::Current);
        assert!(status.deployment_info.namespace.is_empty());
    }

    #[test]
    fn test_unknown_metrics_source_maps_to_other() {
        let json = r#"{"memory_total_mb": 512, "metrics_source": "unavailable"}"#;
        let container: ContainerMetrics = serde_json::from_str(json).unwrap();

        assert_eq!(container.metrics_source, MetricsSource::Other);
        assert_eq!(container.metrics_source.label(), "Unknown Source");
        assert_eq!(container.cpu_percent, 0.0);
    }

    #[test]
    fn test_metrics_source_labels() {
        assert_eq!(MetricsSource::Psutil.label(), "Host System");
        assert_eq!(MetricsSource::Cgroups.label(), "Pod Limits");
        assert_eq!(MetricsSource::ProcMeminfo.label(), "Host Fallback");
    }

    #[test]
    fn test_load_status_before_any_test() {
        let status: LoadTestStatus =
            serde_json::from_str(r#"{"active": false, "requests_generated": 0}"#).unwrap();

        assert!(!status.active);
        assert_eq!(status.duration, 0);
        assert!(status.start_time.is_none());
    }

    #[test]
    fn test_traffic_success_rate() {
        let report = TrafficReport {
            success: true,
            requests_sent: 90,
            errors: 10,
            ..Default::default()
        };
        assert!((report.success_rate() - 90.0).abs() < f64::EPSILON);

        let empty = TrafficReport::default();
        assert_eq!(empty.success_rate(), 0.0);
    }

    #[test]
    fn test_endpoint_check_ok_range() {
        let ok = EndpointCheck {
            path: "/api/health".to_string(),
            status_code: 200,
        };
        let unavailable = EndpointCheck {
            path: "/api/ready".to_string(),
            status_code: 503,
        };

        assert!(ok.is_ok());
        assert!(!unavailable.is_ok());
    }
}
