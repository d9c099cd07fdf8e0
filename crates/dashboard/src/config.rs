//! Dashboard configuration

use anyhow::{bail, Context, Result};
use dashboard_lib::{ClientConfig, ControllerConfig};
use serde::Deserialize;
use std::time::Duration;

/// Dashboard configuration, read from `DASHBOARD_*` environment variables
#[derive(Debug, Clone, Deserialize)]
pub struct DashboardConfig {
    /// Base URL of the demo application
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Port the dashboard listens on
    #[serde(default = "default_port")]
    pub port: u16,

    /// Status poll cadence in seconds
    #[serde(default = "default_poll_interval")]
    pub poll_interval_secs: u64,

    /// Per-request timeout for demo API calls in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Deployment name shown in remediation hints
    #[serde(default = "default_app_name")]
    pub app_name: String,

    /// Load test duration used by the "Start Load Test" button
    #[serde(default = "default_load_test_duration")]
    pub load_test_duration_secs: u64,
}

fn default_api_url() -> String {
    "http://localhost:8080".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_poll_interval() -> u64 {
    30
}

fn default_request_timeout() -> u64 {
    30
}

fn default_app_name() -> String {
    "demo-app".to_string()
}

fn default_load_test_duration() -> u64 {
    120
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            port: default_port(),
            poll_interval_secs: default_poll_interval(),
            request_timeout_secs: default_request_timeout(),
            app_name: default_app_name(),
            load_test_duration_secs: default_load_test_duration(),
        }
    }
}

impl DashboardConfig {
    /// Load configuration from the environment
    pub fn load() -> Result<Self> {
        Self::from_env(config::Environment::with_prefix("DASHBOARD"))
    }

    fn from_env(source: config::Environment) -> Result<Self> {
        let config = config::Config::builder().add_source(source).build()?;

        let loaded: DashboardConfig = config
            .try_deserialize()
            .context("Invalid DASHBOARD_* configuration")?;
        loaded.validate()?;
        Ok(loaded)
    }

    fn validate(&self) -> Result<()> {
        if self.poll_interval_secs == 0 {
            bail!("DASHBOARD_POLL_INTERVAL_SECS must be at least 1");
        }
        if self.request_timeout_secs == 0 {
            bail!("DASHBOARD_REQUEST_TIMEOUT_SECS must be at least 1");
        }
        Ok(())
    }

    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            base_url: self.api_url.clone(),
            request_timeout: Duration::from_secs(self.request_timeout_secs),
        }
    }

    pub fn controller_config(&self) -> ControllerConfig {
        ControllerConfig {
            poll_interval: Duration::from_secs(self.poll_interval_secs),
            load_test_duration: self.load_test_duration_secs,
            app_name: self.app_name.clone(),
            ..ControllerConfig::default()
        }
    }
}
