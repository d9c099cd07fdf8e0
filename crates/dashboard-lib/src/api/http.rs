//! reqwest-backed implementation of [`DemoApi`]

use super::{paths, DemoApi, HealthEndpoint};
use crate::error::{FetchError, FetchResult};
use crate::models::{
    EndpointCheck, LoadTestRequest, LoadTestStarted, LoadTestStatus, LoadTestStopped,
    MetricsResponse, PersistenceStats, PersistenceTestRequest, PersistenceTestResponse,
    ProbeStatus, StatusResponse, StepCompletion, TrafficReport,
};
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder};
use serde::{de::DeserializeOwned, Serialize};
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Configuration for the HTTP client
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Demo application base URL (e.g., "http://demo-app:8080")
    pub base_url: String,
    /// Per-request timeout
    pub request_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            request_timeout: Duration::from_secs(30),
        }
    }
}

/// HTTP client for the demo application's API
pub struct HttpDemoApi {
    client: Client,
    base_url: Url,
}

impl HttpDemoApi {
    /// Create a new client
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .context("Failed to create HTTP client")?;

        // Url::join drops the last path segment unless it ends in a slash
        let mut base = config.base_url.clone();
        if !base.ends_with('/') {
            base.push('/');
        }
        let base_url = Url::parse(&base).context("Invalid API URL")?;

        Ok(Self { client, base_url })
    }

    /// Create a client with default settings for the given base URL
    pub fn with_base_url(base_url: &str) -> Result<Self> {
        Self::new(&ClientConfig {
            base_url: base_url.to_string(),
            ..ClientConfig::default()
        })
    }

    fn url(&self, path: &str) -> FetchResult<Url> {
        self.base_url
            .join(path)
            .map_err(|source| FetchError::InvalidPath {
                path: path.to_string(),
                source,
            })
    }

    fn request(&self, method: Method, path: &str) -> FetchResult<RequestBuilder> {
        Ok(self.client.request(method, self.url(path)?))
    }

    /// Send a request and decode its JSON body whatever the status code;
    /// the demo API reports failures as JSON envelopes with 4xx/5xx.
    async fn send_json<T: DeserializeOwned>(
        &self,
        path: &str,
        builder: RequestBuilder,
    ) -> FetchResult<T> {
        let response = builder.send().await.map_err(|source| FetchError::Transport {
            path: path.to_string(),
            source,
        })?;

        let status = response.status();
        let body = response.text().await.map_err(|source| FetchError::Transport {
            path: path.to_string(),
            source,
        })?;
        debug!(path = %path, status = status.as_u16(), "Demo API responded");

        match serde_json::from_str(&body) {
            Ok(value) => Ok(value),
            Err(_) if !status.is_success() => Err(FetchError::Status {
                path: path.to_string(),
                status: status.as_u16(),
                body,
            }),
            Err(e) => Err(FetchError::Malformed {
                path: path.to_string(),
                reason: e.to_string(),
            }),
        }
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> FetchResult<T> {
        let builder = self.request(Method::GET, path)?;
        self.send_json(path, builder).await
    }

    async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: Option<&B>,
    ) -> FetchResult<T> {
        let mut builder = self.request(Method::POST, path)?;
        if let Some(body) = body {
            builder = builder.json(body);
        }
        self.send_json(path, builder).await
    }
}

#[async_trait]
impl DemoApi for HttpDemoApi {
    fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    async fn status(&self) -> FetchResult<StatusResponse> {
        self.get(paths::STATUS).await
    }

    async fn metrics(&self) -> FetchResult<MetricsResponse> {
        self.get(paths::METRICS).await
    }

    async fn persistence_stats(&self) -> FetchResult<PersistenceStats> {
        self.get(paths::PERSISTENCE_STATS).await
    }

    async fn create_persistence_entry(&self, data: &str) -> FetchResult<PersistenceTestResponse> {
        let request = PersistenceTestRequest {
            data: data.to_string(),
        };
        self.post(paths::PERSISTENCE_TEST, Some(&request)).await
    }

    async fn complete_step(&self, step_id: u32) -> FetchResult<StepCompletion> {
        self.post::<_, ()>(&paths::step(step_id), None).await
    }

    async fn health(&self, endpoint: HealthEndpoint) -> FetchResult<serde_json::Value> {
        self.get(endpoint.path()).await
    }

    async fn check_endpoint(&self, endpoint: HealthEndpoint) -> FetchResult<EndpointCheck> {
        let path = endpoint.path();
        let response = self
            .request(Method::GET, path)?
            .send()
            .await
            .map_err(|source| FetchError::Transport {
                path: path.to_string(),
                source,
            })?;

        Ok(EndpointCheck {
            path: endpoint.display_path().to_string(),
            status_code: response.status().as_u16(),
        })
    }

    async fn probe_status(&self) -> FetchResult<ProbeStatus> {
        self.get(paths::PROBE_STATUS).await
    }

    async fn start_load_test(&self, request: &LoadTestRequest) -> FetchResult<LoadTestStarted> {
        self.post(paths::LOAD_TEST, Some(request)).await
    }

    async fn stop_load_test(&self) -> FetchResult<LoadTestStopped> {
        let builder = self.request(Method::DELETE, paths::LOAD_TEST)?;
        self.send_json(paths::LOAD_TEST, builder).await
    }

    async fn load_status(&self) -> FetchResult<LoadTestStatus> {
        self.get(paths::LOAD_STATUS).await
    }

    async fn generate_traffic(&self) -> FetchResult<TrafficReport> {
        self.post::<_, ()>(paths::TRAFFIC_GENERATE, None).await
    }
}
