//! Dashboard library for the OpenShift walkthrough demo
//!
//! This crate provides the core functionality for:
//! - Talking to the demo application's REST API
//! - Tracking walkthrough step progress
//! - Rendering dashboard panels
//! - Polling and load-test monitoring
//! - Health checks and observability

pub mod api;
pub mod controller;
pub mod error;
pub mod health;
pub mod models;
pub mod observability;
pub mod poller;
pub mod render;
pub mod state;
pub mod steps;

pub use api::{ClientConfig, DemoApi, HealthEndpoint, HttpDemoApi};
pub use controller::{ControllerConfig, DemoController};
pub use error::{FetchError, FetchResult};
pub use health::{
    ComponentHealth, ComponentStatus, HealthRegistry, HealthResponse, ReadinessResponse,
};
pub use models::*;
pub use observability::{DashboardMetrics, StructuredLogger};
pub use poller::PollerHandle;
pub use state::{AppState, Panel};
