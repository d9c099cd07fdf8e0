//! Health probe, endpoint and traffic commands

use anyhow::Result;
use dashboard_lib::{models::EndpointCheck, DemoApi, HealthEndpoint, HttpDemoApi};
use tabled::Tabled;

use super::accepted;
use crate::output::{
    color_status_code, print_json, print_success, print_table, print_warning, yes_no, Field,
    OutputFormat,
};

#[derive(Tabled)]
struct EndpointRow {
    #[tabled(rename = "Endpoint")]
    path: String,
    #[tabled(rename = "OK")]
    ok: String,
    #[tabled(rename = "Status")]
    status: String,
}

impl From<&EndpointCheck> for EndpointRow {
    fn from(check: &EndpointCheck) -> Self {
        Self {
            path: check.path.clone(),
            ok: yes_no(check.is_ok()),
            status: color_status_code(check.status_code),
        }
    }
}

/// Show health probe configuration
pub async fn show_probes(client: &HttpDemoApi, format: OutputFormat) -> Result<()> {
    let status = client.probe_status().await?;

    match format {
        OutputFormat::Json => print_json(&status)?,
        OutputFormat::Table => {
            let details = status.probe_details;
            print_table(vec![
                Field::new("Liveness", yes_no(details.liveness)),
                Field::new("Readiness", yes_no(details.readiness)),
                Field::new("Startup", yes_no(details.startup)),
            ]);
            if status.step_6_complete {
                print_success("Health probes configured, step 6 complete");
            } else {
                print_warning(
                    "Health probes not configured: add them under Workloads → Deployments → Edit Deployment",
                );
            }
        }
    }

    Ok(())
}

/// Check the three health endpoints concurrently
pub async fn check_health(client: &HttpDemoApi, format: OutputFormat) -> Result<()> {
    let [live, ready, startup] = HealthEndpoint::ALL;
    let (live, ready, startup) = tokio::join!(
        client.check_endpoint(live),
        client.check_endpoint(ready),
        client.check_endpoint(startup),
    );
    let checks = vec![live?, ready?, startup?];

    match format {
        OutputFormat::Json => print_json(&checks)?,
        OutputFormat::Table => {
            print_table(checks.iter().map(EndpointRow::from).collect());
            if checks.iter().all(EndpointCheck::is_ok) {
                print_success("All endpoints are ready for probe configuration");
            }
        }
    }

    Ok(())
}

/// Ask the external traffic generator for a burst of requests
pub async fn generate_traffic(client: &HttpDemoApi, format: OutputFormat) -> Result<()> {
    let report = client.generate_traffic().await?;
    accepted(report.success, report.error.clone())?;

    match format {
        OutputFormat::Json => print_json(&report)?,
        OutputFormat::Table => print_table(vec![
            Field::new("Target", &report.app_url),
            Field::new("Duration", format!("{} @ {}", report.duration, report.rate)),
            Field::new("Requests Sent", report.requests_sent),
            Field::new("Errors", report.errors),
            Field::new("Success Rate", format!("{:.1}%", report.success_rate())),
        ]),
    }

    Ok(())
}
