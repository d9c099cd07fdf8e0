//! Load test commands

use anyhow::Result;
use dashboard_lib::{
    controller::ControllerConfig, models::LoadTestRequest, models::LoadTestStatus, DemoApi,
    HttpDemoApi,
};

use super::accepted;
use crate::output::{
    print_info, print_json, print_success, print_table, yes_no, Field, OutputFormat,
};

fn intensity(cpu_intensive: bool) -> &'static str {
    if cpu_intensive {
        "CPU"
    } else {
        "Memory"
    }
}

fn progress_line(status: &LoadTestStatus) -> String {
    format!(
        "{} operations, {}s / {}s",
        status.requests_generated,
        status.elapsed_seconds.floor() as u64,
        status.duration
    )
}

/// Start a load test, optionally following it to the end
pub async fn start(
    client: &HttpDemoApi,
    duration: u64,
    cpu_intensive: bool,
    watch: bool,
    format: OutputFormat,
) -> Result<()> {
    let started = client
        .start_load_test(&LoadTestRequest {
            duration,
            cpu_intensive,
        })
        .await?;
    accepted(started.success, started.error.clone())?;

    match format {
        OutputFormat::Json => print_json(&started)?,
        OutputFormat::Table => print_success(&format!(
            "{} load test started for {} seconds",
            intensity(cpu_intensive),
            duration
        )),
    }

    if watch {
        follow(client, format).await?;
    }

    Ok(())
}

/// Poll on the dashboard's monitor cadence until the test is inactive
async fn follow(client: &HttpDemoApi, format: OutputFormat) -> Result<()> {
    let timings = ControllerConfig::default();
    tokio::time::sleep(timings.load_monitor_delay).await;

    loop {
        let status = client.load_status().await?;
        match format {
            OutputFormat::Json => println!("{}", serde_json::to_string(&status)?),
            OutputFormat::Table if status.active => print_info(&progress_line(&status)),
            OutputFormat::Table => {
                print_success(&format!(
                    "Load test completed: {} operations in {} seconds",
                    status.requests_generated, status.duration
                ));
            }
        }
        if !status.active {
            return Ok(());
        }
        tokio::time::sleep(timings.load_monitor_interval).await;
    }
}

/// Stop the running load test
pub async fn stop(client: &HttpDemoApi, format: OutputFormat) -> Result<()> {
    let stopped = client.stop_load_test().await?;
    accepted(stopped.success, stopped.error.clone())?;

    match format {
        OutputFormat::Json => print_json(&stopped)?,
        OutputFormat::Table => print_success(&format!(
            "Load test stopped after {} operations",
            stopped.requests_generated
        )),
    }

    Ok(())
}

/// Show load test progress
pub async fn show_status(client: &HttpDemoApi, format: OutputFormat) -> Result<()> {
    let status = client.load_status().await?;

    match format {
        OutputFormat::Json => print_json(&status)?,
        OutputFormat::Table => print_table(vec![
            Field::new("Active", yes_no(status.active)),
            Field::new("Type", intensity(status.cpu_intensive)),
            Field::new("Progress", progress_line(&status)),
            Field::new(
                "Started",
                status.start_time.as_deref().unwrap_or("Unknown"),
            ),
        ]),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_line_floors_elapsed() {
        let status = LoadTestStatus {
            active: true,
            requests_generated: 1500,
            elapsed_seconds: 42.9,
            duration: 120,
            ..Default::default()
        };
        assert_eq!(progress_line(&status), "1500 operations, 42s / 120s");
    }

    #[test]
    fn test_intensity() {
        assert_eq!(intensity(true), "CPU");
        assert_eq!(intensity(false), "Memory");
    }
}
