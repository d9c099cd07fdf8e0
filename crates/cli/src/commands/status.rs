//! Walkthrough status and metrics commands

use anyhow::Result;
use dashboard_lib::{models::MetricsResponse, steps::StepBoard, DemoApi, HttpDemoApi};
use tabled::Tabled;

use crate::output::{
    color_step_status, format_mb, format_percent, or_unknown, print_info, print_json,
    print_table, Field, OutputFormat,
};

/// Row for the step table
#[derive(Tabled)]
struct StepRow {
    #[tabled(rename = "Step")]
    id: u32,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "")]
    marker: &'static str,
}

#[derive(Tabled)]
struct EndpointRow {
    #[tabled(rename = "Endpoint")]
    endpoint: String,
    #[tabled(rename = "Requests")]
    count: u64,
}

/// Show walkthrough progress
pub async fn show_status(client: &HttpDemoApi, format: OutputFormat) -> Result<()> {
    let status = client.status().await?;

    match format {
        OutputFormat::Json => print_json(&status)?,
        OutputFormat::Table => {
            let mut board = StepBoard::new(status.current_step);
            board.apply(status.current_step, &status.steps);

            let rows: Vec<StepRow> = board
                .steps()
                .iter()
                .map(|s| StepRow {
                    id: s.id,
                    name: s.name.clone(),
                    status: color_step_status(s.status),
                    marker: if s.marker { "◀ you are here" } else { "" },
                })
                .collect();
            print_table(rows);

            let info = &status.deployment_info;
            print_table(vec![
                Field::new("Current Step", status.current_step),
                Field::new(
                    "Completed",
                    format!("{}/{}", board.completed_count(), board.steps().len()),
                ),
                Field::new("Namespace", or_unknown(&info.namespace)),
                Field::new("Hostname", or_unknown(&info.hostname)),
                Field::new("Version", or_unknown(&info.version)),
            ]);
        }
    }

    Ok(())
}

fn resource_fields(snapshot: &MetricsResponse) -> Vec<Field> {
    let mut fields = Vec::new();

    match &snapshot.container {
        Some(c) if c.memory_total_mb > 0.0 => {
            fields.push(Field::new("CPU", format_percent(c.cpu_percent)));
            if c.cpu_limit_cores > 0.0 {
                fields.push(Field::new("CPU Limit", or_unknown(&c.cpu_limit)));
                fields.push(Field::new("CPU vs Limit", format_percent(c.cpu_limit_percent)));
            } else {
                fields.push(Field::new("CPU Limit", "none"));
            }
            fields.push(Field::new(
                "Memory",
                format!(
                    "{} / {} ({})",
                    format_mb(c.memory_used_mb),
                    format_mb(c.memory_total_mb),
                    format_percent(c.memory_percent)
                ),
            ));
            if c.memory_limit_mb > 0.0 {
                fields.push(Field::new(
                    "Memory vs Limit",
                    format!(
                        "{} / {} ({})",
                        format_mb(c.memory_used_mb),
                        format_mb(c.memory_limit_mb),
                        format_percent(c.memory_limit_percent)
                    ),
                ));
            }
            fields.push(Field::new("Source", c.metrics_source.label()));
        }
        _ => fields.push(Field::new("Resources", "unavailable")),
    }

    if let Some(n) = &snapshot.network {
        fields.push(Field::new("Active Connections", n.active_connections));
        fields.push(Field::new("Total Requests", n.total_requests));
        fields.push(Field::new(
            "Requests/min",
            format!("{:.1}", n.requests_per_minute),
        ));
    }

    fields
}

/// Show container and network metrics
pub async fn show_metrics(client: &HttpDemoApi, format: OutputFormat) -> Result<()> {
    let snapshot = client.metrics().await?;

    match format {
        OutputFormat::Json => print_json(&snapshot)?,
        OutputFormat::Table => {
            print_table(resource_fields(&snapshot));

            if let Some(network) = &snapshot.network {
                if !network.top_endpoints.is_empty() {
                    print_info("Top endpoints");
                    print_table(
                        network
                            .top_endpoints
                            .iter()
                            .map(|e| EndpointRow {
                                endpoint: e.endpoint.clone(),
                                count: e.count,
                            })
                            .collect(),
                    );
                }
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use dashboard_lib::models::{ContainerMetrics, MetricsSource};

    fn names(fields: &[Field]) -> Vec<&'static str> {
        fields.iter().map(|f| f.name).collect()
    }

    #[test]
    fn test_resource_fields_without_container() {
        let fields = resource_fields(&MetricsResponse::default());
        assert_eq!(names(&fields), vec!["Resources"]);
    }

    #[test]
    fn test_resource_fields_with_pod_limits() {
        let snapshot = MetricsResponse {
            container: Some(ContainerMetrics {
                cpu_percent: 12.0,
                cpu_limit_cores: 0.5,
                cpu_limit: "500m".to_string(),
                memory_total_mb: 2048.0,
                memory_used_mb: 256.0,
                memory_limit_mb: 512.0,
                metrics_source: MetricsSource::Cgroups,
                ..Default::default()
            }),
            ..Default::default()
        };

        let fields = resource_fields(&snapshot);
        assert_eq!(
            names(&fields),
            vec!["CPU", "CPU Limit", "CPU vs Limit", "Memory", "Memory vs Limit", "Source"]
        );
        assert_eq!(fields.last().unwrap().value, "Pod Limits");
    }
}
