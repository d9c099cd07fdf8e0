//! Pure markup renderers
//!
//! Every function here maps data to an HTML fragment and nothing else:
//! no I/O, no clock reads (callers pass `now`), no state mutation.
//! Server-provided strings are escaped before they reach the markup.

use crate::api::HealthEndpoint;
use crate::models::{
    DeploymentInfo, EndpointCheck, LoadTestStatus, MetricsResponse, MetricsSource,
    PersistenceEntry, PersistenceStats, ProbeDetails, TrafficReport,
};
use crate::state::{AppState, Panel};
use crate::steps::{ConnectorState, Connectors, StepBoard, StepView, LAST_STEP};
use chrono::{DateTime, Local, NaiveDateTime, TimeZone};
use std::fmt::Write;

pub const STATUS_ERROR: &str = "Error loading status";
pub const METRICS_ERROR: &str = "❌ Error fetching metrics";
pub const PERSISTENCE_STATS_ERROR: &str = "Database connection error ❌";
pub const PERSISTENCE_TESTING: &str = "Testing database persistence...";
pub const PERSISTENCE_TEST_ERROR: &str = "❌ Error testing database persistence";
pub const RELOAD_STATUS: &str = "Reloading page to verify data persistence...";
pub const RELOAD_PERSISTENCE: &str = "Watch how database entries persist after reload! 🎯";
pub const LOAD_TEST_STARTING: &str = "🚀 Starting CPU load test...";
pub const PROBE_CHECKING: &str = "🔍 Checking probe configuration...";
pub const HEALTH_TESTING: &str = "🧪 Testing health endpoints...";
pub const TRAFFIC_CONTACTING: &str = "🚀 Contacting traffic generator...";
pub const CELEBRATION: &str = "🎉 ALL STEPS COMPLETED! 🎉";
pub const ALL_STEPS_DONE: &str = "All steps completed! 🎉";

/// Requests fired by the local traffic fallback
pub const LOCAL_TRAFFIC_REQUESTS: usize = 10;

const CALLOUT_STYLE: &str =
    "background: #f0f8ff; padding: 0.5rem; margin-top: 0.5rem; border-left: 3px solid #0066cc;";

/// Escape text for inclusion in HTML content or attribute values
pub fn html_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

fn or_unknown(s: &str) -> String {
    if s.is_empty() {
        "Unknown".to_string()
    } else {
        html_escape(s)
    }
}

fn check_mark(ok: bool) -> &'static str {
    if ok {
        "✅"
    } else {
        "❌"
    }
}

/// Time-of-day for a wall clock reading
pub fn clock_time(now: DateTime<Local>) -> String {
    now.format("%H:%M:%S").to_string()
}

/// Local time-of-day for a server timestamp
///
/// RFC 3339 timestamps are converted to local time; the demo API's
/// offset-less ISO timestamps are taken as local already. Anything else
/// is shown verbatim.
pub fn local_time(timestamp: &str) -> String {
    if let Ok(dt) = DateTime::parse_from_rfc3339(timestamp) {
        return clock_time(dt.with_timezone(&Local));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(timestamp, "%Y-%m-%dT%H:%M:%S%.f") {
        if let Some(dt) = Local.from_local_datetime(&naive).earliest() {
            return clock_time(dt);
        }
    }
    html_escape(timestamp)
}

fn step_element(step: &StepView) -> String {
    let status = step.status.as_str();
    let marker = if step.marker {
        r#"<div class="you-are-here"></div>"#
    } else {
        ""
    };
    format!(
        r#"<div class="step {status}" data-step="{id}"><span class="step-number">{id}</span><span class="step-name">{name}</span><span class="status-badge {status}">{badge}</span>{marker}</div>"#,
        status = status,
        id = step.id,
        name = html_escape(&step.name),
        badge = status.to_uppercase(),
        marker = marker,
    )
}

fn connector(id: &str, state: ConnectorState) -> String {
    format!(
        r#"<span id="{}" class="{}">{}</span>"#,
        id,
        state.class(),
        state.glyph()
    )
}

/// The step list with connectors between adjacent steps
pub fn step_list(board: &StepBoard, connectors: &Connectors) -> String {
    let mut out = String::from(r#"<div class="steps">"#);
    for (i, step) in board.steps().iter().enumerate() {
        if i > 0 {
            let link = match step.id {
                5 => connector("connector-4-5", connectors.four_to_five),
                6 => connector("connector-5-6", connectors.five_to_six),
                _ => r#"<span class="connector">→</span>"#.to_string(),
            };
            out.push_str(&link);
        }
        out.push_str(&step_element(step));
    }
    out.push_str("</div>");
    out
}

/// Summary shown in the app-status panel after a status poll
pub fn status_summary(current_step: u32, completed: usize, info: &DeploymentInfo) -> String {
    format!(
        "<strong>Current Step:</strong> {}<br>\
         <strong>Completed:</strong> {}/{}<br>\
         <strong>Namespace:</strong> {}<br>\
         <strong>Hostname:</strong> {}<br>\
         <strong>Version:</strong> {}",
        current_step,
        completed,
        LAST_STEP,
        or_unknown(&info.namespace),
        or_unknown(&info.hostname),
        or_unknown(&info.version),
    )
}

/// Container and network metrics panel
pub fn metrics(snapshot: &MetricsResponse, now: DateTime<Local>) -> String {
    let mut resources = String::new();

    match &snapshot.container {
        Some(c) if c.memory_total_mb > 0.0 => {
            let _ = write!(
                resources,
                "<br><strong>🔥 CPU Utilization:</strong> {}%",
                c.cpu_percent
            );
            if c.cpu_limit_cores > 0.0 {
                let _ = write!(
                    resources,
                    " / {}<br><strong>📈 CPU vs Limit:</strong> {}%<br>",
                    html_escape(&c.cpu_limit),
                    c.cpu_limit_percent
                );
            } else {
                resources.push_str(" (no limit)<br>");
            }

            let _ = write!(
                resources,
                "<strong>🧠 RAM Utilization:</strong> {}% ({}/{} MB)<br>",
                c.memory_percent, c.memory_used_mb, c.memory_total_mb
            );
            if c.metrics_source == MetricsSource::Cgroups {
                // Pod-level numbers: the cgroup total is the limit
                let _ = write!(
                    resources,
                    "<strong>📊 RAM vs Limit:</strong> {}% ({}/{} MB)<br>",
                    c.memory_percent, c.memory_used_mb, c.memory_limit_mb
                );
            } else if c.memory_limit_mb > 0.0 {
                let _ = write!(
                    resources,
                    "<strong>📊 RAM vs Limit:</strong> {}% ({}/{} MB)<br>",
                    c.memory_limit_percent, c.memory_used_mb, c.memory_limit_mb
                );
            } else {
                resources.push_str("<em>Deploy to OpenShift to see pod-level limits</em><br>");
            }

            let _ = write!(
                resources,
                "<br><small>Source: ({})</small>",
                c.metrics_source.label()
            );
        }
        _ => {
            resources.push_str(
                "<br><strong>📊 Container Metrics:</strong><br>Resource metrics unavailable",
            );
        }
    }

    let mut network = String::new();
    if let Some(n) = &snapshot.network {
        let _ = write!(
            network,
            "<br><br><strong>🌐 Inbound Connections:</strong><br>\
             Active: {}<br>Total Requests: {}<br>Rate: {} req/min<br>",
            n.active_connections, n.total_requests, n.requests_per_minute
        );
        if !n.top_endpoints.is_empty() {
            network.push_str("<strong>Top Endpoints:</strong><br>");
            for ep in &n.top_endpoints {
                let _ = write!(network, "• {}: {}<br>", html_escape(&ep.endpoint), ep.count);
            }
        }
    }

    format!(
        "<strong>📊 Container Resource Metrics</strong>{}{}<br>Updated: {}",
        resources,
        network,
        clock_time(now)
    )
}

/// Persistence panel from aggregate stats
pub fn persistence_stats(stats: &PersistenceStats) -> String {
    if stats.total_entries > 0 {
        let last = stats
            .latest_entry
            .as_ref()
            .map(|e| local_time(&e.timestamp))
            .unwrap_or_else(|| "None".to_string());
        format!(
            "<strong>📊 Database Status</strong><br>\
             Total Entries: {}<br>Database: {}<br>Last Entry: {}<br>Status: Connected ✅",
            stats.total_entries,
            or_unknown(&stats.database_type),
            last
        )
    } else {
        format!(
            "<strong>📊 Database Ready</strong><br>\
             Total Entries: 0<br>Database: {}<br>Status: Connected &amp; Ready ✅",
            or_unknown(&stats.database_type)
        )
    }
}

/// Persistence panel after a successful write
pub fn persistence_saved(entry: &PersistenceEntry, stats: Option<&PersistenceStats>) -> String {
    let (total, database) = match stats {
        Some(s) => (s.total_entries, or_unknown(&s.database_type)),
        None => (0, "Unknown".to_string()),
    };
    format!(
        "<strong>✅ Database Persistence Working!</strong><br>\
         Entry ID: {}<br>Data: {}<br>Total DB Entries: {}<br>Database: {}<br>Time: {}",
        entry.id,
        html_escape(&entry.data),
        total,
        database,
        local_time(&entry.timestamp)
    )
}

pub fn persistence_failed(error: &str) -> String {
    format!("❌ Database test failed: {}", html_escape(error))
}

pub fn load_test_started(duration: u64, cpu_intensive: bool, start_time: Option<&str>) -> String {
    format!(
        "<strong>✅ Load Test Started</strong><br>\
         Duration: {} seconds<br>Type: {} Intensive<br>Started: {}<br>\
         <em>Watch CPU utilization rise...</em>",
        duration,
        intensity(cpu_intensive),
        start_time.map(local_time).unwrap_or_else(|| "Unknown".to_string())
    )
}

fn intensity(cpu_intensive: bool) -> &'static str {
    if cpu_intensive {
        "CPU"
    } else {
        "Memory"
    }
}

pub fn load_test_running(status: &LoadTestStatus) -> String {
    format!(
        "<strong>🔥 Load Test Running</strong><br>\
         Operations: {}<br>Elapsed: {}s / {}s<br>Type: {} Intensive<br>\
         <em>Monitor HPA for scaling...</em>",
        status.requests_generated,
        status.elapsed_seconds.floor() as u64,
        status.duration,
        intensity(status.cpu_intensive)
    )
}

pub fn load_test_completed(status: &LoadTestStatus) -> String {
    format!(
        "<strong>✅ Load Test Completed</strong><br>\
         Total Operations: {}<br>Duration: {} seconds",
        status.requests_generated, status.duration
    )
}

pub fn load_test_stopped(requests_generated: u64, now: DateTime<Local>) -> String {
    format!(
        "<strong>⏹️ Load Test Stopped</strong><br>Operations: {}<br>Stopped: {}",
        requests_generated,
        clock_time(now)
    )
}

/// `prefix` is e.g. "Failed to start" or "Stop failed"
pub fn load_test_failed(prefix: &str, error: &str) -> String {
    format!("❌ {}: {}", prefix, html_escape(error))
}

pub fn error_message(message: &str) -> String {
    format!("❌ Error: {}", html_escape(message))
}

fn probe_lines(details: &ProbeDetails) -> String {
    format!(
        "Liveness Probe: {}<br>Readiness Probe: {}<br>Startup Probe: {}<br>",
        check_mark(details.liveness),
        check_mark(details.readiness),
        check_mark(details.startup)
    )
}

/// Detailed probe panel when step 6 is satisfied
pub fn probes_configured(details: &ProbeDetails) -> String {
    format!(
        "<strong>✅ Health Probes Configured!</strong><br>{}<em>Step 6 Complete! 🎉</em>",
        probe_lines(details)
    )
}

/// Detailed probe panel with remediation steps
pub fn probes_not_configured(details: &ProbeDetails, app_name: &str) -> String {
    format!(
        "<strong>⚠️ Health Probes Not Configured</strong><br>{}\
         <div style=\"{}\"><strong>Next Steps:</strong><br>\
         1. Go to OpenShift Console<br>\
         2. Navigate to: Workloads → Deployments<br>\
         3. Click {} → Actions → Edit Deployment<br>\
         4. Add health check configuration<br>\
         5. Reload this page to check completion</div>",
        probe_lines(details),
        CALLOUT_STYLE,
        html_escape(app_name)
    )
}

fn action_button(action: &str, label: &str) -> String {
    format!(
        r#"<form method="post" action="/actions/{}" class="inline"><button type="submit" class="btn-small">{}</button></form>"#,
        action, label
    )
}

/// Compact probe panel used by the periodic poll
pub fn probe_summary(step_6_complete: bool) -> String {
    if step_6_complete {
        format!(
            "<strong>✅ Step 6 Complete!</strong><br>Health probes are configured<br>{}",
            action_button("check-probes", "Refresh Status")
        )
    } else {
        format!(
            "<strong>⚙️ Configure Health Probes</strong><br>Status: Not configured<br>{}",
            action_button("check-probes", "Check Status")
        )
    }
}

pub fn probe_summary_error() -> String {
    format!(
        "<strong>⚙️ Configure Health Probes</strong><br>Error checking status<br>{}",
        action_button("check-probes", "Check Status")
    )
}

/// Periodic health panel when all three endpoints answered
pub fn health_available(app_name: &str) -> String {
    let mut endpoints = String::new();
    for endpoint in HealthEndpoint::ALL {
        let _ = write!(
            endpoints,
            "• {} ({}) ✅<br>",
            endpoint.display_path(),
            endpoint.probe_name()
        );
    }
    format!(
        "<strong>⚠️ Health Probes Not Configured</strong><br>\
         <div style=\"color: #666; font-size: 0.9em;\">Endpoints Available:<br>{}</div>\
         <div style=\"{}\"><strong>Demo Action:</strong><br>\
         Configure probes in OpenShift console<br>Deployment → {} → YAML</div>",
        endpoints,
        CALLOUT_STYLE,
        html_escape(app_name)
    )
}

pub fn health_unavailable(error: &str) -> String {
    format!(
        "<strong>⚠️ Health Probes Not Configured</strong><br>\
         <div style=\"color: #666;\">Endpoints may not be available<br>Error: {}</div>\
         <div style=\"{}\"><strong>Demo Action:</strong><br>\
         Configure probes in OpenShift console</div>",
        html_escape(error),
        CALLOUT_STYLE
    )
}

/// Result table of the on-demand health endpoint test
pub fn health_results(checks: &[EndpointCheck]) -> String {
    let lines: Vec<String> = checks
        .iter()
        .map(|c| {
            format!(
                "GET {}: {} {}",
                html_escape(&c.path),
                check_mark(c.is_ok()),
                c.status_code
            )
        })
        .collect();
    format!(
        "<strong>🧪 Health Endpoint Test Results</strong><br>\
         <div style=\"font-family: monospace; background: #f5f5f5; padding: 0.5rem; margin: 0.5rem 0;\">{}</div>\
         <em>All endpoints are working and ready for probe configuration!</em>",
        lines.join("<br>")
    )
}

pub fn health_test_failed(message: &str) -> String {
    format!("❌ Endpoint test failed: {}", html_escape(message))
}

pub fn traffic_report(report: &TrafficReport, now: DateTime<Local>) -> String {
    format!(
        "<strong>🚦 Traffic Generation Complete!</strong><br>\
         Target: {}<br>Duration: {} @ {}<br>Requests Sent: {}<br>Errors: {}<br>\
         Success Rate: {:.1}%<br>Time: {}",
        or_unknown(&report.app_url),
        or_unknown(&report.duration),
        or_unknown(&report.rate),
        report.requests_sent,
        report.errors,
        report.success_rate(),
        clock_time(now)
    )
}

/// `reason` is the generator's error, or None when it was unreachable
pub fn traffic_fallback(reason: Option<&str>, now: DateTime<Local>) -> String {
    let cause = match reason {
        Some(error) => format!("External generator error: {}", html_escape(error)),
        None => "Traffic generator unavailable".to_string(),
    };
    format!(
        "<strong>🚦 Local Traffic Generated (Fallback)</strong><br>\
         {}<br>Local requests: {}<br>Time: {}",
        cause,
        LOCAL_TRAFFIC_REQUESTS,
        clock_time(now)
    )
}

fn panel_section(title: &str, panel: Panel, state: &AppState, actions: &[(&str, &str)]) -> String {
    let buttons: String = actions
        .iter()
        .map(|(action, label)| action_button(action, label))
        .collect();
    format!(
        r#"<section class="card"><h2>{}</h2><div class="actions">{}</div><div id="{}" class="status-display">{}</div></section>"#,
        title,
        buttons,
        panel.id(),
        state.panel(panel)
    )
}

/// Full dashboard document
///
/// `stats_url` is the absolute persistence stats URL linked from the
/// persistence card.
pub fn page(state: &AppState, app_name: &str, stats_url: &str) -> String {
    let container_class = if state.celebrating {
        "container celebration"
    } else {
        "container"
    };
    let checked = if state.step4_checked { " checked" } else { "" };

    let mut body = String::new();
    body.push_str(&step_list(&state.board, &state.connectors));
    let _ = write!(
        body,
        r#"<form method="post" action="/actions/toggle-step4" class="step4-toggle"><label><input type="checkbox" id="step4-complete" name="checked" value="true"{} onchange="this.form.submit()"> Step 4 complete</label></form>"#,
        checked
    );
    body.push_str(&panel_section(
        "Application Status",
        Panel::AppStatus,
        state,
        &[("complete-current-step", "Complete Current Step"), ("reload", "Reload Demo")],
    ));
    body.push_str(&panel_section(
        "Persistence",
        Panel::PersistenceStatus,
        state,
        &[("test-persistence", "Test Persistence")],
    ));
    let _ = write!(
        body,
        r#"<p><a id="view-api-status" href="{}" target="_blank">View API Status</a></p>"#,
        html_escape(stats_url)
    );
    body.push_str(&panel_section(
        "Resource Metrics",
        Panel::MetricsDisplay,
        state,
        &[("traffic", "Generate Traffic")],
    ));
    body.push_str(&panel_section(
        "Load Test",
        Panel::LoadTestStatus,
        state,
        &[("load-test", "Start Load Test"), ("load-test/stop", "Stop Load Test")],
    ));
    body.push_str(&panel_section(
        "Health Endpoints",
        Panel::HealthStatus,
        state,
        &[("test-health", "Test Health Endpoints")],
    ));
    body.push_str(&panel_section(
        "Health Probes",
        Panel::ProbeConfigStatus,
        state,
        &[("check-probes", "Check Probes")],
    ));

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta http-equiv="refresh" content="30">
<title>{title}</title>
<style>
@keyframes celebration {{
    0%, 100% {{ transform: scale(1) rotate(0deg); }}
    25% {{ transform: scale(1.02) rotate(1deg); }}
    75% {{ transform: scale(1.02) rotate(-1deg); }}
}}
.celebration {{ animation: celebration 2s ease-in-out; }}
form.inline {{ display: inline; }}
</style>
</head>
<body>
<div class="{container_class}">
<h1>{title}</h1>
{body}
</div>
</body>
</html>
"#,
        title = html_escape(app_name),
        container_class = container_class,
        body = body,
    )
}
