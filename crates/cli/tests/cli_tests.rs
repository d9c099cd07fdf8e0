//! CLI integration tests

use std::process::{Command, Output};

fn democtl(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_democtl"))
        .args(args)
        .env_remove("DEMO_API_URL")
        .output()
        .expect("Failed to execute command")
}

/// Test that the CLI shows help
#[test]
fn test_cli_help() {
    let output = democtl(&["--help"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "CLI help should succeed");
    assert!(
        stdout.contains("OpenShift walkthrough demo"),
        "Should show app description"
    );
    for command in [
        "status",
        "metrics",
        "persistence",
        "step",
        "load-test",
        "probes",
        "health",
        "traffic",
    ] {
        assert!(stdout.contains(command), "Should show {} command", command);
    }
}

/// Test that the CLI shows version
#[test]
fn test_cli_version() {
    let output = democtl(&["--version"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "CLI version should succeed");
    assert!(stdout.contains("democtl"), "Should show binary name");
}

/// Test load-test start subcommand help
#[test]
fn test_load_test_start_help() {
    let output = democtl(&["load-test", "start", "--help"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "load-test start help should succeed");
    assert!(stdout.contains("--duration"), "Should show duration option");
    assert!(stdout.contains("--memory"), "Should show memory option");
    assert!(stdout.contains("--watch"), "Should show watch option");
}

/// Test that an unreachable demo app fails the command
#[test]
fn test_unreachable_api_fails() {
    let output = democtl(&["--api-url", "http://127.0.0.1:9", "--timeout", "2", "status"]);
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert!(!output.status.success(), "status should fail without a server");
    assert!(stderr.contains("Error"), "Should report the failure");
}

/// Test status as JSON against a mock demo app
#[test]
fn test_status_json_against_mock_server() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("GET", "/api/status")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{"current_step": 4, "steps": [{"id": 4, "name": "Add Persistence", "status": "current"}],
                "deployment_info": {"namespace": "demo", "hostname": "pod-1", "version": "4.0"}}"#,
        )
        .create();

    let output = democtl(&["--api-url", &server.url(), "--format", "json", "status"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    mock.assert();
    assert!(output.status.success(), "status should succeed");
    let status: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(status["current_step"], 4);
    assert_eq!(status["deployment_info"]["hostname"], "pod-1");
}

/// Test that a rejected envelope becomes a failing exit code
#[test]
fn test_rejected_stop_fails() {
    let mut server = mockito::Server::new();
    server
        .mock("DELETE", "/api/load-test")
        .with_status(400)
        .with_header("content-type", "application/json")
        .with_body(r#"{"success": false, "error": "No load test running"}"#)
        .create();

    let output = democtl(&["--api-url", &server.url(), "load-test", "stop"]);
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert!(!output.status.success());
    assert!(stderr.contains("No load test running"));
}
