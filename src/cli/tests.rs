//! Tests for the CLI module.

use super::*;
use crate::client::Credentials;
use crate::testing::MockTransport;
use crate::traits::{ApiVersion, Method};
use clap::Parser;
use serde_json::{json, Value};
use std::process::ExitCode;
use std::sync::Arc;

fn creds() -> Credentials {
    Credentials::new("pk_test", Some("999"))
}

fn run_mock(command: Command, mock: &Arc<MockTransport>) -> CliOutput {
    run_with(command, creds(), Arc::clone(mock) as Arc<dyn crate::traits::Transport>, "")
}

#[test]
fn test_parse_call_command() {
    let cli = Cli::try_parse_from([
        "clickup-tools",
        "call",
        "clickup_get_task",
        "--args",
        r#"{"taskId":"abc"}"#,
    ])
    .unwrap();
    assert_eq!(
        cli.command,
        Command::Call {
            tool: "clickup_get_task".to_string(),
            args: Some(r#"{"taskId":"abc"}"#.to_string())
        }
    );
    assert!(!cli.command.needs_stdin());
}

#[test]
fn test_parse_global_config_flag() {
    let cli = Cli::try_parse_from(["clickup-tools", "test-connection", "--config", "/tmp/c.yaml"])
        .unwrap();
    assert_eq!(cli.command, Command::TestConnection);
    assert_eq!(cli.config.unwrap().to_str(), Some("/tmp/c.yaml"));
}

#[test]
fn test_needs_stdin_only_for_dash_args() {
    let cmd = Command::Call { tool: "x".to_string(), args: Some("-".to_string()) };
    assert!(cmd.needs_stdin());
    assert!(!Command::Version.needs_stdin());
}

#[test]
fn test_version() {
    let mock = Arc::new(MockTransport::new());
    let output = run_mock(Command::Version, &mock);
    assert_eq!(output.exit_code, ExitCode::SUCCESS);
    assert!(output.stderr[0].starts_with("clickup-tools v"));
}

#[test]
fn test_catalog_lists_every_tool() {
    let mock = Arc::new(MockTransport::new());
    let output = run_mock(Command::Catalog { json: false }, &mock);
    assert_eq!(output.exit_code, ExitCode::SUCCESS);
    assert_eq!(output.stdout.len(), 17);
    assert!(output.stdout[0].starts_with("clickup_get_hierarchy"));
}

#[test]
fn test_catalog_json() {
    let mock = Arc::new(MockTransport::new());
    let output = run_mock(Command::Catalog { json: true }, &mock);
    let parsed: Value = serde_json::from_str(&output.stdout[0]).unwrap();
    assert_eq!(parsed[1]["name"], "clickup_search");
    assert_eq!(parsed[1]["access"], "read");
}

#[test]
fn test_describe_tool() {
    let mock = Arc::new(MockTransport::new());
    let output = run_mock(Command::Describe { tool: "clickup_get_tasks".to_string() }, &mock);
    assert_eq!(output.exit_code, ExitCode::SUCCESS);
    assert!(output.stdout[0].starts_with("clickup_get_tasks (Get Tasks, tasks, read)"));
    assert!(output.stdout.last().unwrap().contains("\"listId\""));
    assert_eq!(mock.call_count(), 0);
}

#[test]
fn test_describe_unknown_tool() {
    let mock = Arc::new(MockTransport::new());
    let output = run_mock(Command::Describe { tool: "nope".to_string() }, &mock);
    assert_eq!(output.exit_code, ExitCode::from(1));
    assert_eq!(output.stderr, vec!["Unknown tool 'nope'.".to_string()]);
}

#[test]
fn test_call_tool() {
    let mock = Arc::new(MockTransport::new());
    mock.respond(json!({"id": "9", "name": "Ship it", "status": {"status": "open"}, "url": "u"}));

    let output = run_mock(
        Command::Call {
            tool: "clickup_create_task".to_string(),
            args: Some(r#"{"listId":"123","name":"Ship it"}"#.to_string()),
        },
        &mock,
    );

    assert_eq!(output.exit_code, ExitCode::SUCCESS);
    assert!(output.stdout[0].contains("created successfully (ID: 9)"));
    assert_eq!(mock.last_request().path, "/list/123/task");
}

#[test]
fn test_call_reads_stdin() {
    let mock = Arc::new(MockTransport::new());
    let output = run_with(
        Command::Call { tool: "clickup_get_task".to_string(), args: Some("-".to_string()) },
        creds(),
        mock.clone(),
        "{}",
    );
    assert_eq!(output.exit_code, ExitCode::from(1));
    assert_eq!(output.stdout, vec!["Error: taskId is required.".to_string()]);
}

#[test]
fn test_call_rejects_bad_json() {
    let mock = Arc::new(MockTransport::new());
    let output = run_mock(
        Command::Call { tool: "clickup_get_task".to_string(), args: Some("{oops".to_string()) },
        &mock,
    );
    assert_eq!(output.exit_code, ExitCode::from(2));
    assert!(output.stderr[0].starts_with("Invalid --args"));
}

#[test]
fn test_request_v3_with_body() {
    let mock = Arc::new(MockTransport::new());
    mock.respond(json!({"ok": true}));

    let output = run_mock(
        Command::Request {
            method: "post".to_string(),
            path: "workspaces/999/docs".to_string(),
            v3: true,
            data: Some(r#"{"name":"Doc"}"#.to_string()),
        },
        &mock,
    );

    assert_eq!(output.exit_code, ExitCode::SUCCESS);
    let request = mock.last_request();
    assert_eq!(request.method, Method::Post);
    assert_eq!(request.version, ApiVersion::V3);
    assert_eq!(request.path, "/workspaces/999/docs");
    assert_eq!(request.body, Some(json!({"name": "Doc"})));
}

#[test]
fn test_request_rejects_unknown_method() {
    let mock = Arc::new(MockTransport::new());
    let output = run_mock(
        Command::Request { method: "PATCH".to_string(), path: "/team".to_string(), v3: false, data: None },
        &mock,
    );
    assert_eq!(output.exit_code, ExitCode::from(2));
    assert_eq!(output.stderr, vec!["Error: Unsupported HTTP method: PATCH".to_string()]);
    assert_eq!(mock.call_count(), 0);
}

#[test]
fn test_request_reports_api_error() {
    let mock = Arc::new(MockTransport::new());
    mock.fail(401, "Token invalid");
    let output = run_mock(
        Command::Request { method: "GET".to_string(), path: "/team".to_string(), v3: false, data: None },
        &mock,
    );
    assert_eq!(output.exit_code, ExitCode::from(1));
    assert_eq!(output.stderr, vec!["Error: ClickUp API error (401): Token invalid".to_string()]);
}

#[test]
fn test_test_connection() {
    let mock = Arc::new(MockTransport::new());
    mock.respond(json!({"teams": [{"name": "Acme"}]}));
    let output = run_mock(Command::TestConnection, &mock);
    assert_eq!(output.exit_code, ExitCode::SUCCESS);
    assert_eq!(output.stdout, vec!["Connected to ClickUp. Found 1 workspace(s): Acme".to_string()]);
}

#[test]
fn test_test_connection_without_token() {
    let mock = Arc::new(MockTransport::new());
    let output =
        run_with(Command::TestConnection, Credentials::default(), mock.clone(), "");
    assert_eq!(output.exit_code, ExitCode::from(1));
    assert!(output.stderr[0].starts_with("Error: No API token provided."));
    assert_eq!(mock.call_count(), 0);
}
