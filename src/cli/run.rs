//! Command execution for the CLI.

use crate::args::ToolArgs;
use crate::cli::Command;
use crate::client::{ClickUpClient, Credentials};
use crate::config::Settings;
use crate::http::{HttpTransport, DEFAULT_TIMEOUT, PROBE_TIMEOUT};
use crate::json::pretty;
use crate::registry::{self, Catalog};
use crate::tools::input_schema;
use crate::traits::{ApiRequest, Method, Transport};
use serde_json::{json, Value};
use std::process::ExitCode;
use std::sync::Arc;

/// Output from running the CLI, with separate stdout and stderr messages.
#[derive(Debug)]
pub struct CliOutput {
    /// Exit code for the process.
    pub exit_code: ExitCode,
    /// Messages to print to stdout.
    pub stdout: Vec<String>,
    /// Messages to print to stderr.
    pub stderr: Vec<String>,
}

impl CliOutput {
    fn success(stdout: String) -> Self {
        Self { exit_code: ExitCode::SUCCESS, stdout: vec![stdout], stderr: vec![] }
    }

    fn failure(message: String) -> Self {
        Self { exit_code: ExitCode::from(1), stdout: vec![], stderr: vec![message] }
    }

    fn usage(message: String) -> Self {
        Self { exit_code: ExitCode::from(2), stdout: vec![], stderr: vec![message] }
    }
}

/// Run a CLI command against the real API.
pub fn run(command: Command, settings: &Settings, stdin: &str) -> CliOutput {
    let credentials = settings.credentials();
    let timeout =
        if matches!(command, Command::TestConnection) { PROBE_TIMEOUT } else { DEFAULT_TIMEOUT };
    match HttpTransport::with_timeout(&credentials.token, timeout) {
        Ok(transport) => run_with(command, credentials, Arc::new(transport), stdin),
        Err(e) => CliOutput::failure(format!("Error: {e}")),
    }
}

/// Run a CLI command over the given transport.
pub fn run_with(
    command: Command,
    credentials: Credentials,
    transport: Arc<dyn Transport>,
    stdin: &str,
) -> CliOutput {
    match command {
        Command::Version => run_version(),
        Command::Catalog { json } => run_catalog(json),
        Command::Describe { tool } => run_describe(&tool),
        Command::TestConnection => run_test_connection(transport.as_ref(), &credentials),
        Command::Call { tool, args } => {
            let client = ClickUpClient::with_transport(credentials, transport);
            run_call(client, &tool, args.as_deref(), stdin)
        }
        Command::Request { method, path, v3, data } => {
            let client = ClickUpClient::with_transport(credentials, transport);
            run_request(&client, &method, &path, v3, data.as_deref())
        }
    }
}

fn run_version() -> CliOutput {
    CliOutput {
        exit_code: ExitCode::SUCCESS,
        stdout: vec![],
        stderr: vec![format!("clickup-tools v{}", crate::VERSION)],
    }
}

fn run_catalog(as_json: bool) -> CliOutput {
    let catalog = Catalog::new();
    if as_json {
        let entries: Vec<Value> = catalog
            .iter()
            .map(|d| {
                json!({
                    "name": d.name,
                    "label": d.label,
                    "category": d.category,
                    "access": d.access,
                    "icon": d.icon,
                    "description": d.description,
                })
            })
            .collect();
        return CliOutput::success(pretty(&Value::Array(entries)));
    }

    let width = catalog.iter().map(|d| d.name.len()).max().unwrap_or(0);
    let lines: Vec<String> = catalog
        .iter()
        .map(|d| format!("{:<width$}  {:<5}  {}", d.name, d.access.to_string(), d.description))
        .collect();
    CliOutput { exit_code: ExitCode::SUCCESS, stdout: lines, stderr: vec![] }
}

fn run_describe(name: &str) -> CliOutput {
    let catalog = Catalog::new();
    let Some(descriptor) = catalog.get(name) else {
        return CliOutput::failure(format!("Unknown tool '{name}'."));
    };

    let tool = Catalog::instantiate(descriptor, Arc::new(ClickUpClient::unconfigured()));
    let stdout = vec![
        format!(
            "{} ({}, {}, {})",
            descriptor.name, descriptor.label, descriptor.category, descriptor.access
        ),
        String::new(),
        tool.description().to_string(),
        String::new(),
        pretty(&input_schema(tool.params())),
    ];
    CliOutput { exit_code: ExitCode::SUCCESS, stdout, stderr: vec![] }
}

fn run_call(client: ClickUpClient, tool: &str, args: Option<&str>, stdin: &str) -> CliOutput {
    let text = match args {
        Some("-") => stdin,
        Some(text) => text,
        None => "{}",
    };
    let args = match ToolArgs::parse(text) {
        Ok(args) => args,
        Err(e) => return CliOutput::usage(format!("Invalid --args: {e}")),
    };

    let toolbox = Catalog::new().bind(Arc::new(client));
    let output = toolbox.call(tool, &args);
    let exit_code = if output.starts_with("Error") { ExitCode::from(1) } else { ExitCode::SUCCESS };
    CliOutput { exit_code, stdout: vec![output], stderr: vec![] }
}

fn run_request(
    client: &ClickUpClient,
    method: &str,
    path: &str,
    v3: bool,
    data: Option<&str>,
) -> CliOutput {
    let method: Method = match method.parse() {
        Ok(method) => method,
        Err(e) => return CliOutput::usage(format!("Error: {e}")),
    };

    let path = if path.starts_with('/') { path.to_string() } else { format!("/{path}") };
    let mut request = ApiRequest::new(method, path);
    if v3 {
        request = request.v3();
    }
    if let Some(data) = data {
        match serde_json::from_str(data) {
            Ok(body) => request = request.json(body),
            Err(e) => return CliOutput::usage(format!("Invalid --data: {e}")),
        }
    }

    match client.send(request) {
        Ok(result) => CliOutput::success(pretty(&result)),
        Err(e) => CliOutput::failure(format!("Error: {e}")),
    }
}

fn run_test_connection(transport: &dyn Transport, credentials: &Credentials) -> CliOutput {
    let report = registry::test_connection(transport, credentials);
    match (report.success, report.message, report.error) {
        (true, Some(message), _) => CliOutput::success(message),
        (_, _, error) => CliOutput::failure(format!("Error: {}", error.unwrap_or_default())),
    }
}
