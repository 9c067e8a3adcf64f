//! MCP server binary for the ClickUp tools.
//!
//! Serves the tool catalog over stdio. Credentials come from the settings
//! file or the `CLICKUP_API_TOKEN` and `CLICKUP_WORKSPACE_ID` environment
//! variables.

use clickup_tools::client::ClickUpClient;
use clickup_tools::config::Settings;
use clickup_tools::logging;
use clickup_tools::mcp::ClickUpServer;
use rmcp::ServiceExt;
use std::sync::Arc;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging first (stdout is reserved for the protocol)
    if let Some(path) = logging::default_log_path() {
        if let Err(e) = logging::init(&path) {
            eprintln!("Warning: MCP logging init failed: {e}");
        }
    }
    logging::install_panic_hook();

    let settings = Settings::load(None)?;
    let credentials = settings.credentials();
    if credentials.token.is_empty() {
        tracing::warn!("no API token configured; tool calls will fail until one is set");
    }

    // The blocking HTTP client must be built and dropped outside the runtime.
    let client = Arc::new(ClickUpClient::new(credentials)?);
    let server = ClickUpServer::new(client);
    let toolbox = server.toolbox();
    tracing::info!(tools = toolbox.iter().count(), "MCP server created, starting stdio transport");

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async move {
        let service = server.serve(rmcp::transport::stdio()).await?;
        tracing::info!("MCP server running");
        service.waiting().await?;
        Ok::<_, Box<dyn std::error::Error>>(())
    })?;
    drop(runtime);
    drop(toolbox);

    logging::log_shutdown(None);
    Ok(())
}
