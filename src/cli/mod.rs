//! Developer CLI for the ClickUp tools.
//!
//! Lets you browse the catalog, call a tool the same way an agent would, and
//! send raw API requests with the configured credentials.

mod run;

#[cfg(test)]
mod tests;

pub use run::{run, run_with, CliOutput};

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// ClickUp tools CLI.
///
/// Credentials come from the settings file (see --config) or from
/// `CLICKUP_API_TOKEN` and `CLICKUP_WORKSPACE_ID`.
#[derive(Parser, Debug)]
#[command(name = "clickup-tools")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Settings file (default: <config dir>/clickup-tools/config.yaml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log file (default: <data dir>/clickup-tools/clickup-tools.log)
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    /// The command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Top-level commands.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// List every tool in the catalog.
    Catalog {
        /// Print the catalog as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Show a tool's description and argument schema.
    Describe {
        /// Tool name, e.g. `clickup_get_task`
        tool: String,
    },

    /// Call a tool with JSON arguments.
    ///
    /// Use `--args -` to read the arguments from stdin.
    Call {
        /// Tool name
        tool: String,

        /// JSON object of arguments
        #[arg(long)]
        args: Option<String>,
    },

    /// Send a raw request to the ClickUp API.
    Request {
        /// HTTP method: GET, POST, PUT, or DELETE
        method: String,

        /// Path below the API base, e.g. `/team`
        path: String,

        /// Use the v3 API instead of v2.
        #[arg(long)]
        v3: bool,

        /// JSON request body
        #[arg(long)]
        data: Option<String>,
    },

    /// Check that the configured token works.
    #[command(name = "test-connection")]
    TestConnection,

    /// Show version information.
    Version,
}

impl Command {
    /// Returns true if this command reads its input from stdin.
    #[must_use]
    pub fn needs_stdin(&self) -> bool {
        matches!(self, Self::Call { args: Some(args), .. } if args == "-")
    }
}
