//! # `clickup_tools`
//!
//! The ClickUp project-management API exposed as a catalog of agent-callable
//! tools. Each tool takes loosely-typed JSON arguments, calls the REST API,
//! and returns a text result; failures are text starting with `Error`.

pub mod args;
#[cfg(feature = "cli")]
pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod ids;
pub mod json;
pub mod logging;
pub mod mcp;
pub mod registry;
pub mod testing;
pub mod tools;
pub mod traits;

pub use args::ToolArgs;
pub use client::{ClickUpClient, Credentials};
pub use error::{Error, ErrorKind, Result};
pub use registry::{Catalog, Toolbox};
pub use tools::Tool;
pub use traits::{ApiRequest, Transport};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_exists() {
        assert!(!VERSION.is_empty());
    }
}
