//! MCP (Model Context Protocol) server.
//!
//! Exposes the tool catalog to agents over stdio.

#[cfg(feature = "mcp")]
pub mod server;

#[cfg(feature = "mcp")]
pub use server::ClickUpServer;
