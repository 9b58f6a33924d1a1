//! MySQL MCP Server Library
//!
//! This library provides MCP (Model Context Protocol) tools that run
//! semicolon-separated SQL batches under a role-based verb allow-list and
//! report MySQL health and lock diagnostics.

pub mod config;
pub mod db;
pub mod engine;
pub mod error;
pub mod mcp;
pub mod tools;
pub mod transport;

pub use config::Config;
pub use error::ToolError;
pub use mcp::SqlToolService;
