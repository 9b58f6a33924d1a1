//! MCP server integration module.
//!
//! Bridges the rmcp protocol handler to the tool registry.

pub mod service;

pub use service::SqlToolService;
