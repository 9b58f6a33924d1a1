//! MCP tool implementations.
//!
//! This module contains the tool handler contract and every registered tool:
//! - `execute_sql`: Run a semicolon-separated batch under the configured role
//! - `get_db_health_running`: Process list, locks, transactions, engine status
//! - `get_table_lock`: Tables in use and row-lock waits
//! - `get_table_name` / `get_table_desc` / `get_table_index`: information_schema lookups
//! - `registry`: Name → handler table built once at startup

pub mod diagnostics;
pub mod execute;
pub mod registry;
pub mod schema;

pub use diagnostics::{CompositeHandler, DiagnosticBatch};
pub use execute::ExecuteSqlHandler;
pub use registry::ToolRegistry;
pub use schema::{SchemaLookup, SchemaLookupHandler};

use crate::config::DatabaseConfig;
use crate::db::SqlBackend;
use crate::engine::ExecutionEngine;
use crate::error::{ToolError, ToolResult};
use async_trait::async_trait;
use schemars::JsonSchema;
use serde_json::Value;
use std::sync::Arc;
use tracing::info;

/// Tool arguments as received from the caller.
pub type Arguments = serde_json::Map<String, Value>;

/// Name, description and JSON input schema advertised for a tool.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolDescriptor {
    pub name: String,
    pub description: String,
    pub input_schema: Arguments,
}

impl ToolDescriptor {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        input_schema: Arguments,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            input_schema,
        }
    }
}

/// A named tool.
///
/// `invoke` returns one formatted text block per logical operation. Errors
/// returned here abort only this invocation and are reported to the caller
/// as text.
#[async_trait]
pub trait ToolHandler: Send + Sync {
    fn descriptor(&self) -> ToolDescriptor;

    async fn invoke(&self, arguments: &Arguments) -> ToolResult<Vec<String>>;
}

/// Result of a registry invocation, ready for the protocol layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolOutput {
    pub content: Vec<String>,
    pub is_error: bool,
}

impl ToolOutput {
    pub fn success(content: Vec<String>) -> Self {
        Self {
            content,
            is_error: false,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            content: vec![message.into()],
            is_error: true,
        }
    }
}

/// JSON schema object for a tool's input type.
pub fn input_schema<T: JsonSchema>() -> Arguments {
    match serde_json::to_value(schemars::schema_for!(T)) {
        Ok(Value::Object(map)) => map,
        _ => empty_object_schema(),
    }
}

/// Schema for tools that take no arguments.
pub fn empty_object_schema() -> Arguments {
    let mut schema = Arguments::new();
    schema.insert("type".to_string(), Value::String("object".to_string()));
    schema.insert("properties".to_string(), Value::Object(Arguments::new()));
    schema
}

/// Fetch a required string argument.
pub fn required_str<'a>(arguments: &'a Arguments, name: &str) -> ToolResult<&'a str> {
    match arguments.get(name) {
        None | Some(Value::Null) => Err(ToolError::missing_argument(name)),
        Some(Value::String(s)) => Ok(s.as_str()),
        Some(other) => Err(ToolError::invalid_argument(
            name,
            format!("expected a string, got {}", json_kind(other)),
        )),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Construct every handler and register it.
///
/// Runs once before serving; the returned registry is not mutated afterwards.
pub fn build_registry(config: Arc<DatabaseConfig>, backend: Arc<dyn SqlBackend>) -> ToolRegistry {
    let engine = ExecutionEngine::new(backend);
    let execute: Arc<dyn ToolHandler> = Arc::new(ExecuteSqlHandler::new(engine, config.clone()));

    let mut registry = ToolRegistry::new();
    registry.register(execute.clone());
    registry.register(Arc::new(CompositeHandler::health_check(execute.clone())));
    registry.register(Arc::new(CompositeHandler::lock_report(execute.clone())));
    for lookup in SchemaLookup::ALL {
        registry.register(Arc::new(SchemaLookupHandler::new(
            lookup,
            config.clone(),
            execute.clone(),
        )));
    }

    info!(
        tools = registry.len(),
        role = %config.role,
        "Tool registry initialized"
    );
    registry
}
