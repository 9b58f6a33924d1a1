//! The `execute_sql` tool.

use crate::config::DatabaseConfig;
use crate::engine::ExecutionEngine;
use crate::error::ToolResult;
use crate::tools::{Arguments, ToolDescriptor, ToolHandler, input_schema, required_str};
use async_trait::async_trait;
use schemars::JsonSchema;
use std::sync::Arc;

pub const EXECUTE_SQL: &str = "execute_sql";

/// Input for the execute_sql tool.
#[derive(Debug, JsonSchema)]
pub struct ExecuteSqlInput {
    /// SQL text; multiple statements are separated by `;`
    pub query: String,
}

/// Runs a statement batch under the configured role and returns the joined
/// per-statement results as a single text block.
pub struct ExecuteSqlHandler {
    engine: ExecutionEngine,
    config: Arc<DatabaseConfig>,
}

impl ExecuteSqlHandler {
    pub fn new(engine: ExecutionEngine, config: Arc<DatabaseConfig>) -> Self {
        Self { engine, config }
    }
}

#[async_trait]
impl ToolHandler for ExecuteSqlHandler {
    fn descriptor(&self) -> ToolDescriptor {
        ToolDescriptor::new(
            EXECUTE_SQL,
            "Execute SQL on the configured database.\n\
             Multiple statements may be separated by ';' and run in order on one connection.\n\
             Each statement is checked against the configured role; denied or failing statements \
             are reported in place and the rest still run.\n\
             Results are CSV-like (NULL for missing values), separated by '---' lines.",
            input_schema::<ExecuteSqlInput>(),
        )
    }

    async fn invoke(&self, arguments: &Arguments) -> ToolResult<Vec<String>> {
        let query = required_str(arguments, "query")?;
        let text = self.engine.execute_batch(query, &self.config).await?;
        Ok(vec![text])
    }
}
