//! MCP service implementation using rmcp.
//!
//! `tools/list` and `tools/call` are served straight from the `ToolRegistry`
//! built at startup, so the advertised tool set is exactly what was
//! registered.

use crate::tools::{Arguments, ToolDescriptor, ToolOutput, ToolRegistry};
use rmcp::{
    ErrorData as McpError, RoleServer, ServerHandler,
    model::{
        CallToolRequestParam, CallToolResult, Content, Implementation, ListToolsResult,
        PaginatedRequestParam, ProtocolVersion, ServerCapabilities, ServerInfo, Tool,
    },
    service::RequestContext,
};
use std::sync::Arc;
use tracing::{debug, warn};

#[derive(Clone)]
pub struct SqlToolService {
    /// Read-only tool table shared by every session
    registry: Arc<ToolRegistry>,
}

impl SqlToolService {
    /// Create a new service over a fully built registry.
    pub fn new(registry: Arc<ToolRegistry>) -> Self {
        Self { registry }
    }

    /// Registered tools in protocol form.
    pub fn tools(&self) -> Vec<Tool> {
        self.registry
            .list_descriptors()
            .into_iter()
            .map(to_mcp_tool)
            .collect()
    }

    /// Invoke a tool by name.
    ///
    /// Unknown names are a protocol error; every other failure is a tool
    /// result flagged as an error.
    pub async fn call(
        &self,
        name: &str,
        arguments: Option<Arguments>,
    ) -> Result<CallToolResult, McpError> {
        let arguments = arguments.unwrap_or_default();
        let output = self.registry.invoke(name, &arguments).await.map_err(|e| {
            warn!(tool = %name, error = %e, "Tool call rejected");
            McpError::from(e)
        })?;
        Ok(to_call_result(output))
    }
}

fn to_mcp_tool(descriptor: ToolDescriptor) -> Tool {
    Tool::new(
        descriptor.name,
        descriptor.description,
        Arc::new(descriptor.input_schema),
    )
}

fn to_call_result(output: ToolOutput) -> CallToolResult {
    let content = output.content.into_iter().map(Content::text).collect();
    if output.is_error {
        CallToolResult::error(content)
    } else {
        CallToolResult::success(content)
    }
}

impl ServerHandler for SqlToolService {
    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, McpError> {
        let tools = self.tools();
        debug!(count = tools.len(), "Listing tools");
        Ok(ListToolsResult::with_all_items(tools))
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, McpError> {
        self.call(&request.name, request.arguments).await
    }

    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2025_03_26,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "mysql-mcp-server".to_owned(),
                title: Some("MySQL MCP Server".to_owned()),
                version: env!("CARGO_PKG_VERSION").to_owned(),
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "SQL tools for the configured database.\n\
                \n\
                ## Tools\n\
                - `execute_sql`: run one or more statements separated by `;`\n\
                - `get_db_health_running`: connections, locks, transactions, InnoDB status\n\
                - `get_table_lock`: tables in use and row-lock waits\n\
                - `get_table_name`: find tables by comment text\n\
                - `get_table_desc` / `get_table_index`: columns or indexes of comma-separated tables\n\
                \n\
                ## Permissions\n\
                Every statement is checked against the configured role:\n\
                - `readonly`: SELECT, SHOW, DESCRIBE, EXPLAIN\n\
                - `writer`: also INSERT, UPDATE, DELETE\n\
                - `admin`: also DDL, user management and maintenance statements\n\
                Denied statements are reported in place; the remaining statements still run.\n\
                \n\
                ## Output\n\
                CSV-like rows (header first, NULL for missing values); results of consecutive \
                statements are separated by `---` lines."
                    .to_string(),
            ),
        }
    }
}
