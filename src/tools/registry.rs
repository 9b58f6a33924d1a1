//! Tool registry.

use crate::error::{ToolError, ToolResult};
use crate::tools::{Arguments, ToolDescriptor, ToolHandler, ToolOutput};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, warn};

/// Name → handler table.
///
/// Populated during startup, then shared read-only behind an `Arc`.
#[derive(Default, Clone)]
pub struct ToolRegistry {
    tools: HashMap<String, Arc<dyn ToolHandler>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `handler` under its declared name. A later registration with the
    /// same name replaces the earlier one.
    pub fn register(&mut self, handler: Arc<dyn ToolHandler>) {
        let name = handler.descriptor().name;
        debug!(tool = %name, "Registering tool");
        if self.tools.insert(name.clone(), handler).is_some() {
            debug!(tool = %name, "Replaced previously registered tool");
        }
    }

    pub fn lookup(&self, name: &str) -> ToolResult<Arc<dyn ToolHandler>> {
        self.tools
            .get(name)
            .cloned()
            .ok_or_else(|| ToolError::not_found(name))
    }

    /// One descriptor per registered handler, in no particular order.
    pub fn list_descriptors(&self) -> Vec<ToolDescriptor> {
        self.tools.values().map(|h| h.descriptor()).collect()
    }

    /// Look up and run a tool.
    ///
    /// Fails only for an unknown name. Errors raised by the handler itself
    /// are rendered as a single error text.
    pub async fn invoke(&self, name: &str, arguments: &Arguments) -> ToolResult<ToolOutput> {
        let handler = self.lookup(name)?;
        debug!(tool = %name, "Invoking tool");
        match handler.invoke(arguments).await {
            Ok(content) => Ok(ToolOutput::success(content)),
            Err(e) => {
                warn!(tool = %name, error = %e, "Tool invocation failed");
                Ok(ToolOutput::error(render_error(&e)))
            }
        }
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

fn render_error(err: &ToolError) -> String {
    match err.suggestion() {
        Some(suggestion) => format!("{}\nSuggestion: {}", err, suggestion),
        None => err.to_string(),
    }
}
