//! Error types for the MySQL MCP Server.
//!
//! `ToolError` covers every failure that can abort a tool invocation or be
//! reported for a single statement. Statement-level failures never abort a
//! batch: the execution engine converts them into ordinary outcomes.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ToolError {
    #[error("Invalid configuration: {message}")]
    Configuration { message: String },

    #[error("Database connection failed: {message}")]
    Connection { message: String, suggestion: String },

    #[error("Missing required argument: {argument}")]
    MissingArgument { argument: String },

    #[error("Invalid argument '{argument}': {message}")]
    InvalidArgument { argument: String, message: String },

    #[error("Unknown tool: {name}")]
    NotFound { name: String },

    #[error("{}", format_statement_error(.message, .sql_state.as_deref()))]
    Statement {
        message: String,
        /// e.g., "42S02" for unknown table
        sql_state: Option<String>,
    },

    #[error("Timeout: {operation} exceeded {elapsed_secs}s")]
    Timeout {
        operation: String,
        elapsed_secs: u64,
    },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

fn format_statement_error(message: &str, sql_state: Option<&str>) -> String {
    match sql_state {
        Some(code) => format!("{} (SQLSTATE: {})", message, code),
        None => message.to_string(),
    }
}

impl ToolError {
    /// Create a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create a connection error with a helpful suggestion.
    pub fn connection(message: impl Into<String>, suggestion: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
            suggestion: suggestion.into(),
        }
    }

    /// Create a missing argument error.
    pub fn missing_argument(argument: impl Into<String>) -> Self {
        Self::MissingArgument {
            argument: argument.into(),
        }
    }

    /// Create an invalid argument error.
    pub fn invalid_argument(argument: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            argument: argument.into(),
            message: message.into(),
        }
    }

    /// Create a not found error for an unregistered tool name.
    pub fn not_found(name: impl Into<String>) -> Self {
        Self::NotFound { name: name.into() }
    }

    /// Create a statement error with optional SQL state.
    pub fn statement(message: impl Into<String>, sql_state: Option<String>) -> Self {
        Self::Statement {
            message: message.into(),
            sql_state,
        }
    }

    /// Create a timeout error.
    pub fn timeout(operation: impl Into<String>, elapsed_secs: u64) -> Self {
        Self::Timeout {
            operation: operation.into(),
            elapsed_secs,
        }
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Get the suggestion for this error, if available.
    pub fn suggestion(&self) -> Option<&str> {
        match self {
            Self::Connection { suggestion, .. } => Some(suggestion),
            _ => None,
        }
    }
}

/// Convert sqlx errors to ToolError.
impl From<sqlx::Error> for ToolError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Configuration(msg) => ToolError::connection(
                msg.to_string(),
                "Check the connection parameters and credentials",
            ),
            sqlx::Error::Database(db_err) => {
                let code = db_err.code().map(|c| c.to_string());
                ToolError::statement(db_err.message(), code)
            }
            sqlx::Error::Io(io_err) => ToolError::connection(
                format!("I/O error: {}", io_err),
                "Check network connectivity and database server status",
            ),
            sqlx::Error::Tls(tls_err) => ToolError::connection(
                format!("TLS error: {}", tls_err),
                "Verify TLS configuration and certificates",
            ),
            sqlx::Error::Protocol(msg) => ToolError::connection(
                format!("Protocol error: {}", msg),
                "Check database server compatibility",
            ),
            sqlx::Error::ColumnDecode { index, source } => {
                ToolError::internal(format!("Failed to decode column {}: {}", index, source))
            }
            sqlx::Error::Decode(source) => ToolError::internal(format!("Decode error: {}", source)),
            sqlx::Error::WorkerCrashed => ToolError::internal("Database worker crashed"),
            _ => ToolError::internal(format!("Unknown database error: {}", err)),
        }
    }
}

/// Result type alias for tool operations.
pub type ToolResult<T> = Result<T, ToolError>;

/// Build suggestion data as JSON value.
fn suggestion_data(suggestion: Option<&str>) -> Option<serde_json::Value> {
    suggestion.map(|s| serde_json::json!({ "suggestion": s }))
}

/// Convert ToolError to MCP ErrorData for protocol-level failures.
impl From<ToolError> for rmcp::ErrorData {
    fn from(err: ToolError) -> Self {
        match &err {
            ToolError::NotFound { .. } => rmcp::ErrorData::resource_not_found(
                err.to_string(),
                suggestion_data(Some("Call tools/list to get the available tool names")),
            ),
            ToolError::MissingArgument { .. }
            | ToolError::InvalidArgument { .. }
            | ToolError::Statement { .. } => {
                rmcp::ErrorData::invalid_params(err.to_string(), suggestion_data(err.suggestion()))
            }
            ToolError::Configuration { .. }
            | ToolError::Connection { .. }
            | ToolError::Timeout { .. }
            | ToolError::Internal { .. } => {
                rmcp::ErrorData::internal_error(err.to_string(), suggestion_data(err.suggestion()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ToolError::connection("Access denied for user 'root'", "Check credentials");
        assert_eq!(
            err.to_string(),
            "Database connection failed: Access denied for user 'root'"
        );
    }

    #[test]
    fn test_statement_error_includes_sql_state() {
        let err = ToolError::statement("Table 'shop.t' doesn't exist", Some("42S02".to_string()));
        assert_eq!(
            err.to_string(),
            "Table 'shop.t' doesn't exist (SQLSTATE: 42S02)"
        );

        let err = ToolError::statement("near \"INVALID\": syntax error", None);
        assert_eq!(err.to_string(), "near \"INVALID\": syntax error");
    }

    #[test]
    fn test_missing_argument_display() {
        let err = ToolError::missing_argument("query");
        assert_eq!(err.to_string(), "Missing required argument: query");
    }

    #[test]
    fn test_error_suggestion() {
        let err = ToolError::connection("refused", "Check the server is running");
        assert_eq!(err.suggestion(), Some("Check the server is running"));
        assert_eq!(ToolError::missing_argument("query").suggestion(), None);
    }

    #[test]
    fn test_not_found_maps_to_resource_not_found() {
        let mcp_err: rmcp::ErrorData = ToolError::not_found("drop_everything").into();
        // resource_not_found uses -32002 in rmcp
        assert_eq!(mcp_err.code.0, -32002);
        assert!(mcp_err.message.contains("drop_everything"));
    }

    #[test]
    fn test_argument_errors_map_to_invalid_params() {
        let mcp_err: rmcp::ErrorData = ToolError::missing_argument("query").into();
        assert_eq!(mcp_err.code.0, -32602);

        let mcp_err: rmcp::ErrorData = ToolError::invalid_argument("text", "bad").into();
        assert_eq!(mcp_err.code.0, -32602);
    }

    #[test]
    fn test_connection_maps_to_internal_error_with_suggestion() {
        let mcp_err: rmcp::ErrorData = ToolError::connection("failed", "try reconnecting").into();
        assert_eq!(mcp_err.code.0, -32603);
        let data = mcp_err.data.unwrap();
        assert_eq!(data["suggestion"], "try reconnecting");
    }

    #[test]
    fn test_configuration_maps_to_internal_error() {
        let mcp_err: rmcp::ErrorData = ToolError::configuration("port must be non-zero").into();
        assert_eq!(mcp_err.code.0, -32603);
    }
}
