//! Configuration handling for the MySQL MCP Server.
//!
//! This module provides configuration management via CLI arguments and environment variables.
//! The database settings use the conventional `MYSQL_*` variables so an existing `.env`-style
//! deployment keeps working when the variables are exported into the process environment.

use crate::error::{ToolError, ToolResult};
use clap::{Args, Parser, ValueEnum};
use std::fmt;
use std::time::Duration;

pub const DEFAULT_HTTP_HOST: &str = "127.0.0.1";
pub const DEFAULT_HTTP_PORT: u16 = 9000;
pub const DEFAULT_MCP_ENDPOINT: &str = "/mcp";
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

pub const DEFAULT_DB_HOST: &str = "localhost";
pub const DEFAULT_DB_PORT: u16 = 3306;
pub const DEFAULT_DB_USER: &str = "root";
pub const DEFAULT_ROLE: &str = "readonly";

/// Transport mode for the MCP server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum TransportMode {
    /// Standard input/output (for CLI integration)
    #[default]
    Stdio,
    /// Streamable HTTP with Server-Sent Events (for web clients)
    Http,
}

impl fmt::Display for TransportMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stdio => write!(f, "stdio"),
            Self::Http => write!(f, "http"),
        }
    }
}

/// Relational backend the engine connects to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Driver {
    /// MySQL or MariaDB
    #[default]
    Mysql,
    Postgres,
    /// SQLite; `database` is the file path
    Sqlite,
}

impl Driver {
    /// Whether this driver connects over the network (host/port/user apply).
    pub fn is_networked(&self) -> bool {
        !matches!(self, Self::Sqlite)
    }
}

impl fmt::Display for Driver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Mysql => write!(f, "mysql"),
            Self::Postgres => write!(f, "postgres"),
            Self::Sqlite => write!(f, "sqlite"),
        }
    }
}

/// Connection parameters and role consumed by the execution engine.
#[derive(Clone, Args)]
pub struct DatabaseConfig {
    /// Database server host
    #[arg(long, default_value = DEFAULT_DB_HOST, env = "MYSQL_HOST")]
    pub host: String,

    /// Database server port
    #[arg(long, default_value_t = DEFAULT_DB_PORT, env = "MYSQL_PORT")]
    pub port: u16,

    /// Database user
    #[arg(long, default_value = DEFAULT_DB_USER, env = "MYSQL_USER")]
    pub user: String,

    /// Database password (sensitive - never logged)
    #[arg(long, default_value = "", env = "MYSQL_PASSWORD", hide_env_values = true)]
    pub password: String,

    /// Database (schema) name; the file path for SQLite
    #[arg(long, default_value = "", env = "MYSQL_DATABASE")]
    pub database: String,

    /// Permission role: readonly, writer or admin. Unknown roles are treated as readonly.
    #[arg(long, default_value = DEFAULT_ROLE, env = "MYSQL_ROLE")]
    pub role: String,

    /// Database driver
    #[arg(long, value_enum, default_value = "mysql", env = "MYSQL_DRIVER")]
    pub driver: Driver,

    /// Connection timeout in seconds
    #[arg(
        long,
        default_value_t = DEFAULT_CONNECT_TIMEOUT_SECS,
        env = "MYSQL_CONNECT_TIMEOUT"
    )]
    pub connect_timeout: u64,
}

impl DatabaseConfig {
    /// Create a SQLite configuration for the given file (useful for testing).
    pub fn sqlite(path: impl Into<String>, role: impl Into<String>) -> Self {
        Self {
            host: String::new(),
            port: DEFAULT_DB_PORT,
            user: String::new(),
            password: String::new(),
            database: path.into(),
            role: role.into(),
            driver: Driver::Sqlite,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT_SECS,
        }
    }

    /// Check that the connection parameters are usable.
    pub fn validate(&self) -> ToolResult<()> {
        if self.driver.is_networked() {
            if self.host.trim().is_empty() {
                return Err(ToolError::configuration("host must not be empty"));
            }
            if self.port == 0 {
                return Err(ToolError::configuration("port must be greater than 0"));
            }
            if self.user.trim().is_empty() {
                return Err(ToolError::configuration("user must not be empty"));
            }
        } else if self.database.trim().is_empty() {
            return Err(ToolError::configuration(
                "SQLite requires a database file path",
            ));
        }
        if self.connect_timeout == 0 {
            return Err(ToolError::configuration(
                "connect_timeout must be greater than 0",
            ));
        }
        Ok(())
    }

    /// Get the connection timeout as a Duration.
    pub fn connect_timeout_duration(&self) -> Duration {
        Duration::from_secs(self.connect_timeout)
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_DB_HOST.to_string(),
            port: DEFAULT_DB_PORT,
            user: DEFAULT_DB_USER.to_string(),
            password: String::new(),
            database: String::new(),
            role: DEFAULT_ROLE.to_string(),
            driver: Driver::Mysql,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT_SECS,
        }
    }
}

impl fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &"***")
            .field("database", &self.database)
            .field("role", &self.role)
            .field("driver", &self.driver)
            .field("connect_timeout", &self.connect_timeout)
            .finish()
    }
}

/// Configuration for the MySQL MCP Server.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "mysql-mcp-server",
    about = "MCP server exposing role-gated SQL execution and MySQL diagnostics tools",
    version,
    author
)]
pub struct Config {
    #[command(flatten)]
    pub database: DatabaseConfig,

    /// Transport mode (stdio or http)
    #[arg(
        short,
        long,
        value_enum,
        default_value = "stdio",
        env = "MCP_TRANSPORT"
    )]
    pub transport: TransportMode,

    /// HTTP host to bind to (only used with http transport)
    #[arg(
        long,
        default_value = DEFAULT_HTTP_HOST,
        env = "MCP_HTTP_HOST"
    )]
    pub http_host: String,

    /// HTTP port to bind to (only used with http transport)
    #[arg(
        long,
        default_value_t = DEFAULT_HTTP_PORT,
        env = "MCP_HTTP_PORT"
    )]
    pub http_port: u16,

    /// MCP endpoint path (only used with http transport)
    #[arg(
        long,
        default_value = DEFAULT_MCP_ENDPOINT,
        env = "MCP_ENDPOINT"
    )]
    pub mcp_endpoint: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info", env = "MCP_LOG_LEVEL")]
    pub log_level: String,

    /// Enable JSON logging format
    #[arg(long, env = "MCP_JSON_LOGS")]
    pub json_logs: bool,
}

impl Config {
    /// Create a default configuration (useful for testing).
    pub fn default_config() -> Self {
        Self {
            database: DatabaseConfig::default(),
            transport: TransportMode::Stdio,
            http_host: DEFAULT_HTTP_HOST.to_string(),
            http_port: DEFAULT_HTTP_PORT,
            mcp_endpoint: DEFAULT_MCP_ENDPOINT.to_string(),
            log_level: "info".to_string(),
            json_logs: false,
        }
    }

    /// Get the HTTP bind address.
    pub fn http_bind_addr(&self) -> String {
        format!("{}:{}", self.http_host, self.http_port)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::default_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.transport, TransportMode::Stdio);
        assert_eq!(config.http_host, DEFAULT_HTTP_HOST);
        assert_eq!(config.http_port, DEFAULT_HTTP_PORT);
        assert_eq!(config.database.role, "readonly");
        assert_eq!(config.database.driver, Driver::Mysql);
    }

    #[test]
    fn test_http_bind_addr() {
        let config = Config {
            http_host: "0.0.0.0".to_string(),
            http_port: 3000,
            ..Config::default()
        };
        assert_eq!(config.http_bind_addr(), "0.0.0.0:3000");
    }

    #[test]
    fn test_parse_cli_arguments() {
        let config = Config::try_parse_from([
            "mysql-mcp-server",
            "--host",
            "db.internal",
            "--port",
            "3307",
            "--user",
            "app",
            "--database",
            "shop",
            "--role",
            "writer",
            "--transport",
            "http",
        ])
        .unwrap();

        assert_eq!(config.database.host, "db.internal");
        assert_eq!(config.database.port, 3307);
        assert_eq!(config.database.user, "app");
        assert_eq!(config.database.database, "shop");
        assert_eq!(config.database.role, "writer");
        assert_eq!(config.transport, TransportMode::Http);
    }

    #[test]
    fn test_parse_rejects_non_numeric_port() {
        let result = Config::try_parse_from(["mysql-mcp-server", "--port", "three"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_validate_default_mysql_config() {
        assert!(DatabaseConfig::default().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_empty_host() {
        let config = DatabaseConfig {
            host: "  ".to_string(),
            ..DatabaseConfig::default()
        };
        let err = config.validate().unwrap_err();
        assert!(matches!(err, ToolError::Configuration { .. }));
        assert!(err.to_string().contains("host"));
    }

    #[test]
    fn test_validate_rejects_zero_port() {
        let config = DatabaseConfig {
            port: 0,
            ..DatabaseConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ToolError::Configuration { .. })
        ));
    }

    #[test]
    fn test_validate_sqlite_requires_path() {
        assert!(DatabaseConfig::sqlite("", "admin").validate().is_err());
        // host/user are irrelevant for SQLite
        assert!(DatabaseConfig::sqlite("data.db", "admin").validate().is_ok());
    }

    #[test]
    fn test_debug_redacts_password() {
        let config = DatabaseConfig {
            password: "Autotest@2024".to_string(),
            ..DatabaseConfig::default()
        };
        let debug = format!("{:?}", config);
        assert!(!debug.contains("Autotest@2024"));
        assert!(debug.contains("***"));
    }

    #[test]
    fn test_connect_timeout_duration() {
        let config = DatabaseConfig {
            connect_timeout: 15,
            ..DatabaseConfig::default()
        };
        assert_eq!(config.connect_timeout_duration(), Duration::from_secs(15));
    }
}
