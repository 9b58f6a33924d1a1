//! MySQL MCP Server - Main entry point.
//!
//! Serves role-gated SQL execution and MySQL diagnostics tools over stdio
//! or streamable HTTP.

use clap::Parser;
use mysql_mcp_server::config::{Config, TransportMode};
use mysql_mcp_server::db::SqlxBackend;
use mysql_mcp_server::tools::build_registry;
use mysql_mcp_server::transport::{HttpTransport, StdioTransport, Transport};
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Initialize the tracing subscriber for logging.
///
/// Logs go to stderr; stdout carries the stdio protocol stream.
fn init_tracing(config: &Config) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    let subscriber = tracing_subscriber::registry().with(filter);

    if config.json_logs {
        subscriber
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        subscriber
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_writer(std::io::stderr),
            )
            .init();
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::parse();

    init_tracing(&config);

    info!(
        transport = %config.transport,
        "Starting MySQL MCP Server v{}",
        env!("CARGO_PKG_VERSION")
    );
    info!(database = ?config.database, "Database configuration");

    // Each invocation validates again; this only surfaces mistakes early.
    if let Err(e) = config.database.validate() {
        warn!(error = %e, "Database configuration is invalid; tool calls will fail");
    }

    let registry = Arc::new(build_registry(
        Arc::new(config.database.clone()),
        Arc::new(SqlxBackend::new()),
    ));

    let result = match config.transport {
        TransportMode::Stdio => {
            info!("Using stdio transport");
            StdioTransport::new(registry).run().await
        }
        TransportMode::Http => {
            info!(
                addr = %config.http_bind_addr(),
                endpoint = %config.mcp_endpoint,
                "Using HTTP transport"
            );
            HttpTransport::new(
                registry,
                &config.http_host,
                config.http_port,
                &config.mcp_endpoint,
            )
            .run()
            .await
        }
    };

    if let Err(e) = result {
        error!(error = %e, "Server error");
        return Err(e.into());
    }

    info!("Server shutdown complete");
    Ok(())
}
