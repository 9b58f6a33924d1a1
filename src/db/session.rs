//! Backend seam used by the execution engine.
//!
//! A `SqlBackend` opens one `SqlSession` per tool invocation. The session is
//! owned by that invocation alone and is never shared or pooled.

use crate::config::DatabaseConfig;
use crate::engine::format::Cell;
use crate::error::ToolResult;
use async_trait::async_trait;

/// Raw result of one executed statement, before permission bookkeeping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawResult {
    /// The statement returned a result set (possibly with zero rows).
    Rows {
        columns: Vec<String>,
        rows: Vec<Vec<Cell>>,
    },
    /// The statement returned no result set.
    Affected(u64),
}

/// Opens sessions against a relational database.
#[async_trait]
pub trait SqlBackend: Send + Sync {
    /// Acquire a single connection. Failure aborts the whole invocation.
    async fn connect(&self, config: &DatabaseConfig) -> ToolResult<Box<dyn SqlSession>>;
}

/// One connection plus its statement cursor.
///
/// Dropping a session releases the underlying connection; `close` does the
/// same gracefully on the normal path.
#[async_trait]
pub trait SqlSession: Send {
    /// Run one statement and fetch its full result.
    async fn execute(&mut self, sql: &str) -> ToolResult<RawResult>;

    /// Make preceding mutations durable.
    async fn commit(&mut self) -> ToolResult<()>;

    /// Close the connection.
    async fn close(self: Box<Self>);
}
