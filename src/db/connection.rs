//! sqlx-backed sessions.
//!
//! Each session owns exactly one driver-specific connection (no pool), opened
//! with the invocation's `DatabaseConfig` and released when the session is
//! closed or dropped.

use crate::config::{DatabaseConfig, Driver};
use crate::db::session::{RawResult, SqlBackend, SqlSession};
use crate::db::types::{column_names, decode_row};
use crate::error::{ToolError, ToolResult};
use crate::impl_conn_dispatch;
use async_trait::async_trait;
use futures_util::TryStreamExt;
use sqlx::mysql::{MySqlConnectOptions, MySqlConnection};
use sqlx::postgres::{PgConnectOptions, PgConnection};
use sqlx::sqlite::{SqliteConnectOptions, SqliteConnection};
use sqlx::{Column, ConnectOptions, Connection, Either, Executor, Statement};
use tokio::time::timeout;
use tracing::{debug, info};

/// Driver-specific connection (avoids AnyConnection limitations).
#[derive(Debug)]
pub enum DbConnection {
    MySql(MySqlConnection),
    Postgres(PgConnection),
    SQLite(SqliteConnection),
}

impl DbConnection {
    pub fn driver(&self) -> Driver {
        match self {
            Self::MySql(_) => Driver::Mysql,
            Self::Postgres(_) => Driver::Postgres,
            Self::SQLite(_) => Driver::Sqlite,
        }
    }
}

/// Backend that opens a fresh sqlx connection per invocation.
#[derive(Debug, Clone, Copy, Default)]
pub struct SqlxBackend;

impl SqlxBackend {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl SqlBackend for SqlxBackend {
    async fn connect(&self, config: &DatabaseConfig) -> ToolResult<Box<dyn SqlSession>> {
        let conn = match timeout(config.connect_timeout_duration(), open_connection(config)).await
        {
            Ok(result) => result?,
            Err(_) => {
                return Err(ToolError::timeout(
                    "database connect",
                    config.connect_timeout,
                ));
            }
        };

        info!(
            driver = %config.driver,
            host = %config.host,
            database = %config.database,
            "Database connection established"
        );
        Ok(Box::new(SqlxSession { conn }))
    }
}

async fn open_connection(config: &DatabaseConfig) -> ToolResult<DbConnection> {
    match config.driver {
        Driver::Mysql => {
            let mut options = MySqlConnectOptions::new()
                .host(&config.host)
                .port(config.port)
                .username(&config.user)
                .password(&config.password);
            if !config.database.is_empty() {
                options = options.database(&config.database);
            }
            let conn = options.connect().await.map_err(connect_error)?;
            Ok(DbConnection::MySql(conn))
        }
        Driver::Postgres => {
            let mut options = PgConnectOptions::new()
                .host(&config.host)
                .port(config.port)
                .username(&config.user)
                .password(&config.password);
            if !config.database.is_empty() {
                options = options.database(&config.database);
            }
            let conn = options.connect().await.map_err(connect_error)?;
            Ok(DbConnection::Postgres(conn))
        }
        Driver::Sqlite => {
            let conn = SqliteConnectOptions::new()
                .filename(&config.database)
                .connect()
                .await
                .map_err(connect_error)?;
            Ok(DbConnection::SQLite(conn))
        }
    }
}

// Any failure while connecting (including authentication) is a connection error.
fn connect_error(err: sqlx::Error) -> ToolError {
    ToolError::connection(
        err.to_string(),
        "Check host, port, credentials and that the database exists",
    )
}

/// One open connection; statements run on it strictly in call order.
#[derive(Debug)]
pub struct SqlxSession {
    conn: DbConnection,
}

#[async_trait]
impl SqlSession for SqlxSession {
    async fn execute(&mut self, sql: &str) -> ToolResult<RawResult> {
        impl_conn_dispatch!(&mut self.conn, conn => {
            let mut rows = Vec::new();
            let mut rows_affected: u64 = 0;
            {
                let mut stream = (&mut *conn).fetch_many(sql);
                while let Some(step) = stream.try_next().await? {
                    match step {
                        Either::Left(result) => rows_affected += result.rows_affected(),
                        Either::Right(row) => rows.push(row),
                    }
                }
            }

            if let Some(first) = rows.first() {
                let columns = column_names(first);
                let rows = rows.iter().map(decode_row).collect();
                return Ok(RawResult::Rows { columns, rows });
            }

            // An empty result set still has columns; mutations have none.
            // Statements the server refuses to describe count as having none.
            let columns: Vec<String> = match (&mut *conn).prepare(sql).await {
                Ok(statement) => statement
                    .columns()
                    .iter()
                    .map(|c| c.name().to_string())
                    .collect(),
                Err(e) => {
                    debug!(error = %e, "Statement could not be described; treating as no result set");
                    Vec::new()
                }
            };
            if columns.is_empty() {
                Ok(RawResult::Affected(rows_affected))
            } else {
                Ok(RawResult::Rows { columns, rows: Vec::new() })
            }
        })
    }

    async fn commit(&mut self) -> ToolResult<()> {
        match &mut self.conn {
            DbConnection::MySql(conn) => {
                conn.execute("COMMIT").await?;
                Ok(())
            }
            // Autocommit: each statement is already durable.
            DbConnection::Postgres(_) | DbConnection::SQLite(_) => Ok(()),
        }
    }

    async fn close(self: Box<Self>) {
        let driver = self.conn.driver();
        let result = match self.conn {
            DbConnection::MySql(conn) => conn.close().await,
            DbConnection::Postgres(conn) => conn.close().await,
            DbConnection::SQLite(conn) => conn.close().await,
        };
        match result {
            Ok(()) => debug!(driver = %driver, "Database connection closed"),
            Err(e) => debug!(driver = %driver, error = %e, "Error while closing connection"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_connect_to_missing_sqlite_file_is_connection_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("nope.db");
        let config = DatabaseConfig::sqlite(path.to_str().unwrap(), "admin");

        let err = SqlxBackend::new().connect(&config).await.err().unwrap();
        assert!(matches!(err, ToolError::Connection { .. }));
    }

    #[tokio::test]
    async fn test_sqlite_session_reports_rows_and_mutations() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let config = DatabaseConfig::sqlite(file.path().to_str().unwrap(), "admin");
        let mut session = SqlxBackend::new().connect(&config).await.unwrap();

        let created = session
            .execute("CREATE TABLE t (id INTEGER PRIMARY KEY, name TEXT)")
            .await
            .unwrap();
        assert_eq!(created, RawResult::Affected(0));

        let inserted = session
            .execute("INSERT INTO t (id, name) VALUES (1, 'a'), (2, NULL)")
            .await
            .unwrap();
        assert_eq!(inserted, RawResult::Affected(2));
        session.commit().await.unwrap();

        let selected = session
            .execute("SELECT id, name FROM t ORDER BY id")
            .await
            .unwrap();
        assert_eq!(
            selected,
            RawResult::Rows {
                columns: vec!["id".to_string(), "name".to_string()],
                rows: vec![
                    vec![Some("1".to_string()), Some("a".to_string())],
                    vec![Some("2".to_string()), None],
                ],
            }
        );

        session.close().await;
    }

    #[tokio::test]
    async fn test_sqlite_empty_select_keeps_columns() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let config = DatabaseConfig::sqlite(file.path().to_str().unwrap(), "admin");
        let mut session = SqlxBackend::new().connect(&config).await.unwrap();

        session
            .execute("CREATE TABLE t (id INTEGER, name TEXT)")
            .await
            .unwrap();
        let result = session.execute("SELECT id, name FROM t").await.unwrap();
        assert_eq!(
            result,
            RawResult::Rows {
                columns: vec!["id".to_string(), "name".to_string()],
                rows: vec![],
            }
        );
    }

    #[tokio::test]
    async fn test_sqlite_invalid_statement_is_statement_error() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let config = DatabaseConfig::sqlite(file.path().to_str().unwrap(), "admin");
        let mut session = SqlxBackend::new().connect(&config).await.unwrap();

        let err = session.execute("INVALID SQL").await.unwrap_err();
        assert!(matches!(err, ToolError::Statement { .. }));

        // The session stays usable after a failed statement.
        assert!(session.execute("SELECT 1").await.is_ok());
    }
}
