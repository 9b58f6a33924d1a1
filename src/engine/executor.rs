//! Permission-gated statement execution.
//!
//! The engine opens one session per call, walks the statements in order, and
//! produces exactly one `StatementOutcome` per statement. Denied statements
//! never reach the database. A failing statement is recorded in place and the
//! remaining statements still run. Each mutation is committed as soon as it
//! succeeds, so earlier mutations survive later failures.

use crate::config::DatabaseConfig;
use crate::db::{RawResult, SqlBackend};
use crate::engine::format::{StatementOutcome, join_outcomes};
use crate::engine::permission::{PermissionSet, READONLY_VERBS, permissions_for};
use crate::engine::splitter::{Statement, split_statements};
use crate::error::ToolResult;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info, warn};

/// Executes statement batches against a backend.
#[derive(Clone)]
pub struct ExecutionEngine {
    backend: Arc<dyn SqlBackend>,
}

impl ExecutionEngine {
    pub fn new(backend: Arc<dyn SqlBackend>) -> Self {
        Self { backend }
    }

    /// Run `statements` on a single connection.
    ///
    /// Only connection acquisition can fail the call as a whole; in that case
    /// no outcomes are produced. Otherwise the returned list has one entry per
    /// input statement, in input order.
    pub async fn execute(
        &self,
        statements: &[Statement],
        permissions: &PermissionSet,
        config: &DatabaseConfig,
    ) -> ToolResult<Vec<StatementOutcome>> {
        let start = Instant::now();
        let mut session = self.backend.connect(config).await.inspect_err(|e| {
            error!(error = %e, "Database connection failed");
        })?;

        let mut outcomes = Vec::with_capacity(statements.len());
        for statement in statements {
            let verb = statement.verb();
            if !permissions.allows(verb) {
                warn!(
                    role = %permissions.role(),
                    verb = %verb,
                    "Statement denied for role"
                );
                outcomes.push(StatementOutcome::PermissionDenied {
                    role: permissions.role().to_string(),
                    verb: verb.to_string(),
                });
                continue;
            }

            debug!(sql = %statement.text(), "Executing statement");
            let outcome = match session.execute(statement.text()).await {
                Ok(RawResult::Rows { columns, rows }) => {
                    debug!(rows = rows.len(), "Statement returned result set");
                    StatementOutcome::Tabular { columns, rows }
                }
                // Read-only verbs have nothing to commit, even when the
                // backend reports no result set for them.
                Ok(RawResult::Affected(rows_affected)) if READONLY_VERBS.contains(&verb) => {
                    debug!(verb = %verb, "Read-only statement returned no result set");
                    StatementOutcome::MutationStatus { rows_affected }
                }
                Ok(RawResult::Affected(rows_affected)) => match session.commit().await {
                    Ok(()) => {
                        info!(rows_affected = rows_affected, "Statement executed and committed");
                        StatementOutcome::MutationStatus { rows_affected }
                    }
                    Err(e) => execution_error(statement, e.to_string()),
                },
                Err(e) => execution_error(statement, e.to_string()),
            };
            outcomes.push(outcome);
        }

        session.close().await;

        let failed = outcomes.iter().filter(|o| o.is_error()).count();
        if failed > 0 {
            warn!(
                statements = statements.len(),
                failed = failed,
                "Batch finished with failed or denied statements"
            );
        }
        debug!(
            statements = statements.len(),
            failed = failed,
            execution_time_ms = start.elapsed().as_millis() as u64,
            "Batch finished"
        );
        Ok(outcomes)
    }

    /// Split `batch`, resolve the configured role, execute, and render the
    /// `---`-joined text.
    pub async fn execute_batch(&self, batch: &str, config: &DatabaseConfig) -> ToolResult<String> {
        config.validate()?;
        let statements = split_statements(batch);
        let permissions = permissions_for(&config.role);
        debug!(
            statements = statements.len(),
            role = %config.role,
            "Executing batch"
        );
        let outcomes = self.execute(&statements, &permissions, config).await?;
        Ok(join_outcomes(&outcomes))
    }
}

fn execution_error(statement: &Statement, message: String) -> StatementOutcome {
    error!(sql = %statement.text(), error = %message, "Statement failed");
    StatementOutcome::ExecutionError {
        statement: statement.text().to_string(),
        message,
    }
}
