//! Composite diagnostic tools.
//!
//! Each tool runs a fixed, ordered list of SQL batches through `execute_sql`
//! and concatenates the results in declaration order. A batch that fails as a
//! whole contributes one error entry; later batches still run.

use crate::error::ToolResult;
use crate::tools::{Arguments, ToolDescriptor, ToolHandler, empty_object_schema};
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, warn};

/// One diagnostic dimension: a label for logs and the SQL batch to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiagnosticBatch {
    pub label: &'static str,
    pub sql: &'static str,
}

pub const HEALTH_CHECK_BATCHES: &[DiagnosticBatch] = &[
    DiagnosticBatch {
        label: "processlist",
        sql: "SHOW FULL PROCESSLIST;SHOW VARIABLES LIKE 'max_connections';",
    },
    DiagnosticBatch {
        label: "lock",
        sql: "SHOW OPEN TABLES WHERE In_use > 0;\
              SELECT * FROM information_schema.innodb_locks;\
              SELECT * FROM information_schema.innodb_lock_waits;",
    },
    DiagnosticBatch {
        label: "trx",
        sql: "SELECT * FROM INFORMATION_SCHEMA.INNODB_TRX;",
    },
    DiagnosticBatch {
        label: "status",
        sql: "SHOW ENGINE INNODB STATUS;",
    },
];

pub const LOCK_REPORT_BATCHES: &[DiagnosticBatch] = &[
    DiagnosticBatch {
        label: "table_use",
        sql: "SHOW OPEN TABLES WHERE In_use > 0;",
    },
    DiagnosticBatch {
        label: "row_lock",
        sql: "SELECT p2.`HOST` AS blocked_host, p2.`USER` AS blocked_user, \
              r.trx_id AS blocked_trx_id, r.trx_mysql_thread_id AS blocked_thread_id, \
              TIMESTAMPDIFF(SECOND, r.trx_wait_started, CURRENT_TIMESTAMP) AS wait_seconds, \
              r.trx_query AS blocked_query, l.lock_table AS locked_table, \
              m.`lock_mode` AS blocked_lock_mode, m.`lock_type` AS blocked_lock_type, \
              m.`lock_index` AS blocked_lock_index, m.`lock_space` AS blocked_lock_space, \
              m.lock_page AS blocked_lock_page, m.lock_rec AS blocked_lock_rec, \
              m.lock_data AS blocked_lock_data, \
              p.`HOST` AS blocking_host, p.`USER` AS blocking_user, \
              b.trx_id AS blocking_trx_id, b.trx_mysql_thread_id AS blocking_thread_id, \
              b.trx_query AS blocking_query, l.`lock_mode` AS blocking_lock_mode, \
              l.`lock_type` AS blocking_lock_type, l.`lock_index` AS blocking_lock_index, \
              l.`lock_space` AS blocking_lock_space, l.lock_page AS blocking_lock_page, \
              l.lock_rec AS blocking_lock_rec, l.lock_data AS blocking_lock_data, \
              IF(p.COMMAND = 'Sleep', CONCAT(p.TIME, ' s'), 0) AS blocking_idle_time \
              FROM information_schema.INNODB_LOCK_WAITS w \
              INNER JOIN information_schema.INNODB_TRX b ON b.trx_id = w.blocking_trx_id \
              INNER JOIN information_schema.INNODB_TRX r ON r.trx_id = w.requesting_trx_id \
              INNER JOIN information_schema.INNODB_LOCKS l \
              ON w.blocking_lock_id = l.lock_id AND l.`lock_trx_id` = b.`trx_id` \
              INNER JOIN information_schema.INNODB_LOCKS m \
              ON m.`lock_id` = w.`requested_lock_id` AND m.`lock_trx_id` = r.`trx_id` \
              INNER JOIN information_schema.PROCESSLIST p ON p.ID = b.trx_mysql_thread_id \
              INNER JOIN information_schema.PROCESSLIST p2 ON p2.ID = r.trx_mysql_thread_id \
              ORDER BY wait_seconds DESC;",
    },
];

/// A tool made of several fixed diagnostic batches.
pub struct CompositeHandler {
    name: &'static str,
    description: &'static str,
    batches: &'static [DiagnosticBatch],
    execute: Arc<dyn ToolHandler>,
}

impl CompositeHandler {
    pub fn new(
        name: &'static str,
        description: &'static str,
        batches: &'static [DiagnosticBatch],
        execute: Arc<dyn ToolHandler>,
    ) -> Self {
        Self {
            name,
            description,
            batches,
            execute,
        }
    }

    /// `get_db_health_running`: process list, locks, transactions, engine status.
    pub fn health_check(execute: Arc<dyn ToolHandler>) -> Self {
        Self::new(
            "get_db_health_running",
            "Analyze MySQL health status: connections, locks, running transactions \
             and InnoDB engine status.",
            HEALTH_CHECK_BATCHES,
            execute,
        )
    }

    /// `get_table_lock`: tables in use, then row-lock waits.
    pub fn lock_report(execute: Arc<dyn ToolHandler>) -> Self {
        Self::new(
            "get_table_lock",
            "Report MySQL table-level locks (open tables in use) and row-level lock waits \
             between blocking and blocked transactions.",
            LOCK_REPORT_BATCHES,
            execute,
        )
    }

    pub fn batches(&self) -> &'static [DiagnosticBatch] {
        self.batches
    }

    async fn run_batch(&self, batch: &DiagnosticBatch) -> Vec<String> {
        let mut arguments = Arguments::new();
        arguments.insert("query".to_string(), Value::String(batch.sql.to_string()));

        debug!(tool = self.name, batch = batch.label, "Running diagnostic batch");
        match self.execute.invoke(&arguments).await {
            Ok(texts) => texts,
            Err(e) => {
                warn!(
                    tool = self.name,
                    batch = batch.label,
                    error = %e,
                    "Diagnostic batch failed"
                );
                vec![format!("Error executing query: {}", e)]
            }
        }
    }
}

#[async_trait]
impl ToolHandler for CompositeHandler {
    fn descriptor(&self) -> ToolDescriptor {
        ToolDescriptor::new(self.name, self.description, empty_object_schema())
    }

    async fn invoke(&self, _arguments: &Arguments) -> ToolResult<Vec<String>> {
        let mut combined = Vec::new();
        for batch in self.batches {
            combined.extend(self.run_batch(batch).await);
        }
        Ok(combined)
    }
}
