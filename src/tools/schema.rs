//! Schema lookup tools backed by `information_schema`.
//!
//! Each lookup builds one `SELECT` for the configured database and runs it
//! through `execute_sql`, so role checks and result formatting are shared
//! with ad-hoc queries.

use crate::config::DatabaseConfig;
use crate::error::{ToolError, ToolResult};
use crate::tools::{Arguments, ToolDescriptor, ToolHandler, input_schema, required_str};
use async_trait::async_trait;
use schemars::JsonSchema;
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

/// Input for the table name search tool.
#[derive(Debug, JsonSchema)]
pub struct TableNameInput {
    /// Text to search for in table comments
    pub text: String,
}

/// Input for the column and index listing tools.
#[derive(Debug, JsonSchema)]
pub struct TableListInput {
    /// Table names, separated by commas
    pub text: String,
}

/// The supported lookups.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaLookup {
    /// Tables whose comment contains the search text.
    TableName,
    /// Column names and comments of the listed tables.
    TableDesc,
    /// Index definitions of the listed tables.
    TableIndex,
}

impl SchemaLookup {
    pub const ALL: [SchemaLookup; 3] = [Self::TableName, Self::TableDesc, Self::TableIndex];

    pub fn tool_name(self) -> &'static str {
        match self {
            Self::TableName => "get_table_name",
            Self::TableDesc => "get_table_desc",
            Self::TableIndex => "get_table_index",
        }
    }

    fn description(self) -> &'static str {
        match self {
            Self::TableName => {
                "Search tables in the configured database by table comment \
                 (e.g. find the table that stores users by searching 'user')."
            }
            Self::TableDesc => {
                "List column names and comments for one or more tables \
                 (comma-separated, e.g. 'orders,users')."
            }
            Self::TableIndex => {
                "List indexes and their columns for one or more tables \
                 (comma-separated, e.g. 'orders,users')."
            }
        }
    }

    fn input_schema(self) -> Arguments {
        match self {
            Self::TableName => input_schema::<TableNameInput>(),
            Self::TableDesc | Self::TableIndex => input_schema::<TableListInput>(),
        }
    }

    /// Build the lookup query for `database` from the raw `text` argument.
    pub fn build_query(self, database: &str, text: &str) -> ToolResult<String> {
        if text.contains(';') {
            return Err(ToolError::invalid_argument(
                "text",
                "must not contain ';'",
            ));
        }
        let schema = quote_literal(database);
        let sql = match self {
            Self::TableName => format!(
                "SELECT TABLE_SCHEMA, TABLE_NAME, TABLE_COMMENT \
                 FROM information_schema.TABLES \
                 WHERE TABLE_SCHEMA = {} AND TABLE_COMMENT LIKE {}",
                schema,
                quote_literal(&format!("%{}%", text))
            ),
            Self::TableDesc => format!(
                "SELECT TABLE_NAME, COLUMN_NAME, COLUMN_COMMENT \
                 FROM information_schema.COLUMNS \
                 WHERE TABLE_SCHEMA = {} AND TABLE_NAME IN ({}) \
                 ORDER BY TABLE_NAME, ORDINAL_POSITION",
                schema,
                table_list(text)?
            ),
            Self::TableIndex => format!(
                "SELECT TABLE_NAME, INDEX_NAME, COLUMN_NAME, SEQ_IN_INDEX, NON_UNIQUE, INDEX_TYPE \
                 FROM information_schema.STATISTICS \
                 WHERE TABLE_SCHEMA = {} AND TABLE_NAME IN ({}) \
                 ORDER BY TABLE_NAME, INDEX_NAME, SEQ_IN_INDEX",
                schema,
                table_list(text)?
            ),
        };
        Ok(sql)
    }
}

/// Quote `value` as a SQL string literal.
pub fn quote_literal(value: &str) -> String {
    format!("'{}'", value.replace('\\', "\\\\").replace('\'', "''"))
}

/// Turn `a, b,c` into `'a','b','c'`.
fn table_list(text: &str) -> ToolResult<String> {
    let names: Vec<String> = text
        .split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(quote_literal)
        .collect();
    if names.is_empty() {
        return Err(ToolError::invalid_argument(
            "text",
            "expected at least one table name",
        ));
    }
    Ok(names.join(","))
}

/// Runs one `SchemaLookup` through the execution tool.
pub struct SchemaLookupHandler {
    lookup: SchemaLookup,
    config: Arc<DatabaseConfig>,
    execute: Arc<dyn ToolHandler>,
}

impl SchemaLookupHandler {
    pub fn new(
        lookup: SchemaLookup,
        config: Arc<DatabaseConfig>,
        execute: Arc<dyn ToolHandler>,
    ) -> Self {
        Self {
            lookup,
            config,
            execute,
        }
    }
}

#[async_trait]
impl ToolHandler for SchemaLookupHandler {
    fn descriptor(&self) -> ToolDescriptor {
        ToolDescriptor::new(
            self.lookup.tool_name(),
            self.lookup.description(),
            self.lookup.input_schema(),
        )
    }

    async fn invoke(&self, arguments: &Arguments) -> ToolResult<Vec<String>> {
        let text = required_str(arguments, "text")?;
        let sql = self.lookup.build_query(&self.config.database, text)?;
        debug!(tool = self.lookup.tool_name(), sql = %sql, "Built schema lookup query");

        let mut forwarded = Arguments::new();
        forwarded.insert("query".to_string(), Value::String(sql));
        self.execute.invoke(&forwarded).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_literal_escapes() {
        assert_eq!(quote_literal("plain"), "'plain'");
        assert_eq!(quote_literal("o'brien"), "'o''brien'");
        assert_eq!(quote_literal(r"a\b"), r"'a\\b'");
    }

    #[test]
    fn test_table_name_query() {
        let sql = SchemaLookup::TableName.build_query("shop", "user").unwrap();
        assert_eq!(
            sql,
            "SELECT TABLE_SCHEMA, TABLE_NAME, TABLE_COMMENT FROM information_schema.TABLES \
             WHERE TABLE_SCHEMA = 'shop' AND TABLE_COMMENT LIKE '%user%'"
        );
    }

    #[test]
    fn test_table_desc_query_splits_names() {
        let sql = SchemaLookup::TableDesc
            .build_query("shop", "orders, users ,")
            .unwrap();
        assert!(sql.contains("TABLE_NAME IN ('orders','users')"));
        assert!(sql.ends_with("ORDER BY TABLE_NAME, ORDINAL_POSITION"));
    }

    #[test]
    fn test_table_index_query() {
        let sql = SchemaLookup::TableIndex.build_query("shop", "orders").unwrap();
        assert!(sql.starts_with("SELECT TABLE_NAME, INDEX_NAME, COLUMN_NAME, SEQ_IN_INDEX"));
        assert!(sql.contains("FROM information_schema.STATISTICS"));
        assert!(sql.contains("TABLE_NAME IN ('orders')"));
    }

    #[test]
    fn test_semicolon_rejected() {
        let err = SchemaLookup::TableName
            .build_query("shop", "x'; DROP TABLE users")
            .unwrap_err();
        assert!(matches!(err, ToolError::InvalidArgument { .. }));
    }

    #[test]
    fn test_empty_table_list_rejected() {
        let err = SchemaLookup::TableIndex.build_query("shop", " , ").unwrap_err();
        assert!(matches!(err, ToolError::InvalidArgument { .. }));
    }

    #[test]
    fn test_injection_stays_inside_literal() {
        let sql = SchemaLookup::TableName
            .build_query("shop", "' OR '1'='1")
            .unwrap();
        assert!(sql.ends_with("LIKE '%'' OR ''1''=''1%'"));
        assert_eq!(crate::engine::split_statements(&sql).len(), 1);
    }

    #[test]
    fn test_descriptors_require_text() {
        for lookup in SchemaLookup::ALL {
            let schema = lookup.input_schema();
            assert_eq!(schema["required"], serde_json::json!(["text"]));
        }
    }
}
