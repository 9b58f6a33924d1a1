//! Statement outcomes and their text rendering.
//!
//! Result sets are rendered as naive CSV: values are comma-joined with no
//! quoting or escaping. Absent values render as `NULL`, so they stay
//! distinguishable from empty strings, which render as empty fields.

/// Text rendered for an absent (SQL NULL) value.
pub const NULL_SENTINEL: &str = "NULL";

/// Separator placed between consecutive statement results.
pub const STATEMENT_SEPARATOR: &str = "\n---\n";

/// A single cell value. `None` is SQL NULL.
pub type Cell = Option<String>;

/// What happened to one statement of a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatementOutcome {
    /// The statement produced a result set.
    Tabular {
        columns: Vec<String>,
        rows: Vec<Vec<Cell>>,
    },
    /// The statement produced no result set and was committed.
    MutationStatus { rows_affected: u64 },
    /// The role may not run this verb; nothing was sent to the database.
    PermissionDenied { role: String, verb: String },
    /// The database rejected the statement.
    ExecutionError { statement: String, message: String },
}

impl StatementOutcome {
    pub fn is_error(&self) -> bool {
        matches!(
            self,
            Self::PermissionDenied { .. } | Self::ExecutionError { .. }
        )
    }
}

/// Render one outcome as display text.
pub fn format_outcome(outcome: &StatementOutcome) -> String {
    match outcome {
        StatementOutcome::Tabular { columns, rows } => format_as_csv(columns, rows),
        StatementOutcome::MutationStatus { rows_affected } => {
            format!("Query executed successfully. Rows affected: {}", rows_affected)
        }
        StatementOutcome::PermissionDenied { role, verb } => format!(
            "Permission denied: role '{}' is not allowed to execute {} statements",
            role, verb
        ),
        StatementOutcome::ExecutionError { statement, message } => {
            format!("Error executing statement '{}': {}", statement, message)
        }
    }
}

/// Render outcomes in order, separated by a `---` line.
pub fn join_outcomes(outcomes: &[StatementOutcome]) -> String {
    outcomes
        .iter()
        .map(format_outcome)
        .collect::<Vec<_>>()
        .join(STATEMENT_SEPARATOR)
}

pub fn format_cell(cell: &Cell) -> &str {
    cell.as_deref().unwrap_or(NULL_SENTINEL)
}

/// Header line of column names followed by one line per row.
pub fn format_as_csv(columns: &[String], rows: &[Vec<Cell>]) -> String {
    let mut lines = Vec::with_capacity(rows.len() + 1);
    lines.push(columns.join(","));
    for row in rows {
        let line = row.iter().map(format_cell).collect::<Vec<_>>().join(",");
        lines.push(line);
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cols(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_format_tabular() {
        let outcome = StatementOutcome::Tabular {
            columns: cols(&["id", "name"]),
            rows: vec![
                vec![Some("1".into()), Some("alice".into())],
                vec![Some("2".into()), Some("bob".into())],
            ],
        };
        assert_eq!(format_outcome(&outcome), "id,name\n1,alice\n2,bob");
    }

    #[test]
    fn test_format_tabular_without_rows_keeps_header() {
        let outcome = StatementOutcome::Tabular {
            columns: cols(&["trx_id", "trx_state"]),
            rows: vec![],
        };
        assert_eq!(format_outcome(&outcome), "trx_id,trx_state");
    }

    #[test]
    fn test_null_and_empty_string_are_distinct() {
        let outcome = StatementOutcome::Tabular {
            columns: cols(&["a", "b", "c"]),
            rows: vec![vec![None, Some(String::new()), Some("x".into())]],
        };
        assert_eq!(format_outcome(&outcome), "a,b,c\nNULL,,x");
    }

    #[test]
    fn test_commas_are_not_escaped() {
        let outcome = StatementOutcome::Tabular {
            columns: cols(&["note"]),
            rows: vec![vec![Some("a,b".into())]],
        };
        assert_eq!(format_outcome(&outcome), "note\na,b");
    }

    #[test]
    fn test_format_mutation_status() {
        let text = format_outcome(&StatementOutcome::MutationStatus { rows_affected: 3 });
        assert_eq!(text, "Query executed successfully. Rows affected: 3");
    }

    #[test]
    fn test_format_permission_denied_names_role_and_verb() {
        let text = format_outcome(&StatementOutcome::PermissionDenied {
            role: "readonly".into(),
            verb: "DROP".into(),
        });
        assert!(text.contains("'readonly'"));
        assert!(text.contains("DROP"));
    }

    #[test]
    fn test_format_execution_error_embeds_message() {
        let text = format_outcome(&StatementOutcome::ExecutionError {
            statement: "INVALID SQL".into(),
            message: "syntax error".into(),
        });
        assert_eq!(text, "Error executing statement 'INVALID SQL': syntax error");
    }

    #[test]
    fn test_join_outcomes_resplits_into_same_count() {
        let outcomes = vec![
            StatementOutcome::Tabular {
                columns: cols(&["1"]),
                rows: vec![vec![Some("1".into())]],
            },
            StatementOutcome::ExecutionError {
                statement: "INVALID SQL".into(),
                message: "syntax error".into(),
            },
            StatementOutcome::MutationStatus { rows_affected: 0 },
        ];
        let joined = join_outcomes(&outcomes);
        let segments: Vec<&str> = joined.split(STATEMENT_SEPARATOR).collect();
        assert_eq!(segments.len(), 3);
        assert_eq!(segments[0], "1\n1");
        assert_eq!(segments[2], "Query executed successfully. Rows affected: 0");
    }

    #[test]
    fn test_join_single_and_empty() {
        assert_eq!(join_outcomes(&[]), "");
        let single = [StatementOutcome::MutationStatus { rows_affected: 1 }];
        assert!(!join_outcomes(&single).contains("---"));
    }

    #[test]
    fn test_is_error() {
        assert!(
            StatementOutcome::PermissionDenied {
                role: "readonly".into(),
                verb: "DROP".into()
            }
            .is_error()
        );
        assert!(!StatementOutcome::MutationStatus { rows_affected: 0 }.is_error());
    }
}
