//! Batch splitting.
//!
//! A batch is split on every `;`. There is no awareness of quoting or
//! comments, so a literal `;` inside a string or procedure body splits the
//! statement too.

/// A single trimmed, non-empty SQL statement from a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement {
    text: String,
    verb: String,
}

impl Statement {
    /// Build a statement from raw text. Returns `None` when the text is blank.
    pub fn new(text: &str) -> Option<Self> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }
        Some(Self {
            verb: leading_verb(text),
            text: text.to_string(),
        })
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Uppercased first whitespace-delimited token.
    pub fn verb(&self) -> &str {
        &self.verb
    }
}

/// Extract the uppercased first whitespace-delimited token of `sql`.
pub fn leading_verb(sql: &str) -> String {
    sql.split_whitespace()
        .next()
        .map(str::to_uppercase)
        .unwrap_or_default()
}

/// Split a batch into ordered statements, dropping blank segments.
pub fn split_statements(batch: &str) -> Vec<Statement> {
    batch.split(';').filter_map(Statement::new).collect()
}
