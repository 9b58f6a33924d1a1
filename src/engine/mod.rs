//! Multi-statement execution engine.
//!
//! - `permission`: role → allowed SQL verbs
//! - `splitter`: batch text → ordered statements
//! - `format`: statement outcomes and their text rendering
//! - `executor`: runs statements on one connection, isolating failures

pub mod executor;
pub mod format;
pub mod permission;
pub mod splitter;

pub use executor::ExecutionEngine;
pub use format::{StatementOutcome, format_outcome, join_outcomes};
pub use permission::{PermissionSet, permissions_for};
pub use splitter::{Statement, split_statements};
