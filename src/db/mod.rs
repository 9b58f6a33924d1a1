//! Database access layer.
//!
//! This module provides the backend seam used by the execution engine:
//! - `SqlBackend` / `SqlSession` traits (one connection per invocation)
//! - sqlx implementation for MySQL, PostgreSQL and SQLite
//! - Row decoding to text cells
//! - Connection dispatch macro

pub mod connection;
#[macro_use]
pub mod macros;
pub mod session;
pub mod types;

pub use connection::{DbConnection, SqlxBackend, SqlxSession};
pub use session::{RawResult, SqlBackend, SqlSession};
