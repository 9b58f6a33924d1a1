//! Connection dispatch macro.
//!
//! Expands one body per `DbConnection` variant so each arm is type-checked
//! against its concrete sqlx connection type.

/// Generate match arms over every `DbConnection` variant.
///
/// # Example
///
/// ```ignore
/// impl_conn_dispatch!(&mut self.conn, c => c.ping().await)
/// ```
#[macro_export]
macro_rules! impl_conn_dispatch {
    ($conn:expr, $c:ident => $body:expr) => {
        match $conn {
            $crate::db::connection::DbConnection::MySql($c) => $body,
            $crate::db::connection::DbConnection::Postgres($c) => $body,
            $crate::db::connection::DbConnection::SQLite($c) => $body,
        }
    };
}

pub use impl_conn_dispatch;
