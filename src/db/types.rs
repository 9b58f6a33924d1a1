//! Row decoding.
//!
//! Statements are sent unprepared, so MySQL and PostgreSQL return every value
//! in its textual wire form and SQLite converts stored values to text on
//! request. Decoding each cell as `&str` therefore yields the database's own
//! rendering for any column type. Bytes that are not valid UTF-8 fall back to
//! base64.

use crate::engine::format::Cell;
use sqlx::{Column, ColumnIndex, Decode, Row, TypeInfo, ValueRef};

/// Column names of a row, in the order the database returned them.
pub fn column_names<R: Row>(row: &R) -> Vec<String> {
    row.columns().iter().map(|c| c.name().to_string()).collect()
}

/// Decode every cell of a row to text, keeping NULL as `None`.
pub fn decode_row<R>(row: &R) -> Vec<Cell>
where
    R: Row,
    usize: ColumnIndex<R>,
    for<'r> &'r str: Decode<'r, R::Database>,
    for<'r> &'r [u8]: Decode<'r, R::Database>,
{
    (0..row.len()).map(|idx| decode_cell(row, idx)).collect()
}

fn decode_cell<R>(row: &R, idx: usize) -> Cell
where
    R: Row,
    usize: ColumnIndex<R>,
    for<'r> &'r str: Decode<'r, R::Database>,
    for<'r> &'r [u8]: Decode<'r, R::Database>,
{
    let Ok(value) = row.try_get_raw(idx) else {
        return None;
    };
    if value.is_null() {
        return None;
    }
    let type_name = value.type_info().name().to_string();

    if let Ok(text) = <&str as Decode<R::Database>>::decode(value) {
        return Some(text.to_string());
    }

    let bytes = row
        .try_get_raw(idx)
        .ok()
        .and_then(|value| <&[u8] as Decode<R::Database>>::decode(value).ok());
    match bytes {
        Some(bytes) => Some(encode_binary(bytes)),
        None => {
            tracing::warn!(column = idx, type_name = %type_name, "Failed to decode column as text");
            Some(format!("<{}>", type_name))
        }
    }
}

/// Render raw bytes: UTF-8 text when valid, base64 otherwise.
pub fn encode_binary(bytes: &[u8]) -> String {
    use base64::{Engine as _, engine::general_purpose::STANDARD};

    match std::str::from_utf8(bytes) {
        Ok(s) => s.to_string(),
        Err(_) => STANDARD.encode(bytes),
    }
}
