//! Column readers for rows the app did not necessarily write itself. Every
//! column in the schema is nullable and SQLite keeps text that does not look
//! numeric even in an `INTEGER` column, so older databases can hold NULL or
//! text where a number belongs.

use rusqlite::types::ValueRef;
use rusqlite::Row;

/// Integer column. NULL, blobs and non-numeric text read as 0; reals are
/// truncated (saturating at the `i64` bounds).
pub(crate) fn integer(row: &Row<'_>, idx: usize) -> rusqlite::Result<i64> {
    Ok(match row.get_ref(idx)? {
        ValueRef::Integer(value) => value,
        ValueRef::Real(value) => value as i64,
        ValueRef::Text(bytes) => std::str::from_utf8(bytes)
            .ok()
            .and_then(|text| text.trim().parse().ok())
            .unwrap_or(0),
        ValueRef::Null | ValueRef::Blob(_) => 0,
    })
}

/// Real column. NULL, blobs and non-numeric text read as 0.0.
pub(crate) fn real(row: &Row<'_>, idx: usize) -> rusqlite::Result<f64> {
    Ok(match row.get_ref(idx)? {
        ValueRef::Integer(value) => value as f64,
        ValueRef::Real(value) => value,
        ValueRef::Text(bytes) => std::str::from_utf8(bytes)
            .ok()
            .and_then(|text| text.trim().parse().ok())
            .unwrap_or(0.0),
        ValueRef::Null | ValueRef::Blob(_) => 0.0,
    })
}

/// Text column. NULL and blobs read as an empty string, numbers as their
/// decimal form.
pub(crate) fn text(row: &Row<'_>, idx: usize) -> rusqlite::Result<String> {
    Ok(match row.get_ref(idx)? {
        ValueRef::Text(bytes) => String::from_utf8_lossy(bytes).into_owned(),
        ValueRef::Integer(value) => value.to_string(),
        ValueRef::Real(value) => value.to_string(),
        ValueRef::Null | ValueRef::Blob(_) => String::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::Connection;

    fn read<T>(sql: &str, reader: fn(&Row<'_>, usize) -> rusqlite::Result<T>) -> T {
        let conn = Connection::open_in_memory().unwrap();
        conn.query_row(sql, [], |row| reader(row, 0)).unwrap()
    }

    #[test]
    fn integers_tolerate_legacy_values() {
        assert_eq!(read("SELECT 7", integer), 7);
        assert_eq!(read("SELECT ' 12 '", integer), 12);
        assert_eq!(read("SELECT 'ACME'", integer), 0);
        assert_eq!(read("SELECT NULL", integer), 0);
        assert_eq!(read("SELECT 4.9", integer), 4);
        assert_eq!(read("SELECT 9.3e18", integer), i64::MAX);
    }

    #[test]
    fn reals_and_text_tolerate_legacy_values() {
        assert_eq!(read("SELECT 3", real), 3.0);
        assert_eq!(read("SELECT '2.5'", real), 2.5);
        assert_eq!(read("SELECT NULL", real), 0.0);
        assert_eq!(read("SELECT NULL", text), "");
        assert_eq!(read("SELECT 42", text), "42");
        assert_eq!(read("SELECT 'Mouse'", text), "Mouse");
    }
}
