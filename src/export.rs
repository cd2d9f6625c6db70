//! Spreadsheet reports. A report is a straight dump of one table: a header
//! row with the column names, then one row per record in key order.

use std::path::{Path, PathBuf};

use rusqlite::types::ValueRef;
use rusqlite::Connection;
use tracing::info;
use umya_spreadsheet::Worksheet;

use crate::error::{InventoryError, Result};
use crate::models::EntitySet;

/// Largest magnitude a spreadsheet number (an `f64`) holds without rounding.
/// Integers beyond it are written as text.
const MAX_EXACT_INTEGER: u64 = 1 << 53;

/// Contents of a report sheet, every cell rendered as text.
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// Write `<dir>/<EntitySet>_Report.xlsx`, replacing any previous report of
/// the same name, and return its path.
pub fn export_table(conn: &Connection, set: EntitySet, dir: &Path) -> Result<PathBuf> {
    let sql = format!(
        "SELECT * FROM {} ORDER BY {}",
        set.table_name(),
        set.key_column()
    );
    let mut stmt = conn.prepare(&sql)?;
    let headers: Vec<String> = stmt
        .column_names()
        .into_iter()
        .map(str::to_string)
        .collect();

    let mut book = umya_spreadsheet::new_file_empty_worksheet();
    let sheet = book
        .new_sheet(set.to_string())
        .map_err(|err| InventoryError::Export(err.to_string()))?;

    for (idx, header) in headers.iter().enumerate() {
        sheet
            .get_cell_mut(cell_address(idx + 1, 1).as_str())
            .set_value_string(header.as_str());
    }

    let mut rows = stmt.query([])?;
    let mut row_num = 2;
    while let Some(row) = rows.next()? {
        for idx in 0..headers.len() {
            let cell = sheet.get_cell_mut(cell_address(idx + 1, row_num).as_str());
            match row.get_ref(idx)? {
                ValueRef::Null => {}
                ValueRef::Integer(value) if value.unsigned_abs() <= MAX_EXACT_INTEGER => {
                    cell.set_value_number(value as f64);
                }
                ValueRef::Integer(value) => {
                    cell.set_value_string(value.to_string());
                }
                ValueRef::Real(value) => {
                    cell.set_value_number(value);
                }
                ValueRef::Text(bytes) => {
                    cell.set_value_string(String::from_utf8_lossy(bytes).into_owned());
                }
                ValueRef::Blob(_) => {
                    cell.set_value_string("<blob>");
                }
            }
        }
        row_num += 1;
    }

    let path = dir.join(set.report_file_name());
    umya_spreadsheet::writer::xlsx::write(&book, &path)
        .map_err(|err| InventoryError::Export(err.to_string()))?;

    info!(report = %path.display(), records = row_num - 2, "table exported");
    Ok(path)
}

/// Load the first sheet of a report written by [`export_table`].
pub fn read_report(path: &Path) -> Result<Report> {
    let book = umya_spreadsheet::reader::xlsx::read(path)
        .map_err(|err| InventoryError::Export(err.to_string()))?;
    let sheet = book
        .get_sheet_collection()
        .first()
        .ok_or_else(|| InventoryError::Export(format!("{} has no sheets", path.display())))?;

    let (max_col, max_row) = sheet.get_highest_column_and_row();
    let columns = max_col as usize;
    let headers = read_row(sheet, 1, columns);
    let rows = (2..=max_row as usize)
        .map(|row| read_row(sheet, row, columns))
        .collect();

    Ok(Report { headers, rows })
}

fn read_row(sheet: &Worksheet, row: usize, columns: usize) -> Vec<String> {
    (1..=columns)
        .map(|col| {
            sheet
                .get_cell(cell_address(col, row).as_str())
                .map(|cell| cell.get_value().to_string())
                .unwrap_or_default()
        })
        .collect()
}

/// `A1`-style address for a 1-based column and row.
fn cell_address(col: usize, row: usize) -> String {
    format!("{}{}", column_letter(col), row)
}

fn column_letter(n: usize) -> String {
    let mut result = String::new();
    let mut n = n;
    while n > 0 {
        let rem = (n - 1) % 26;
        result.insert(0, (b'A' + rem as u8) as char);
        n = (n - 1) / 26;
    }
    result
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::db::{
        add_supplier, ensure_schema, list_stock_items, record_purchase_order, upsert_stock_item,
    };
    use crate::models::{NewPurchaseOrder, NewStockItem, NewSupplier};

    fn memory_conn() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        ensure_schema(&conn).unwrap();
        conn
    }

    fn stock(conn: &mut Connection, name: &str, quantity: i64, unit_price: f64) -> i64 {
        upsert_stock_item(
            conn,
            &NewStockItem {
                name: name.into(),
                supplier_id: 1,
                quantity,
                unit_price,
            },
        )
        .unwrap()
        .id()
    }

    #[test]
    fn column_letters_roll_over() {
        assert_eq!(column_letter(1), "A");
        assert_eq!(column_letter(26), "Z");
        assert_eq!(column_letter(27), "AA");
        assert_eq!(cell_address(3, 7), "C7");
    }

    #[test]
    fn stock_report_reads_back_as_listing() {
        let dir = tempfile::tempdir().unwrap();
        let mut conn = memory_conn();
        stock(&mut conn, "Keyboard", 12, 24.5);
        stock(&mut conn, "Webcam", 3, 40.0);

        let path = export_table(&conn, EntitySet::Stock, dir.path()).unwrap();
        assert_eq!(path, dir.path().join("Stock_Report.xlsx"));

        let report = read_report(&path).unwrap();
        assert_eq!(
            report.headers,
            ["item_id", "item_name", "supplier_id", "qty", "price"]
        );

        let items = list_stock_items(&conn).unwrap();
        assert_eq!(report.rows.len(), items.len());
        for (row, item) in report.rows.iter().zip(&items) {
            assert_eq!(row[0].parse::<f64>().unwrap() as i64, item.id);
            assert_eq!(row[1], item.name);
            assert_eq!(row[2].parse::<f64>().unwrap() as i64, item.supplier_id);
            assert_eq!(row[3].parse::<f64>().unwrap() as i64, item.quantity);
            assert_eq!(row[4].parse::<f64>().unwrap(), item.unit_price);
        }
    }

    #[test]
    fn export_overwrites_previous_report() {
        let dir = tempfile::tempdir().unwrap();
        let mut conn = memory_conn();
        stock(&mut conn, "Keyboard", 12, 24.5);
        export_table(&conn, EntitySet::Stock, dir.path()).unwrap();

        stock(&mut conn, "Monitor", 2, 150.0);
        let path = export_table(&conn, EntitySet::Stock, dir.path()).unwrap();

        let report = read_report(&path).unwrap();
        assert_eq!(report.rows.len(), 2);
        assert_eq!(report.rows[1][1], "Monitor");
    }

    #[test]
    fn empty_table_exports_header_only() {
        let dir = tempfile::tempdir().unwrap();
        let conn = memory_conn();
        let path = export_table(&conn, EntitySet::Suppliers, dir.path()).unwrap();

        let report = read_report(&path).unwrap();
        assert_eq!(report.headers, ["supplier_id", "name", "contact", "email"]);
        assert!(report.rows.is_empty());
    }

    #[test]
    fn supplier_and_order_reports_keep_text_columns() {
        let dir = tempfile::tempdir().unwrap();
        let mut conn = memory_conn();
        add_supplier(
            &conn,
            &NewSupplier {
                name: "Acme".into(),
                contact: "0300-555".into(),
                email: "sales@acme.test".into(),
            },
        )
        .unwrap();
        let item_id = stock(&mut conn, "Router", 1, 60.0);
        record_purchase_order(
            &mut conn,
            &NewPurchaseOrder {
                item_id,
                supplier_id: 1,
                quantity: 6,
            },
            NaiveDate::from_ymd_opt(2025, 1, 31).unwrap(),
        )
        .unwrap();

        let suppliers =
            read_report(&export_table(&conn, EntitySet::Suppliers, dir.path()).unwrap()).unwrap();
        assert_eq!(suppliers.rows[0][1..], ["Acme", "0300-555", "sales@acme.test"]);

        let orders = read_report(
            &export_table(&conn, EntitySet::PurchaseOrders, dir.path()).unwrap(),
        )
        .unwrap();
        assert_eq!(
            orders.headers,
            ["order_id", "item_id", "supplier_id", "qty", "order_date"]
        );
        assert_eq!(orders.rows[0][4], "2025-01-31");
    }
    #[test]
    fn integers_beyond_float_precision_are_written_exactly() {
        let dir = tempfile::tempdir().unwrap();
        let mut conn = memory_conn();
        stock(&mut conn, "Rivets", i64::MAX, 0.5);
        stock(&mut conn, "Washers", (1 << 53) + 1, 0.5);
        stock(&mut conn, "Nuts", 1 << 53, 0.5);

        let report =
            read_report(&export_table(&conn, EntitySet::Stock, dir.path()).unwrap()).unwrap();
        assert_eq!(report.rows[0][3], i64::MAX.to_string());
        assert_eq!(report.rows[1][3], ((1_i64 << 53) + 1).to_string());
        assert_eq!(
            report.rows[2][3].parse::<f64>().unwrap() as i64,
            1_i64 << 53
        );
    }
}
