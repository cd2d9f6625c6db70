use rusqlite::{params, Connection, OptionalExtension, Row};
use tracing::{debug, info};

use super::values;
use crate::error::Result;
use crate::models::{LowStockItem, NewStockItem, StockItem, Upsert};

fn stock_from_row(row: &Row<'_>) -> rusqlite::Result<StockItem> {
    Ok(StockItem {
        id: row.get(0)?,
        name: values::text(row, 1)?,
        supplier_id: values::integer(row, 2)?,
        quantity: values::integer(row, 3)?,
        unit_price: values::real(row, 4)?,
    })
}

/// Every stock row in insertion order.
pub fn list_stock_items(conn: &Connection) -> Result<Vec<StockItem>> {
    let mut stmt = conn.prepare(
        "SELECT item_id, item_name, supplier_id, qty, price
         FROM stock
         ORDER BY item_id",
    )?;

    let items = stmt
        .query_map([], stock_from_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    debug!(count = items.len(), "loaded stock items");
    Ok(items)
}

/// Items whose quantity is strictly below `threshold`, in the same order as
/// [`list_stock_items`]. A NULL or non-numeric quantity counts as zero, the
/// same way the listing reads it.
pub fn list_low_stock(conn: &Connection, threshold: i64) -> Result<Vec<LowStockItem>> {
    let mut stmt = conn.prepare(
        "SELECT item_name, qty FROM stock
         WHERE COALESCE(CAST(qty AS INTEGER), 0) < ?1
         ORDER BY item_id",
    )?;

    let items = stmt
        .query_map(params![threshold], |row| {
            Ok(LowStockItem {
                name: values::text(row, 0)?,
                quantity: values::integer(row, 1)?,
            })
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(items)
}

/// Add or update an item keyed by its exact name. The lookup and the write
/// share one transaction so the name cannot be claimed in between.
pub fn upsert_stock_item(conn: &mut Connection, item: &NewStockItem) -> Result<Upsert> {
    let tx = conn.transaction()?;

    let existing: Option<i64> = tx
        .query_row(
            "SELECT item_id FROM stock WHERE item_name = ?1 ORDER BY item_id LIMIT 1",
            params![item.name],
            |row| row.get(0),
        )
        .optional()?;

    let outcome = match existing {
        Some(id) => {
            tx.execute(
                "UPDATE stock SET qty = ?1, price = ?2, supplier_id = ?3 WHERE item_name = ?4",
                params![item.quantity, item.unit_price, item.supplier_id, item.name],
            )?;
            Upsert::Updated(id)
        }
        None => {
            tx.execute(
                "INSERT INTO stock (item_name, supplier_id, qty, price) VALUES (?1, ?2, ?3, ?4)",
                params![item.name, item.supplier_id, item.quantity, item.unit_price],
            )?;
            Upsert::Created(tx.last_insert_rowid())
        }
    };

    tx.commit()?;
    info!(name = %item.name, ?outcome, "stock item saved");
    Ok(outcome)
}

/// Remove a stock row. Returns whether anything was deleted; an unknown id
/// is not an error.
pub fn delete_stock_item(conn: &Connection, id: i64) -> Result<bool> {
    let deleted = conn.execute("DELETE FROM stock WHERE item_id = ?1", params![id])?;
    info!(id, deleted, "stock item delete");
    Ok(deleted > 0)
}
