use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension};
use tracing::{info, warn};

use super::values;
use crate::error::{InventoryError, Result};
use crate::models::{NewPurchaseOrder, PurchaseOrder};

/// Every purchase order in insertion order.
pub fn list_purchase_orders(conn: &Connection) -> Result<Vec<PurchaseOrder>> {
    let mut stmt = conn.prepare(
        "SELECT order_id, item_id, supplier_id, qty, order_date
         FROM purchase_orders
         ORDER BY order_id",
    )?;

    let orders = stmt
        .query_map([], |row| {
            Ok(PurchaseOrder {
                id: row.get(0)?,
                item_id: values::integer(row, 1)?,
                supplier_id: values::integer(row, 2)?,
                quantity: values::integer(row, 3)?,
                order_date: row.get(4)?,
            })
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(orders)
}

/// Append an order dated `order_date` and add its quantity to the referenced
/// stock item. Both writes commit together; when the item does not exist, or
/// the new total would not fit in an `i64`, nothing is recorded.
pub fn record_purchase_order(
    conn: &mut Connection,
    order: &NewPurchaseOrder,
    order_date: NaiveDate,
) -> Result<PurchaseOrder> {
    let tx = conn.transaction()?;

    let current = tx
        .query_row(
            "SELECT qty FROM stock WHERE item_id = ?1",
            params![order.item_id],
            |row| values::integer(row, 0),
        )
        .optional()?;
    let current = match current {
        Some(quantity) => quantity,
        None => {
            warn!(item_id = order.item_id, "purchase order for unknown item rejected");
            return Err(InventoryError::NotFound {
                entity: "Item",
                id: order.item_id,
            });
        }
    };
    let total = current.checked_add(order.quantity).ok_or_else(|| {
        warn!(
            item_id = order.item_id,
            current,
            quantity = order.quantity,
            "stock total overflow"
        );
        InventoryError::Validation(format!(
            "Ordering {} would take item {} outside the quantity range that can be stored.",
            order.quantity, order.item_id
        ))
    })?;

    tx.execute(
        "INSERT INTO purchase_orders (item_id, supplier_id, qty, order_date)
         VALUES (?1, ?2, ?3, ?4)",
        params![order.item_id, order.supplier_id, order.quantity, order_date],
    )?;
    let id = tx.last_insert_rowid();

    tx.execute(
        "UPDATE stock SET qty = ?1 WHERE item_id = ?2",
        params![total, order.item_id],
    )?;

    tx.commit()?;
    info!(
        id,
        item_id = order.item_id,
        quantity = order.quantity,
        "purchase order recorded"
    );
    Ok(PurchaseOrder {
        id,
        item_id: order.item_id,
        supplier_id: order.supplier_id,
        quantity: order.quantity,
        order_date,
    })
}
