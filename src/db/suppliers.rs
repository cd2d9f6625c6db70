use rusqlite::{params, Connection};
use tracing::info;

use super::values;
use crate::error::{InventoryError, Result};
use crate::models::{NewSupplier, Supplier};

/// Every supplier in insertion order.
pub fn list_suppliers(conn: &Connection) -> Result<Vec<Supplier>> {
    let mut stmt = conn.prepare(
        "SELECT supplier_id, name, contact, email
         FROM suppliers
         ORDER BY supplier_id",
    )?;

    let suppliers = stmt
        .query_map([], |row| {
            Ok(Supplier {
                id: row.get(0)?,
                name: values::text(row, 1)?,
                contact: values::text(row, 2)?,
                email: values::text(row, 3)?,
            })
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(suppliers)
}

/// Insert a supplier and echo the stored row back. Contact and email are not
/// format-checked.
pub fn add_supplier(conn: &Connection, supplier: &NewSupplier) -> Result<Supplier> {
    if supplier.name.trim().is_empty() {
        return Err(InventoryError::Validation(
            "Supplier name required.".to_string(),
        ));
    }

    conn.execute(
        "INSERT INTO suppliers (name, contact, email) VALUES (?1, ?2, ?3)",
        params![supplier.name, supplier.contact, supplier.email],
    )?;

    let id = conn.last_insert_rowid();
    info!(id, name = %supplier.name, "supplier added");
    Ok(Supplier {
        id,
        name: supplier.name.clone(),
        contact: supplier.contact.clone(),
        email: supplier.email.clone(),
    })
}
