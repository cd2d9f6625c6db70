//! Conversion from raw form text into typed records. All fields are trimmed
//! before checking; a field that is blank after trimming counts as missing.

use crate::error::{InventoryError, Result};
use crate::models::{NewPurchaseOrder, NewStockItem, NewSupplier};

/// Raw text of the stock form.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct StockInput {
    pub name: String,
    pub supplier_id: String,
    pub quantity: String,
    pub unit_price: String,
}

impl StockInput {
    pub fn parse(&self) -> Result<NewStockItem> {
        let name = self.name.trim();
        let supplier_id = self.supplier_id.trim();
        let quantity = self.quantity.trim();
        let unit_price = self.unit_price.trim();
        if [name, supplier_id, quantity, unit_price]
            .iter()
            .any(|value| value.is_empty())
        {
            return Err(InventoryError::Validation(
                "Please fill all fields.".to_string(),
            ));
        }

        Ok(NewStockItem {
            name: name.to_string(),
            supplier_id: parse_integer("Supplier ID", supplier_id)?,
            quantity: parse_integer("Quantity", quantity)?,
            unit_price: parse_decimal("Price", unit_price)?,
        })
    }
}

/// Raw text of the supplier form.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SupplierInput {
    pub name: String,
    pub contact: String,
    pub email: String,
}

impl SupplierInput {
    /// Only the name is required. Contact and email are kept verbatim apart
    /// from surrounding whitespace.
    pub fn parse(&self) -> Result<NewSupplier> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(InventoryError::Validation(
                "Supplier name required.".to_string(),
            ));
        }
        Ok(NewSupplier {
            name: name.to_string(),
            contact: self.contact.trim().to_string(),
            email: self.email.trim().to_string(),
        })
    }
}

/// Raw text of the purchase order form.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct OrderInput {
    pub item_id: String,
    pub supplier_id: String,
    pub quantity: String,
}

impl OrderInput {
    pub fn parse(&self) -> Result<NewPurchaseOrder> {
        let item_id = self.item_id.trim();
        let supplier_id = self.supplier_id.trim();
        let quantity = self.quantity.trim();
        if [item_id, supplier_id, quantity]
            .iter()
            .any(|value| value.is_empty())
        {
            return Err(InventoryError::Validation(
                "Please fill all fields.".to_string(),
            ));
        }

        Ok(NewPurchaseOrder {
            item_id: parse_integer("Item ID", item_id)?,
            supplier_id: parse_integer("Supplier ID", supplier_id)?,
            quantity: parse_integer("Quantity", quantity)?,
        })
    }
}

fn parse_integer(field: &'static str, raw: &str) -> Result<i64> {
    raw.parse::<i64>()
        .map_err(|_| InventoryError::numeric(field, raw))
}

/// SQLite stores NaN as NULL, so non-finite prices are rejected here rather
/// than corrupting the row.
fn parse_decimal(field: &'static str, raw: &str) -> Result<f64> {
    match raw.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(InventoryError::numeric(field, raw)),
    }
}
