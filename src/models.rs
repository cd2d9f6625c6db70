//! Domain models that mirror the SQLite schema and get passed between the
//! record layer and the TUI. They stay plain data holders; parsing lives in
//! `input` and persistence in `db`.

use std::fmt;

use chrono::NaiveDate;

/// Quantity below which an item is reported as low stock.
pub const LOW_STOCK_THRESHOLD: i64 = 10;

#[derive(Debug, Clone, PartialEq)]
/// A vendor that stock items and purchase orders point at by id.
pub struct Supplier {
    pub id: i64,
    pub name: String,
    /// Free-form phone or contact person. Stored exactly as entered.
    pub contact: String,
    pub email: String,
}

impl fmt::Display for Supplier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

#[derive(Debug, Clone, PartialEq)]
/// One row of the `stock` table. `name` is the key used by add-or-update,
/// `id` is the key used by delete and purchase orders.
pub struct StockItem {
    pub id: i64,
    pub name: String,
    /// Not checked against `suppliers`; the schema only declares the link.
    pub supplier_id: i64,
    pub quantity: i64,
    pub unit_price: f64,
}

impl StockItem {
    pub fn is_low(&self, threshold: i64) -> bool {
        self.quantity < threshold
    }
}

#[derive(Debug, Clone, PartialEq)]
/// Append-only ledger entry. Recording one also bumps the referenced item's
/// quantity.
pub struct PurchaseOrder {
    pub id: i64,
    pub item_id: i64,
    pub supplier_id: i64,
    pub quantity: i64,
    pub order_date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq)]
/// Name and quantity pair returned by the low stock query.
pub struct LowStockItem {
    pub name: String,
    pub quantity: i64,
}

impl fmt::Display for LowStockItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - Qty: {}", self.name, self.quantity)
    }
}

/// Typed values for an add-or-update of a stock item.
#[derive(Debug, Clone, PartialEq)]
pub struct NewStockItem {
    pub name: String,
    pub supplier_id: i64,
    pub quantity: i64,
    pub unit_price: f64,
}

/// Typed values for a new supplier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSupplier {
    pub name: String,
    pub contact: String,
    pub email: String,
}

/// Typed values for a new purchase order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewPurchaseOrder {
    pub item_id: i64,
    pub supplier_id: i64,
    pub quantity: i64,
}

/// Outcome of an add-or-update keyed by item name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Upsert {
    /// An item with that name existed and was overwritten.
    Updated(i64),
    /// No item had that name; a new row was inserted.
    Created(i64),
}

impl Upsert {
    pub fn id(self) -> i64 {
        match self {
            Upsert::Updated(id) | Upsert::Created(id) => id,
        }
    }
}

/// The three tables that can be exported. Each maps to a fixed table name
/// so no user text ever reaches the SQL string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntitySet {
    Stock,
    Suppliers,
    PurchaseOrders,
}

impl EntitySet {
    pub const ALL: [EntitySet; 3] = [
        EntitySet::Stock,
        EntitySet::Suppliers,
        EntitySet::PurchaseOrders,
    ];

    pub fn table_name(self) -> &'static str {
        match self {
            EntitySet::Stock => "stock",
            EntitySet::Suppliers => "suppliers",
            EntitySet::PurchaseOrders => "purchase_orders",
        }
    }

    /// Primary key column, used to keep exports in insertion order.
    pub fn key_column(self) -> &'static str {
        match self {
            EntitySet::Stock => "item_id",
            EntitySet::Suppliers => "supplier_id",
            EntitySet::PurchaseOrders => "order_id",
        }
    }

    /// File name of the spreadsheet report, e.g. `Stock_Report.xlsx`.
    pub fn report_file_name(self) -> String {
        format!("{self}_Report.xlsx")
    }
}

impl fmt::Display for EntitySet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            EntitySet::Stock => "Stock",
            EntitySet::Suppliers => "Suppliers",
            EntitySet::PurchaseOrders => "PurchaseOrders",
        };
        write!(f, "{label}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_names_follow_entity_set() {
        assert_eq!(EntitySet::Stock.report_file_name(), "Stock_Report.xlsx");
        assert_eq!(
            EntitySet::Suppliers.report_file_name(),
            "Suppliers_Report.xlsx"
        );
        assert_eq!(
            EntitySet::PurchaseOrders.report_file_name(),
            "PurchaseOrders_Report.xlsx"
        );
    }

    #[test]
    fn low_stock_is_strictly_below_threshold() {
        let mut item = StockItem {
            id: 1,
            name: "Cable".into(),
            supplier_id: 1,
            quantity: LOW_STOCK_THRESHOLD,
            unit_price: 1.0,
        };
        assert!(!item.is_low(LOW_STOCK_THRESHOLD));
        item.quantity -= 1;
        assert!(item.is_low(LOW_STOCK_THRESHOLD));
    }
}
