//! Persistence module split across logical submodules. The free functions
//! work on a borrowed connection; [`Inventory`] is the narrow surface the UI
//! talks to, and [`Store`] implements it by opening one connection per call.

mod connection;
mod orders;
mod stock;
mod suppliers;
mod values;

use std::path::{Path, PathBuf};

use chrono::Local;

use crate::error::Result;
use crate::export;
use crate::models::{
    EntitySet, LowStockItem, NewPurchaseOrder, NewStockItem, NewSupplier, PurchaseOrder,
    StockItem, Supplier, Upsert,
};

pub use connection::{ensure_schema, Store};
pub use orders::{list_purchase_orders, record_purchase_order};
pub use stock::{delete_stock_item, list_low_stock, list_stock_items, upsert_stock_item};
pub use suppliers::{add_supplier, list_suppliers};

/// Record operations offered to the presentation layer. Each call is
/// self-contained: it either fully applies its writes or applies none.
pub trait Inventory {
    fn upsert_stock_item(&self, item: &NewStockItem) -> Result<Upsert>;
    fn delete_stock_item(&self, id: i64) -> Result<bool>;
    fn list_stock_items(&self) -> Result<Vec<StockItem>>;
    fn list_low_stock(&self, threshold: i64) -> Result<Vec<LowStockItem>>;
    fn add_supplier(&self, supplier: &NewSupplier) -> Result<Supplier>;
    fn list_suppliers(&self) -> Result<Vec<Supplier>>;
    /// Dated with today's local calendar date.
    fn record_purchase_order(&self, order: &NewPurchaseOrder) -> Result<PurchaseOrder>;
    fn list_purchase_orders(&self) -> Result<Vec<PurchaseOrder>>;
    fn export_table(&self, set: EntitySet, dir: &Path) -> Result<PathBuf>;
}

impl Inventory for Store {
    fn upsert_stock_item(&self, item: &NewStockItem) -> Result<Upsert> {
        let mut conn = self.connect()?;
        stock::upsert_stock_item(&mut conn, item)
    }

    fn delete_stock_item(&self, id: i64) -> Result<bool> {
        stock::delete_stock_item(&self.connect()?, id)
    }

    fn list_stock_items(&self) -> Result<Vec<StockItem>> {
        stock::list_stock_items(&self.connect()?)
    }

    fn list_low_stock(&self, threshold: i64) -> Result<Vec<LowStockItem>> {
        stock::list_low_stock(&self.connect()?, threshold)
    }

    fn add_supplier(&self, supplier: &NewSupplier) -> Result<Supplier> {
        suppliers::add_supplier(&self.connect()?, supplier)
    }

    fn list_suppliers(&self) -> Result<Vec<Supplier>> {
        suppliers::list_suppliers(&self.connect()?)
    }

    fn record_purchase_order(&self, order: &NewPurchaseOrder) -> Result<PurchaseOrder> {
        let mut conn = self.connect()?;
        orders::record_purchase_order(&mut conn, order, Local::now().date_naive())
    }

    fn list_purchase_orders(&self) -> Result<Vec<PurchaseOrder>> {
        orders::list_purchase_orders(&self.connect()?)
    }

    fn export_table(&self, set: EntitySet, dir: &Path) -> Result<PathBuf> {
        export::export_table(&self.connect()?, set, dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::InventoryError;
    use crate::export::read_report;
    use crate::models::LOW_STOCK_THRESHOLD;

    fn temp_store() -> (tempfile::TempDir, Store) {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::open_at(dir.path().join("inventory.db")).unwrap();
        (dir, store)
    }

    fn new_item(name: &str, quantity: i64) -> NewStockItem {
        NewStockItem {
            name: name.into(),
            supplier_id: 1,
            quantity,
            unit_price: 5.0,
        }
    }

    #[test]
    fn store_persists_across_connections() {
        let (_dir, store) = temp_store();
        let created = store.upsert_stock_item(&new_item("Speaker", 8)).unwrap();

        let reopened = Store::new(store.path());
        let items = reopened.list_stock_items().unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].id, created.id());
    }

    #[test]
    fn purchase_order_is_dated_today() {
        let (_dir, store) = temp_store();
        let item = store.upsert_stock_item(&new_item("Speaker", 8)).unwrap();

        let order = store
            .record_purchase_order(&NewPurchaseOrder {
                item_id: item.id(),
                supplier_id: 1,
                quantity: 7,
            })
            .unwrap();

        assert_eq!(order.order_date, Local::now().date_naive());
        assert_eq!(store.list_purchase_orders().unwrap(), vec![order]);
        assert_eq!(store.list_stock_items().unwrap()[0].quantity, 15);
        assert!(store.list_low_stock(LOW_STOCK_THRESHOLD).unwrap().is_empty());
    }

    #[test]
    fn unknown_item_order_leaves_store_untouched() {
        let (_dir, store) = temp_store();
        store.upsert_stock_item(&new_item("Speaker", 8)).unwrap();

        let err = store
            .record_purchase_order(&NewPurchaseOrder {
                item_id: 77,
                supplier_id: 1,
                quantity: 7,
            })
            .unwrap_err();

        assert!(matches!(err, InventoryError::NotFound { .. }));
        assert!(store.list_purchase_orders().unwrap().is_empty());
        assert_eq!(store.list_stock_items().unwrap()[0].quantity, 8);
    }

    #[test]
    fn export_through_store_writes_named_report() {
        let (dir, store) = temp_store();
        store.upsert_stock_item(&new_item("Speaker", 8)).unwrap();

        let path = store.export_table(EntitySet::Stock, dir.path()).unwrap();
        assert!(path.ends_with("Stock_Report.xlsx"));
        assert_eq!(read_report(&path).unwrap().rows.len(), 1);
    }

    #[test]
    fn missing_database_directory_is_a_storage_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::new(dir.path().join("absent").join("inventory.db"));
        assert!(matches!(
            store.list_suppliers(),
            Err(InventoryError::Storage(_))
        ));
    }
}
