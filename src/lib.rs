//! Core library surface for the Inventory Manager TUI application.
//!
//! The record layer (`db`, `input`, `export`) is usable on its own; the `ui`
//! module is a thin terminal front-end over the [`Inventory`] trait.
pub mod config;
pub mod db;
pub mod error;
pub mod export;
pub mod input;
pub mod logging;
pub mod models;
pub mod ui;

/// Convenience re-exports for the persistence layer.
pub use db::{ensure_schema, Inventory, Store};

pub use error::{InventoryError, Result};

/// Domain types that other layers manipulate.
pub use models::{
    EntitySet, LowStockItem, PurchaseOrder, StockItem, Supplier, Upsert, LOW_STOCK_THRESHOLD,
};

/// The interactive application entry point and state container.
pub use ui::{run_app, App};
