use std::fs;
use std::path::{Path, PathBuf};

use rusqlite::Connection;
use tracing::{debug, info};

use crate::error::Result;

/// Handle to the on-disk SQLite database. It only owns the path: every
/// operation opens its own connection through [`Store::connect`] and drops it
/// before returning, so nothing stays open between key presses.
#[derive(Debug, Clone)]
pub struct Store {
    path: PathBuf,
}

impl Store {
    /// Wrap an existing database path without touching the file system.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Create the parent directory if needed, make sure the three tables
    /// exist, and return the handle.
    pub fn open_at(path: impl Into<PathBuf>) -> Result<Self> {
        let store = Self::new(path);
        if let Some(parent) = store.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let conn = store.connect()?;
        ensure_schema(&conn)?;
        info!(path = %store.path.display(), "inventory store ready");
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Open a fresh connection for a single operation.
    pub fn connect(&self) -> Result<Connection> {
        debug!(path = %self.path.display(), "opening connection");
        let conn = Connection::open(&self.path)?;
        relax_foreign_keys(&conn)?;
        Ok(conn)
    }
}

/// Supplier and item ids are stored as given and never checked against their
/// tables. Bundled SQLite enforces declared foreign keys by default, so every
/// connection switches that off.
fn relax_foreign_keys(conn: &Connection) -> Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = OFF")?;
    Ok(())
}

/// Create the suppliers, stock, and purchase order tables when absent. There
/// is no versioning; existing tables are left untouched. Foreign keys are
/// declared for documentation only: enforcement is off on `conn` afterwards.
pub fn ensure_schema(conn: &Connection) -> Result<()> {
    relax_foreign_keys(conn)?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS suppliers (
            supplier_id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT,
            contact TEXT,
            email TEXT
        )",
        [],
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS stock (
            item_id INTEGER PRIMARY KEY AUTOINCREMENT,
            item_name TEXT,
            supplier_id INTEGER,
            qty INTEGER,
            price REAL,
            FOREIGN KEY (supplier_id) REFERENCES suppliers(supplier_id)
        )",
        [],
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS purchase_orders (
            order_id INTEGER PRIMARY KEY AUTOINCREMENT,
            item_id INTEGER,
            supplier_id INTEGER,
            qty INTEGER,
            order_date TEXT,
            FOREIGN KEY (item_id) REFERENCES stock(item_id),
            FOREIGN KEY (supplier_id) REFERENCES suppliers(supplier_id)
        )",
        [],
    )?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_at_creates_parent_and_tables() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("inventory.db");
        let store = Store::open_at(&path).unwrap();
        assert!(path.exists());

        let conn = store.connect().unwrap();
        let mut stmt = conn
            .prepare("SELECT name FROM sqlite_master WHERE type = 'table' ORDER BY name")
            .unwrap();
        let tables: Vec<String> = stmt
            .query_map([], |row| row.get(0))
            .unwrap()
            .collect::<std::result::Result<_, _>>()
            .unwrap();
        assert!(tables.contains(&"stock".to_string()));
        assert!(tables.contains(&"suppliers".to_string()));
        assert!(tables.contains(&"purchase_orders".to_string()));
    }

    #[test]
    fn ensure_schema_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("inventory.db");
        let store = Store::open_at(&path).unwrap();
        store
            .connect()
            .unwrap()
            .execute(
                "INSERT INTO suppliers (name, contact, email) VALUES ('Acme', '', '')",
                [],
            )
            .unwrap();

        let reopened = Store::open_at(&path).unwrap();
        let count: i64 = reopened
            .connect()
            .unwrap()
            .query_row("SELECT COUNT(*) FROM suppliers", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 1);
    }

    fn foreign_keys_enabled(conn: &Connection) -> bool {
        conn.query_row("PRAGMA foreign_keys", [], |row| row.get::<_, i64>(0))
            .unwrap()
            != 0
    }

    #[test]
    fn connections_do_not_enforce_foreign_keys() {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::open_at(dir.path().join("inventory.db")).unwrap();
        let conn = store.connect().unwrap();
        assert!(!foreign_keys_enabled(&conn));

        conn.execute(
            "INSERT INTO stock (item_name, supplier_id, qty, price) VALUES ('Cable', 99, 1, 1.0)",
            [],
        )
        .unwrap();
        conn.execute(
            "INSERT INTO purchase_orders (item_id, supplier_id, qty, order_date)
             VALUES (500, 42, 1, '2024-01-01')",
            [],
        )
        .unwrap();
    }

    #[test]
    fn ensure_schema_relaxes_in_memory_connections() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch("PRAGMA foreign_keys = ON").unwrap();
        ensure_schema(&conn).unwrap();
        assert!(!foreign_keys_enabled(&conn));
    }
}
