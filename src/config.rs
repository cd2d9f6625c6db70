use std::path::PathBuf;

use anyhow::{anyhow, Result};
use clap::Parser;
use directories::BaseDirs;

use crate::models::LOW_STOCK_THRESHOLD;

/// Folder name used beneath the user's home directory for application data.
const DATA_DIR_NAME: &str = ".inventory-manager";
/// SQLite file name stored inside the application data directory.
const DB_FILE_NAME: &str = "inventory.db";
/// Log file written next to the database.
const LOG_FILE_NAME: &str = "inventory-manager.log";

/// Command-line flags. Every flag has a default so a bare invocation works.
#[derive(Debug, Parser)]
#[command(name = "inventory-manager", version, about = "Stock, supplier and purchase order manager")]
pub struct Cli {
    /// SQLite database file [default: ~/.inventory-manager/inventory.db]
    #[arg(long, value_name = "PATH")]
    pub db: Option<PathBuf>,

    /// Directory that spreadsheet reports are written to
    #[arg(long, value_name = "DIR", default_value = ".")]
    pub export_dir: PathBuf,

    /// Items with a quantity below this value are flagged as low stock
    #[arg(long, value_name = "N", default_value_t = LOW_STOCK_THRESHOLD)]
    pub low_stock_threshold: i64,

    /// Log file [default: inventory-manager.log beside the database]
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

/// Resolved runtime settings.
#[derive(Debug, Clone)]
pub struct Config {
    pub db_path: PathBuf,
    pub export_dir: PathBuf,
    pub low_stock_threshold: i64,
    pub log_path: PathBuf,
}

impl Config {
    pub fn from_cli(cli: Cli) -> Result<Self> {
        let db_path = match cli.db {
            Some(path) => path,
            None => default_db_path()?,
        };
        let log_path = cli.log_file.unwrap_or_else(|| db_path.with_file_name(LOG_FILE_NAME));

        Ok(Self {
            db_path,
            export_dir: cli.export_dir,
            low_stock_threshold: cli.low_stock_threshold,
            log_path,
        })
    }
}

/// Resolve the absolute path to the SQLite database inside the user's home.
fn default_db_path() -> Result<PathBuf> {
    let base_dirs = BaseDirs::new().ok_or_else(|| anyhow!("could not locate home directory"))?;
    Ok(base_dirs.home_dir().join(DATA_DIR_NAME).join(DB_FILE_NAME))
}
