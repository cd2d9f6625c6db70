//! Binary entry point: resolve settings, start logging, open the store, and
//! drive the Ratatui event loop until the user exits.
use clap::Parser;
use inventory_manager::config::{Cli, Config};
use inventory_manager::{logging, run_app, App, Store};
use tracing::info;

/// Fatal initialization problems (unwritable data directory, broken
/// terminal) bubble up to the shell; record errors inside the UI do not.
fn main() -> anyhow::Result<()> {
    let config = Config::from_cli(Cli::parse())?;
    let _log_guard = logging::init(&config.log_path)?;
    info!(db = %config.db_path.display(), "starting inventory manager");

    let store = Store::open_at(&config.db_path)?;
    let mut app = App::new(store, config.export_dir, config.low_stock_threshold);
    run_app(&mut app)
}
