//! Ratatui front-end: one tab per table, modal forms for input, and a footer
//! for status messages. All data access goes through [`crate::db::Inventory`].

mod app;
mod forms;
mod helpers;
mod screens;
mod terminal;

pub use app::App;
pub use terminal::run_app;
