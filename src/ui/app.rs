use std::mem;
use std::path::PathBuf;

use anyhow::Result;
use crossterm::event::KeyCode;
use open::that as open_path;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::prelude::*;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, TableState, Tabs, Wrap};
use ratatui::Frame;
use tracing::warn;

use crate::db::Inventory;
use crate::models::{PurchaseOrder, StockItem, Supplier, Upsert};

use super::forms::{ConfirmStockDelete, EntryForm, FormKind, LowStockAlert};
use super::helpers::{centered_rect, format_price, surface_error};
use super::screens::{Tab, TableView};

/// Footer space reserved for status messages and instructions.
const FOOTER_HEIGHT: u16 = 3;
/// Height of the tab bar at the top of the window.
const TABS_HEIGHT: u16 = 3;
/// Rows skipped by PageUp / PageDown.
const PAGE: isize = 10;

/// Fine-grained modes layered over the current tab.
enum Mode {
    Normal,
    Editing(EntryForm),
    ConfirmDelete(ConfirmStockDelete),
    LowStock(LowStockAlert),
}

/// Holds the footer message text plus its severity.
struct StatusMessage {
    text: String,
    kind: StatusKind,
}

/// Severity levels shown in the footer.
#[derive(Debug, PartialEq, Eq)]
enum StatusKind {
    Info,
    Warning,
    Error,
}

impl StatusKind {
    fn style(&self) -> Style {
        match self {
            StatusKind::Info => Style::default().fg(Color::Green),
            StatusKind::Warning => Style::default().fg(Color::Yellow),
            StatusKind::Error => Style::default().fg(Color::Red),
        }
    }
}

/// Central application state shared across the TUI. Every table is a copy of
/// what the store returned on the last re-query.
pub struct App<S: Inventory> {
    store: S,
    export_dir: PathBuf,
    threshold: i64,
    tab: Tab,
    stock: TableView<StockItem>,
    suppliers: TableView<Supplier>,
    orders: TableView<PurchaseOrder>,
    mode: Mode,
    status: Option<StatusMessage>,
    last_report: Option<PathBuf>,
}

impl<S: Inventory> App<S> {
    /// Load all three tables and run the startup low stock check. A table
    /// that fails to load starts empty with the error in the footer; `r`
    /// retries.
    pub fn new(store: S, export_dir: PathBuf, threshold: i64) -> Self {
        let mut app = Self {
            store,
            export_dir,
            threshold,
            tab: Tab::Stock,
            stock: TableView::new(Vec::new()),
            suppliers: TableView::new(Vec::new()),
            orders: TableView::new(Vec::new()),
            mode: Mode::Normal,
            status: None,
            last_report: None,
        };

        let loads = [
            ("stock", app.reload_stock(None)),
            ("suppliers", app.reload_suppliers(None)),
            ("purchase orders", app.reload_orders(None)),
        ];
        let mut loaded = true;
        for (table, result) in loads {
            if let Err(err) = result {
                let message = surface_error(&err);
                warn!(table, error = %message, "startup load failed");
                app.set_status(format!("Failed to load {table}: {message}"), StatusKind::Error);
                loaded = false;
            }
        }

        if loaded {
            app.mode = app.low_stock_mode(false);
        }
        app
    }

    /// Dispatch one key press. Returns `true` when the user asked to quit.
    /// Failed record operations never end the loop; they become status
    /// messages and the user may retry straight away.
    pub fn handle_key(&mut self, code: KeyCode) -> Result<bool> {
        let mut exit = false;
        let mode = mem::replace(&mut self.mode, Mode::Normal);

        self.mode = match mode {
            Mode::Normal => self.handle_normal_key(code, &mut exit),
            Mode::Editing(form) => self.handle_form(code, form),
            Mode::ConfirmDelete(confirm) => self.handle_confirm_delete(code, confirm),
            Mode::LowStock(_) => Mode::Normal,
        };

        Ok(exit)
    }

    fn handle_normal_key(&mut self, code: KeyCode, exit: &mut bool) -> Mode {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => *exit = true,
            KeyCode::Tab | KeyCode::Right => self.switch_tab(self.tab.next()),
            KeyCode::BackTab | KeyCode::Left => self.switch_tab(self.tab.previous()),
            KeyCode::Char('1') => self.switch_tab(Tab::Stock),
            KeyCode::Char('2') => self.switch_tab(Tab::Suppliers),
            KeyCode::Char('3') => self.switch_tab(Tab::Orders),
            KeyCode::Up => self.move_selection(-1),
            KeyCode::Down => self.move_selection(1),
            KeyCode::PageUp => self.move_selection(-PAGE),
            KeyCode::PageDown => self.move_selection(PAGE),
            KeyCode::Home => self.select_edge(true),
            KeyCode::End => self.select_edge(false),
            KeyCode::Char('+') | KeyCode::Char('a') => {
                self.clear_status();
                let kind = match self.tab {
                    Tab::Stock => FormKind::Stock,
                    Tab::Suppliers => FormKind::Supplier,
                    Tab::Orders => FormKind::Order,
                };
                return Mode::Editing(EntryForm::new(kind));
            }
            KeyCode::Char('e') | KeyCode::Char('E') if self.tab == Tab::Stock => {
                if let Some(item) = self.stock.current() {
                    let form = EntryForm::from_stock_item(item);
                    self.clear_status();
                    return Mode::Editing(form);
                }
                self.set_status("Please select an item to edit.", StatusKind::Error);
            }
            KeyCode::Char('-') | KeyCode::Delete if self.tab == Tab::Stock => {
                if let Some(item) = self.stock.current() {
                    let confirm = ConfirmStockDelete::from(item);
                    self.clear_status();
                    return Mode::ConfirmDelete(confirm);
                }
                self.set_status("Please select an item to delete.", StatusKind::Error);
            }
            KeyCode::Char('x') | KeyCode::Char('X') => self.export_current(),
            KeyCode::Char('o') | KeyCode::Char('O') => self.open_last_report(),
            KeyCode::Char('l') | KeyCode::Char('L') => return self.low_stock_mode(true),
            KeyCode::Char('r') | KeyCode::Char('R') => {
                let reloaded = self.reload_all();
                if self.report(reloaded).is_some() {
                    self.set_status("Tables refreshed.", StatusKind::Info);
                }
            }
            _ => {}
        }
        Mode::Normal
    }

    fn handle_form(&mut self, code: KeyCode, mut form: EntryForm) -> Mode {
        match code {
            KeyCode::Esc => {
                self.set_status(format!("{} cancelled.", form.title), StatusKind::Info);
                return Mode::Normal;
            }
            KeyCode::Tab | KeyCode::Down => form.next_field(),
            KeyCode::BackTab | KeyCode::Up => form.previous_field(),
            KeyCode::Backspace => form.backspace(),
            KeyCode::Enter => match self.submit_form(&form) {
                Ok(()) => return Mode::Normal,
                Err(err) => {
                    let message = surface_error(&err);
                    warn!(form = form.title, error = %message, "form submission failed");
                    form.error = Some(message.clone());
                    self.set_status(message, StatusKind::Error);
                }
            },
            KeyCode::Char(ch) => {
                if form.push_char(ch) {
                    form.error = None;
                }
            }
            _ => {}
        }
        Mode::Editing(form)
    }

    fn handle_confirm_delete(&mut self, code: KeyCode, confirm: ConfirmStockDelete) -> Mode {
        match code {
            KeyCode::Esc | KeyCode::Char('n') | KeyCode::Char('N') => {
                self.set_status("Deletion cancelled.", StatusKind::Info);
                Mode::Normal
            }
            KeyCode::Enter | KeyCode::Char('y') | KeyCode::Char('Y') => {
                match self.perform_delete(&confirm) {
                    Ok(()) => Mode::Normal,
                    Err(err) => {
                        let message = surface_error(&err);
                        warn!(id = confirm.id, error = %message, "delete failed");
                        self.set_status(message, StatusKind::Error);
                        Mode::ConfirmDelete(confirm)
                    }
                }
            }
            _ => Mode::ConfirmDelete(confirm),
        }
    }

    fn submit_form(&mut self, form: &EntryForm) -> Result<()> {
        match form.kind {
            FormKind::Stock => {
                let item = form.stock_input().parse()?;
                let outcome = self.store.upsert_stock_item(&item)?;
                self.reload_stock(Some(outcome.id()))?;
                let verb = match outcome {
                    Upsert::Created(_) => "added",
                    Upsert::Updated(_) => "updated",
                };
                if item.quantity < self.threshold {
                    self.set_status(
                        format!(
                            "'{}' {verb}; only {} left in stock.",
                            item.name, item.quantity
                        ),
                        StatusKind::Warning,
                    );
                } else {
                    self.set_status(format!("'{}' {verb}.", item.name), StatusKind::Info);
                }
            }
            FormKind::Supplier => {
                let supplier = form.supplier_input().parse()?;
                let added = self.store.add_supplier(&supplier)?;
                self.reload_suppliers(Some(added.id))?;
                self.set_status(
                    format!("Supplier '{}' added with ID {}.", added.name, added.id),
                    StatusKind::Info,
                );
            }
            FormKind::Order => {
                let order = form.order_input().parse()?;
                let recorded = self.store.record_purchase_order(&order)?;
                self.reload_orders(Some(recorded.id))?;
                self.reload_stock(Some(recorded.item_id))?;
                self.set_status(
                    "Purchase order recorded and stock updated.",
                    StatusKind::Info,
                );
            }
        }
        Ok(())
    }

    fn perform_delete(&mut self, confirm: &ConfirmStockDelete) -> Result<()> {
        self.store.delete_stock_item(confirm.id)?;
        self.reload_stock(None)?;
        self.set_status(
            format!("Item '{}' deleted successfully.", confirm.name),
            StatusKind::Info,
        );
        Ok(())
    }

    fn export_current(&mut self) {
        let set = self.tab.entity_set();
        match self.store.export_table(set, &self.export_dir) {
            Ok(path) => {
                self.set_status(
                    format!("{set} report saved as {}. Press 'o' to open it.", path.display()),
                    StatusKind::Info,
                );
                self.last_report = Some(path);
            }
            Err(err) => {
                let err = anyhow::Error::from(err);
                self.report::<()>(Err(err));
            }
        }
    }

    fn open_last_report(&mut self) {
        match self.last_report.clone() {
            None => self.set_status("No report exported yet. Press 'x' first.", StatusKind::Error),
            Some(path) => match open_path(&path) {
                Ok(()) => self.set_status(format!("Opened {}.", path.display()), StatusKind::Info),
                Err(err) => {
                    self.set_status(format!("Failed to open report: {err}"), StatusKind::Error)
                }
            },
        }
    }

    /// Query the low stock list. With `on_demand` set, an empty result is
    /// reported in the footer; at startup it stays silent.
    fn low_stock_mode(&mut self, on_demand: bool) -> Mode {
        match self.store.list_low_stock(self.threshold) {
            Ok(items) if !items.is_empty() => Mode::LowStock(LowStockAlert {
                threshold: self.threshold,
                items,
            }),
            Ok(_) => {
                if on_demand {
                    self.set_status(
                        format!("No items below {} in stock.", self.threshold),
                        StatusKind::Info,
                    );
                }
                Mode::Normal
            }
            Err(err) => {
                self.report::<()>(Err(err.into()));
                Mode::Normal
            }
        }
    }

    /// Turn an error into a red footer message, keeping the success value.
    fn report<T>(&mut self, result: Result<T>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(err) => {
                let message = surface_error(&err);
                warn!(error = %message, "action failed");
                self.set_status(message, StatusKind::Error);
                None
            }
        }
    }

    fn reload_all(&mut self) -> Result<()> {
        self.reload_stock(None)?;
        self.reload_suppliers(None)?;
        self.reload_orders(None)
    }

    fn reload_stock(&mut self, focus_id: Option<i64>) -> Result<()> {
        let rows = self.store.list_stock_items()?;
        self.stock
            .set_rows(rows, focus_id.map(|id| move |item: &StockItem| item.id == id));
        Ok(())
    }

    fn reload_suppliers(&mut self, focus_id: Option<i64>) -> Result<()> {
        let rows = self.store.list_suppliers()?;
        self.suppliers
            .set_rows(rows, focus_id.map(|id| move |row: &Supplier| row.id == id));
        Ok(())
    }

    fn reload_orders(&mut self, focus_id: Option<i64>) -> Result<()> {
        let rows = self.store.list_purchase_orders()?;
        self.orders
            .set_rows(rows, focus_id.map(|id| move |row: &PurchaseOrder| row.id == id));
        Ok(())
    }

    fn switch_tab(&mut self, tab: Tab) {
        if self.tab != tab {
            self.tab = tab;
            self.clear_status();
        }
    }

    fn move_selection(&mut self, offset: isize) {
        match self.tab {
            Tab::Stock => self.stock.move_selection(offset),
            Tab::Suppliers => self.suppliers.move_selection(offset),
            Tab::Orders => self.orders.move_selection(offset),
        }
    }

    fn select_edge(&mut self, first: bool) {
        match (self.tab, first) {
            (Tab::Stock, true) => self.stock.select_first(),
            (Tab::Stock, false) => self.stock.select_last(),
            (Tab::Suppliers, true) => self.suppliers.select_first(),
            (Tab::Suppliers, false) => self.suppliers.select_last(),
            (Tab::Orders, true) => self.orders.select_first(),
            (Tab::Orders, false) => self.orders.select_last(),
        }
    }

    fn set_status<T: Into<String>>(&mut self, text: T, kind: StatusKind) {
        self.status = Some(StatusMessage {
            text: text.into(),
            kind,
        });
    }

    fn clear_status(&mut self) {
        self.status = None;
    }

    pub(crate) fn draw(&self, frame: &mut Frame) {
        let area = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(TABS_HEIGHT),
                Constraint::Min(0),
                Constraint::Length(FOOTER_HEIGHT),
            ])
            .split(area);

        self.draw_tabs(frame, chunks[0]);
        match self.tab {
            Tab::Stock => self.draw_stock_table(frame, chunks[1]),
            Tab::Suppliers => self.draw_supplier_table(frame, chunks[1]),
            Tab::Orders => self.draw_order_table(frame, chunks[1]),
        }
        self.draw_footer(frame, chunks[2]);

        match &self.mode {
            Mode::Normal => {}
            Mode::Editing(form) => self.draw_form(frame, area, form),
            Mode::ConfirmDelete(confirm) => self.draw_confirm_delete(frame, area, confirm),
            Mode::LowStock(alert) => self.draw_low_stock(frame, area, alert),
        }
    }

    fn draw_tabs(&self, frame: &mut Frame, area: Rect) {
        let titles: Vec<Line> = Tab::ALL
            .iter()
            .enumerate()
            .map(|(idx, tab)| Line::from(format!(" {} {} ", idx + 1, tab.title())))
            .collect();
        let tabs = Tabs::new(titles)
            .select(self.tab.index())
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title("Inventory Management System"),
            )
            .highlight_style(
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            );
        frame.render_widget(tabs, area);
    }

    fn draw_stock_table(&self, frame: &mut Frame, area: Rect) {
        let rows = self.stock.rows.iter().map(|item| {
            let row = Row::new(vec![
                Cell::from(item.id.to_string()),
                Cell::from(item.name.clone()),
                Cell::from(item.supplier_id.to_string()),
                Cell::from(item.quantity.to_string()),
                Cell::from(format_price(item.unit_price)),
            ]);
            if item.is_low(self.threshold) {
                row.style(Style::default().fg(Color::Red))
            } else {
                row
            }
        });
        let widths = [
            Constraint::Length(6),
            Constraint::Min(20),
            Constraint::Length(12),
            Constraint::Length(8),
            Constraint::Length(12),
        ];
        self.render_table(
            frame,
            area,
            ["ID", "Item", "Supplier", "Qty", "Price"],
            rows,
            &widths,
            self.stock.selected,
            self.stock.is_empty(),
        );
    }

    fn draw_supplier_table(&self, frame: &mut Frame, area: Rect) {
        let rows = self.suppliers.rows.iter().map(|supplier| {
            Row::new(vec![
                Cell::from(supplier.id.to_string()),
                Cell::from(supplier.name.clone()),
                Cell::from(supplier.contact.clone()),
                Cell::from(supplier.email.clone()),
            ])
        });
        let widths = [
            Constraint::Length(6),
            Constraint::Min(20),
            Constraint::Length(18),
            Constraint::Min(24),
        ];
        self.render_table(
            frame,
            area,
            ["ID", "Name", "Contact", "Email"],
            rows,
            &widths,
            self.suppliers.selected,
            self.suppliers.is_empty(),
        );
    }

    fn draw_order_table(&self, frame: &mut Frame, area: Rect) {
        let rows = self.orders.rows.iter().map(|order| {
            Row::new(vec![
                Cell::from(order.id.to_string()),
                Cell::from(order.item_id.to_string()),
                Cell::from(order.supplier_id.to_string()),
                Cell::from(order.quantity.to_string()),
                Cell::from(order.order_date.format("%Y-%m-%d").to_string()),
            ])
        });
        let widths = [
            Constraint::Length(10),
            Constraint::Length(10),
            Constraint::Length(12),
            Constraint::Length(8),
            Constraint::Length(12),
        ];
        self.render_table(
            frame,
            area,
            ["Order ID", "Item ID", "Supplier ID", "Qty", "Date"],
            rows,
            &widths,
            self.orders.selected,
            self.orders.is_empty(),
        );
    }

    #[allow(clippy::too_many_arguments)]
    fn render_table<'a, const N: usize>(
        &self,
        frame: &mut Frame,
        area: Rect,
        headers: [&'static str; N],
        rows: impl Iterator<Item = Row<'a>>,
        widths: &[Constraint; N],
        selected: usize,
        empty: bool,
    ) {
        let block = Block::default().borders(Borders::ALL).title(self.tab.title());
        if empty {
            let message = Paragraph::new("No records yet. Press '+' to add one.")
                .alignment(Alignment::Center)
                .block(block);
            frame.render_widget(message, area);
            return;
        }

        let header = Row::new(headers.to_vec())
            .style(Style::default().add_modifier(Modifier::BOLD))
            .bottom_margin(1);
        let table = Table::new(rows, widths.to_vec())
            .header(header)
            .block(block)
            .row_highlight_style(Style::default().fg(Color::Yellow))
            .highlight_symbol("▶ ");

        let mut state = TableState::default().with_selected(Some(selected));
        frame.render_stateful_widget(table, area, &mut state);
    }

    fn draw_footer(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::TOP);
        frame.render_widget(block.clone(), area);
        let inner = block.inner(area);

        let status_line = if let Some(status) = &self.status {
            Line::from(vec![Span::styled(status.text.clone(), status.kind.style())])
        } else {
            Line::from("")
        };

        let paragraph = Paragraph::new(vec![status_line, self.footer_instructions()])
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }

    fn footer_instructions(&self) -> Line<'static> {
        let key_style = Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD);
        let mut pairs: Vec<(&str, &str)> = match &self.mode {
            Mode::Editing(_) => vec![
                ("[Tab]", " Next field   "),
                ("[Enter]", " Save   "),
                ("[Esc]", " Cancel"),
            ],
            Mode::ConfirmDelete(_) => vec![("[Y]", " Delete   "), ("[N]", " Keep")],
            Mode::LowStock(_) => vec![("[Any key]", " Dismiss")],
            Mode::Normal => vec![("[Tab]", " Switch tab   "), ("[+]", " Add   ")],
        };
        if matches!(self.mode, Mode::Normal) {
            if self.tab == Tab::Stock {
                pairs.push(("[e]", " Edit   "));
                pairs.push(("[-]", " Delete   "));
                pairs.push(("[l]", " Low stock   "));
            }
            pairs.push(("[x]", " Export   "));
            pairs.push(("[o]", " Open report   "));
            pairs.push(("[r]", " Refresh   "));
            pairs.push(("[q]", " Quit"));
        }

        let spans: Vec<Span<'static>> = pairs
            .into_iter()
            .flat_map(|(key, text)| [Span::styled(key, key_style), Span::raw(text)])
            .collect();
        Line::from(spans)
    }

    fn draw_form(&self, frame: &mut Frame, area: Rect, form: &EntryForm) {
        let popup_area = centered_rect(60, 50, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default().title(form.title).borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let mut lines: Vec<Line> = (0..form.values.len())
            .map(|idx| form.build_line(idx))
            .collect();
        lines.push(Line::from(""));

        if let Some(error) = &form.error {
            lines.push(Line::from(Span::styled(
                error.clone(),
                Style::default().fg(Color::Red),
            )));
        } else {
            lines.push(Line::from(Span::styled(
                "Enter to save • Tab to switch • Esc to cancel",
                Style::default().fg(Color::Gray),
            )));
        }

        let paragraph = Paragraph::new(lines).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);

        let cursor_x = inner.x + form.cursor_offset() as u16;
        let cursor_y = inner.y + form.active as u16;
        frame.set_cursor_position((cursor_x, cursor_y));
    }

    fn draw_confirm_delete(&self, frame: &mut Frame, area: Rect, confirm: &ConfirmStockDelete) {
        let popup_area = centered_rect(60, 30, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default()
            .title("Confirm Delete")
            .borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let lines = vec![
            Line::from(format!("Delete item {} ('{}')?", confirm.id, confirm.name)),
            Line::from("Purchase orders that reference it are kept."),
            Line::from(""),
            Line::from(Span::styled(
                "Press Y to confirm or N / Esc to cancel.",
                Style::default().fg(Color::Gray),
            )),
        ];

        let paragraph = Paragraph::new(lines)
            .alignment(Alignment::Left)
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }

    fn draw_low_stock(&self, frame: &mut Frame, area: Rect, alert: &LowStockAlert) {
        let popup_area = centered_rect(60, 60, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default()
            .title("Low Stock Alert")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Yellow));
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let mut lines = vec![
            Line::from(format!(
                "The following items are below {} in stock:",
                alert.threshold
            )),
            Line::from(""),
        ];
        lines.extend(alert.items.iter().map(|item| Line::from(item.to_string())));
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "Press any key to dismiss.",
            Style::default().fg(Color::Gray),
        )));

        frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), inner);
    }
}
