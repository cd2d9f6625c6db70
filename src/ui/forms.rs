use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};

use crate::input::{OrderInput, StockInput, SupplierInput};
use crate::models::{LowStockItem, StockItem};

/// Which record a form collects.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum FormKind {
    Stock,
    Supplier,
    Order,
}

impl FormKind {
    /// Field labels in tab order.
    pub(crate) fn labels(self) -> &'static [&'static str] {
        match self {
            FormKind::Stock => &["Item Name", "Supplier ID", "Quantity", "Price"],
            FormKind::Supplier => &["Name", "Contact", "Email"],
            FormKind::Order => &["Item ID", "Supplier ID", "Quantity"],
        }
    }

    fn is_required(self, index: usize) -> bool {
        match self {
            FormKind::Supplier => index == 0,
            FormKind::Stock | FormKind::Order => true,
        }
    }
}

/// Modal input form shared by the three tabs. Values are kept as raw text
/// and only parsed on submit so numeric mistakes are reported, not swallowed.
#[derive(Clone, Debug)]
pub(crate) struct EntryForm {
    pub(crate) kind: FormKind,
    pub(crate) title: &'static str,
    pub(crate) values: Vec<String>,
    pub(crate) active: usize,
    pub(crate) error: Option<String>,
}

impl EntryForm {
    pub(crate) fn new(kind: FormKind) -> Self {
        let title = match kind {
            FormKind::Stock => "Add / Update Stock",
            FormKind::Supplier => "Add Supplier",
            FormKind::Order => "Record Purchase Order",
        };
        Self {
            kind,
            title,
            values: vec![String::new(); kind.labels().len()],
            active: 0,
            error: None,
        }
    }

    /// Prefill the stock form from an existing row. Submitting saves by name,
    /// so keeping the name updates the same row.
    pub(crate) fn from_stock_item(item: &StockItem) -> Self {
        Self {
            title: "Update Stock",
            values: vec![
                item.name.clone(),
                item.supplier_id.to_string(),
                item.quantity.to_string(),
                item.unit_price.to_string(),
            ],
            active: 2,
            ..Self::new(FormKind::Stock)
        }
    }

    pub(crate) fn next_field(&mut self) {
        self.active = (self.active + 1) % self.values.len();
    }

    pub(crate) fn previous_field(&mut self) {
        self.active = (self.active + self.values.len() - 1) % self.values.len();
    }

    /// Append a character to the active field. Control characters are
    /// ignored.
    pub(crate) fn push_char(&mut self, ch: char) -> bool {
        if ch.is_control() {
            return false;
        }
        self.values[self.active].push(ch);
        true
    }

    pub(crate) fn backspace(&mut self) {
        self.values[self.active].pop();
    }

    pub(crate) fn stock_input(&self) -> StockInput {
        StockInput {
            name: self.values[0].clone(),
            supplier_id: self.values[1].clone(),
            quantity: self.values[2].clone(),
            unit_price: self.values[3].clone(),
        }
    }

    pub(crate) fn supplier_input(&self) -> SupplierInput {
        SupplierInput {
            name: self.values[0].clone(),
            contact: self.values[1].clone(),
            email: self.values[2].clone(),
        }
    }

    pub(crate) fn order_input(&self) -> OrderInput {
        OrderInput {
            item_id: self.values[0].clone(),
            supplier_id: self.values[1].clone(),
            quantity: self.values[2].clone(),
        }
    }

    /// Styled `Label: value` line, highlighting the focused field.
    pub(crate) fn build_line(&self, index: usize) -> Line<'static> {
        let label = self.kind.labels()[index];
        let value = &self.values[index];
        let is_active = index == self.active;

        let display = if value.is_empty() {
            if self.kind.is_required(index) {
                "<required>".to_string()
            } else {
                "<optional>".to_string()
            }
        } else {
            value.clone()
        };

        let style = if is_active {
            Style::default().fg(Color::Yellow)
        } else if value.is_empty() {
            Style::default().fg(Color::DarkGray)
        } else {
            Style::default()
        };

        Line::from(vec![
            Span::raw(format!("{label}: ")),
            Span::styled(display, style),
        ])
    }

    /// Cursor column offset for the active field, label prefix included.
    pub(crate) fn cursor_offset(&self) -> usize {
        let label = self.kind.labels()[self.active];
        label.chars().count() + 2 + self.values[self.active].chars().count()
    }
}

/// Pending confirmation before a stock row is deleted.
#[derive(Clone, Debug)]
pub(crate) struct ConfirmStockDelete {
    pub(crate) id: i64,
    pub(crate) name: String,
}

impl ConfirmStockDelete {
    pub(crate) fn from(item: &StockItem) -> Self {
        Self {
            id: item.id,
            name: item.name.clone(),
        }
    }
}

/// Items listed in the low stock alert.
#[derive(Clone, Debug)]
pub(crate) struct LowStockAlert {
    pub(crate) threshold: i64,
    pub(crate) items: Vec<LowStockItem>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fields_cycle_and_collect_input() {
        let mut form = EntryForm::new(FormKind::Order);
        for ch in "12".chars() {
            form.push_char(ch);
        }
        form.next_field();
        form.push_char('3');
        form.next_field();
        form.push_char('9');
        form.push_char('9');
        form.backspace();
        form.next_field();
        assert_eq!(form.active, 0);
        form.previous_field();
        assert_eq!(form.active, 2);

        assert_eq!(
            form.order_input(),
            OrderInput {
                item_id: "12".into(),
                supplier_id: "3".into(),
                quantity: "9".into(),
            }
        );
    }

    #[test]
    fn control_characters_are_ignored() {
        let mut form = EntryForm::new(FormKind::Supplier);
        assert!(!form.push_char('\u{7}'));
        assert!(form.push_char('A'));
        assert_eq!(form.values[0], "A");
    }

    #[test]
    fn edit_form_is_prefilled_from_row() {
        let item = StockItem {
            id: 4,
            name: "Tablet".into(),
            supplier_id: 2,
            quantity: 6,
            unit_price: 199.5,
        };
        let form = EntryForm::from_stock_item(&item);
        assert_eq!(form.kind, FormKind::Stock);
        assert_eq!(form.active, 2);
        let parsed = form.stock_input().parse().unwrap();
        assert_eq!(parsed.name, "Tablet");
        assert_eq!(parsed.quantity, 6);
        assert_eq!(parsed.unit_price, 199.5);
    }

    #[test]
    fn cursor_sits_after_label_and_value() {
        let mut form = EntryForm::new(FormKind::Supplier);
        form.push_char('A');
        form.push_char('b');
        assert_eq!(form.cursor_offset(), "Name: Ab".len());
    }
}
