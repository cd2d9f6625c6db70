use crate::models::EntitySet;

/// The three tabs of the main window, in display order.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Tab {
    Stock,
    Suppliers,
    Orders,
}

impl Tab {
    pub(crate) const ALL: [Tab; 3] = [Tab::Stock, Tab::Suppliers, Tab::Orders];

    pub(crate) fn title(self) -> &'static str {
        match self {
            Tab::Stock => "Stock Management",
            Tab::Suppliers => "Suppliers",
            Tab::Orders => "Purchase Orders",
        }
    }

    pub(crate) fn index(self) -> usize {
        match self {
            Tab::Stock => 0,
            Tab::Suppliers => 1,
            Tab::Orders => 2,
        }
    }

    pub(crate) fn next(self) -> Self {
        Tab::ALL[(self.index() + 1) % Tab::ALL.len()]
    }

    pub(crate) fn previous(self) -> Self {
        Tab::ALL[(self.index() + Tab::ALL.len() - 1) % Tab::ALL.len()]
    }

    /// Table exported by the `x` shortcut on this tab.
    pub(crate) fn entity_set(self) -> EntitySet {
        match self {
            Tab::Stock => EntitySet::Stock,
            Tab::Suppliers => EntitySet::Suppliers,
            Tab::Orders => EntitySet::PurchaseOrders,
        }
    }
}

/// Rows shown in one tab's results table plus the highlighted row.
pub(crate) struct TableView<T> {
    pub(crate) rows: Vec<T>,
    pub(crate) selected: usize,
}

impl<T> TableView<T> {
    pub(crate) fn new(rows: Vec<T>) -> Self {
        let mut view = Self { rows, selected: 0 };
        view.ensure_in_bounds();
        view
    }

    pub(crate) fn current(&self) -> Option<&T> {
        self.rows.get(self.selected)
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub(crate) fn move_selection(&mut self, offset: isize) {
        if self.rows.is_empty() {
            return;
        }
        let last = self.rows.len() as isize - 1;
        let new = (self.selected as isize + offset).clamp(0, last);
        self.selected = new as usize;
    }

    pub(crate) fn select_first(&mut self) {
        self.selected = 0;
    }

    pub(crate) fn select_last(&mut self) {
        self.selected = self.rows.len().saturating_sub(1);
    }

    /// Replace the rows after a re-query. When `focus` matches a row that row
    /// becomes selected, otherwise the old position is kept and clamped.
    pub(crate) fn set_rows<F>(&mut self, rows: Vec<T>, focus: Option<F>)
    where
        F: Fn(&T) -> bool,
    {
        self.rows = rows;
        if let Some(matches) = focus {
            if let Some(idx) = self.rows.iter().position(matches) {
                self.selected = idx;
                return;
            }
        }
        self.ensure_in_bounds();
    }

    fn ensure_in_bounds(&mut self) {
        if self.rows.is_empty() {
            self.selected = 0;
        } else if self.selected >= self.rows.len() {
            self.selected = self.rows.len() - 1;
        }
    }
}
