use anyhow::Error;
use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Produce a rectangle centered within `area` that spans the requested percent
/// of the width and height. Used for modal dialogs.
pub(crate) fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(area);

    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(horizontal[1]);

    vertical[1]
}

/// Message shown to the user for a failed action: the outermost error, which
/// for record operations is already worded for display.
pub(crate) fn surface_error(err: &Error) -> String {
    err.to_string()
}

/// Prices are stored as floating point; two decimals is what the table shows.
pub(crate) fn format_price(price: f64) -> String {
    format!("{price:.2}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::InventoryError;

    #[test]
    fn centered_rect_stays_inside_area() {
        let area = Rect::new(0, 0, 100, 50);
        let popup = centered_rect(60, 40, area);
        assert_eq!(popup.width, 60);
        assert_eq!(popup.height, 20);
        assert_eq!(popup.x, 20);
        assert_eq!(popup.y, 15);
    }

    #[test]
    fn surfaced_error_uses_display_text() {
        let err = Error::from(InventoryError::Validation("Please fill all fields.".into()));
        assert_eq!(surface_error(&err), "Please fill all fields.");
    }

    #[test]
    fn price_has_two_decimals() {
        assert_eq!(format_price(3.0), "3.00");
        assert_eq!(format_price(19.999), "20.00");
    }
}
