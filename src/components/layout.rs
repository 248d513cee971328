//! Layout calculations for the UI

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Dashboard screen areas
pub struct DashboardLayout {
    pub title: Rect,
    pub summary: Rect,
    pub filters: Rect,
    pub table: Rect,
    pub status: Rect,
    pub help: Rect,
}

/// Calculate centered popup area
pub fn centered_popup(area: Rect, width: u16, height: u16) -> Rect {
    let popup_x = area.x + (area.width.saturating_sub(width)) / 2;
    let popup_y = area.y + (area.height.saturating_sub(height)) / 2;

    Rect::new(
        popup_x,
        popup_y,
        width.min(area.width),
        height.min(area.height),
    )
}

/// Full-height sheet docked to the right edge
pub fn sheet_rect(area: Rect, percent: u16) -> Rect {
    let width = (area.width as u32 * percent.min(100) as u32 / 100) as u16;
    let width = width.max(40).min(area.width);
    Rect::new(area.x + area.width - width, area.y, width, area.height)
}

/// Calculate the dashboard layout
///
/// Summary cards collapse on short terminals so the table keeps its room.
pub fn calculate_dashboard_layout(area: Rect) -> DashboardLayout {
    let summary_height = if area.height >= 24 { 4 } else { 0 };
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(summary_height),
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(area);

    DashboardLayout {
        title: chunks[0],
        summary: chunks[1],
        filters: chunks[2],
        table: chunks[3],
        status: chunks[4],
        help: chunks[5],
    }
}
