// Screen layout: panel arrangement and sizing.
//
// Divides the terminal area into fixed zones for the scanner dashboard:
//
// +--------------------------------------------------+
// | Status Bar (1 row)                                |
// +--------------------------------------------------+
// | Tab Bar (1 row)                                   |
// +--------------------------------------------------+
// | Main Panel (fill)                                 |
// |   Documents tab splits: list (60%) | details (40%)|
// +--------------------------------------------------+
// | Notice Bar (1 row)                                |
// +--------------------------------------------------+
// | Help Bar (1 row)                                  |
// +--------------------------------------------------+

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Resolved screen areas for each dashboard zone.
#[derive(Debug, Clone)]
pub struct AppLayout {
    /// Top row: health indicator, auth mode, server address.
    pub status_bar: Rect,
    /// Second row: the Policies / Upload / Documents tab strip.
    pub tab_bar: Rect,
    /// Tab-switched content area.
    pub main_panel: Rect,
    /// One-line transient notice (the toast line).
    pub notice_bar: Rect,
    /// Bottom row: keyboard shortcut hints.
    pub help_bar: Rect,
}

/// Build the dashboard layout from the available terminal area.
pub fn build_layout(area: Rect) -> AppLayout {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // status bar
            Constraint::Length(1), // tab bar
            Constraint::Min(10),   // main panel
            Constraint::Length(1), // notice bar
            Constraint::Length(1), // help bar
        ])
        .split(area);

    AppLayout {
        status_bar: vertical[0],
        tab_bar: vertical[1],
        main_panel: vertical[2],
        notice_bar: vertical[3],
        help_bar: vertical[4],
    }
}

/// Split the main panel for the Documents tab: list on the left, details
/// for the selected document on the right.
pub fn split_documents(main_panel: Rect) -> (Rect, Rect) {
    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(main_panel);
    (horizontal[0], horizontal[1])
}

/// A centered rect taking the given percentage of the area, for modal
/// dialogs.
pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1]);

    horizontal[1]
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
