//! Terminal UI rendering.

pub mod form_panel;
pub mod item_list;
pub mod status_bar;
pub mod theme;

use std::time::Instant;

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout},
};

use crate::app::App;

/// Main draw function for the entire UI.
///
/// Notices are shown only while still visible at `now`.
pub fn draw(frame: &mut Frame, app: &App, now: Instant) {
    // Create main layout with status bar at bottom
    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(1)])
        .split(frame.area());

    let content_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(62), // Items
            Constraint::Percentage(38), // Form
        ])
        .split(main_chunks[0]);

    item_list::render(frame, content_chunks[0], app);
    form_panel::render(frame, content_chunks[1], app);
    status_bar::render(frame, main_chunks[1], app, now);
}
