//! Theme and styling constants for the TUI.

use notiondeck_proto::item::ItemStatus;
use ratatui::style::{Color, Modifier, Style};

/// Primary foreground color.
pub const FG_PRIMARY: Color = Color::White;

/// Secondary foreground color (dimmed text).
pub const FG_SECONDARY: Color = Color::Gray;

/// Highlight color for focused elements.
pub const HIGHLIGHT: Color = Color::Cyan;

/// Success notice color.
pub const SUCCESS: Color = Color::Green;

/// Busy indicator color.
pub const WARNING: Color = Color::Yellow;

/// Error notice color.
pub const ERROR: Color = Color::Red;

/// Panel title color for the item list.
pub const ITEMS_TITLE: Color = Color::Cyan;

/// Panel title color for the create form.
pub const FORM_TITLE: Color = Color::Green;

/// Normal text style.
#[must_use]
pub fn normal() -> Style {
    Style::default().fg(FG_PRIMARY)
}

/// Dimmed text style (timestamps, metadata).
#[must_use]
pub fn dimmed() -> Style {
    Style::default().fg(FG_SECONDARY)
}

/// Bold text style.
#[must_use]
pub fn bold() -> Style {
    Style::default().fg(FG_PRIMARY).add_modifier(Modifier::BOLD)
}

/// Highlighted text style (focused panel borders).
#[must_use]
pub fn highlighted() -> Style {
    Style::default().fg(HIGHLIGHT).add_modifier(Modifier::BOLD)
}

/// Selected item style (in lists).
#[must_use]
pub fn selected() -> Style {
    Style::default()
        .fg(Color::Black)
        .bg(HIGHLIGHT)
        .add_modifier(Modifier::BOLD)
}

/// Style for placeholder text in empty inputs.
#[must_use]
pub fn placeholder() -> Style {
    Style::default()
        .fg(Color::DarkGray)
        .add_modifier(Modifier::ITALIC)
}

/// Style for timestamps and links (dark gray).
#[must_use]
pub fn timestamp() -> Style {
    Style::default().fg(Color::Rgb(120, 120, 120))
}

/// Style for the status bar background (dark background with white foreground).
#[must_use]
pub fn status_bar_bg() -> Style {
    Style::default().fg(Color::White).bg(Color::Rgb(30, 30, 50))
}

/// Style for panel titles with a given color (bold).
#[must_use]
pub fn panel_title(color: Color) -> Style {
    Style::default().fg(color).add_modifier(Modifier::BOLD)
}

/// Color associated with an item status.
#[must_use]
pub const fn status_color(status: &ItemStatus) -> Color {
    match status {
        ItemStatus::NotStarted => Color::Gray,
        ItemStatus::InProgress => Color::Blue,
        ItemStatus::Completed => Color::Green,
        ItemStatus::Other(_) => Color::Magenta,
    }
}

/// Glyph shown before a status label.
#[must_use]
pub const fn status_icon(status: &ItemStatus) -> &'static str {
    match status {
        ItemStatus::NotStarted => "○",
        ItemStatus::InProgress => "◐",
        ItemStatus::Completed => "●",
        ItemStatus::Other(_) => "◇",
    }
}

/// Badge style for a status (black on the status color).
#[must_use]
pub fn status_badge(status: &ItemStatus) -> Style {
    Style::default()
        .fg(Color::Black)
        .bg(status_color(status))
        .add_modifier(Modifier::BOLD)
}
