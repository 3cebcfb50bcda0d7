//! Status bar rendering.

use std::time::Instant;

use ratatui::{
    Frame,
    layout::Rect,
    text::{Line, Span},
    widgets::Paragraph,
};

use super::theme;
use crate::app::{App, PanelFocus};
use crate::sync::NoticeKind;

/// Render the status bar at the bottom of the screen.
pub fn render(frame: &mut Frame, area: Rect, app: &App, now: Instant) {
    let help_text = match app.focus {
        PanelFocus::Title | PanelFocus::Description => {
            "Enter: add | Tab: next field | F5: reload | F2: check backend | Esc: quit"
        }
        PanelFocus::Status => "←→: change status | Enter: add | Tab: next field | Esc: quit",
        PanelFocus::List => {
            "↑↓/jk: navigate | d: archive | r: reload | p: check backend | Tab: form | Esc: quit"
        }
    };

    let mut spans = vec![Span::styled("NotionDeck", theme::bold()), Span::raw(" | ")];

    if app.sync.state().is_busy() {
        spans.push(Span::styled("⟳ Working...", theme::normal().fg(theme::WARNING)));
        spans.push(Span::raw(" | "));
    }

    if let Some(text) = app.sync.notice(NoticeKind::Error, now) {
        spans.push(Span::styled(format!("✗ {text}"), theme::normal().fg(theme::ERROR)));
        spans.push(Span::raw(" | "));
    }
    if let Some(text) = app.sync.notice(NoticeKind::Success, now) {
        spans.push(Span::styled(format!("✓ {text}"), theme::normal().fg(theme::SUCCESS)));
        spans.push(Span::raw(" | "));
    }

    spans.push(Span::styled(help_text, theme::dimmed()));

    let paragraph = Paragraph::new(Line::from(spans)).style(theme::status_bar_bg());
    frame.render_widget(paragraph, area);
}
