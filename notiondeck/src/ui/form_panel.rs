//! Create-form rendering.

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use super::theme;
use crate::app::{App, PanelFocus};

/// Render the title, description and status inputs plus the submit hint.
pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let outer = Block::default()
        .title(Span::styled(
            "New item",
            theme::panel_title(theme::FORM_TITLE),
        ))
        .borders(Borders::ALL)
        .border_style(if app.focus.in_form() {
            theme::highlighted()
        } else {
            theme::normal()
        });
    let inner = outer.inner(area);
    frame.render_widget(outer, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Min(0),
        ])
        .split(inner);

    let draft = &app.sync.state().draft;
    text_field(
        frame,
        rows[0],
        "Title",
        &draft.title,
        "What needs to be done?",
        app.focus == PanelFocus::Title,
    );
    text_field(
        frame,
        rows[1],
        "Description",
        &draft.description,
        "Add some details...",
        app.focus == PanelFocus::Description,
    );

    let status_focused = app.focus == PanelFocus::Status;
    let status = Paragraph::new(Line::from(vec![
        Span::styled("◀ ", theme::dimmed()),
        Span::styled(
            format!(" {} ", draft.status.label()),
            theme::status_badge(&draft.status),
        ),
        Span::styled(" ▶", theme::dimmed()),
    ]))
    .block(field_block("Status", status_focused));
    frame.render_widget(status, rows[2]);

    let (label, style) = if app.sync.state().is_busy() {
        ("Adding...", theme::dimmed())
    } else if draft.title.trim().is_empty() {
        ("Enter: Add to Notion (title required)", theme::dimmed())
    } else {
        ("Enter: Add to Notion", theme::highlighted())
    };
    frame.render_widget(Paragraph::new(Span::styled(label, style)), rows[3]);
}

fn text_field(
    frame: &mut Frame,
    area: Rect,
    label: &str,
    value: &str,
    placeholder: &str,
    focused: bool,
) {
    let line = if value.is_empty() {
        Line::styled(placeholder.to_string(), theme::placeholder())
    } else if focused {
        Line::from(vec![
            Span::styled(value.to_string(), theme::normal()),
            Span::styled("▏", theme::highlighted()),
        ])
    } else {
        Line::styled(value.to_string(), theme::normal())
    };
    frame.render_widget(Paragraph::new(line).block(field_block(label, focused)), area);
}

fn field_block(label: &str, focused: bool) -> Block<'_> {
    Block::default()
        .title(label)
        .borders(Borders::ALL)
        .border_style(if focused {
            theme::highlighted()
        } else {
            theme::dimmed()
        })
}
