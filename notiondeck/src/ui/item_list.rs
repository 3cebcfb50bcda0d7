//! Item list rendering.

use chrono::Local;
use notiondeck_proto::item::Item;
use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
};

use super::theme;
use crate::app::{App, PanelFocus};

/// Render the item list, or a placeholder when it is empty.
pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let is_focused = app.focus == PanelFocus::List;
    let items = app.sync.state().items();

    let block = Block::default()
        .title(Span::styled(
            format!("Items ({})", items.len()),
            theme::panel_title(theme::ITEMS_TITLE),
        ))
        .borders(Borders::ALL)
        .border_style(if is_focused {
            theme::highlighted()
        } else {
            theme::normal()
        });

    if items.is_empty() {
        let text = if app.sync.state().is_busy() {
            vec![
                Line::styled("Loading your workspace...", theme::bold()),
                Line::styled("Syncing with Notion", theme::dimmed()),
            ]
        } else {
            vec![
                Line::styled("Your workspace awaits", theme::bold()),
                Line::styled("Add an item with the form, or press r to reload.", theme::dimmed()),
            ]
        };
        let paragraph = Paragraph::new(text)
            .block(block)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, area);
        return;
    }

    let rows: Vec<ListItem> = items.iter().map(item_row).collect();
    let list = List::new(rows)
        .block(block)
        .highlight_style(if is_focused {
            theme::selected()
        } else {
            theme::highlighted()
        })
        .highlight_symbol("▌");

    let mut state = ListState::default().with_selected(Some(app.selected));
    frame.render_stateful_widget(list, area, &mut state);
}

/// Three lines per item: title and badge, description, created time and link.
fn item_row(item: &Item) -> ListItem<'_> {
    let badge = format!(
        " {} {} ",
        theme::status_icon(&item.status),
        item.status.label()
    );
    let created = item.created.with_timezone(&Local).format("%Y-%m-%d %H:%M");

    ListItem::new(vec![
        Line::from(vec![
            Span::styled(item.title.as_str(), theme::bold()),
            Span::raw(" "),
            Span::styled(badge, theme::status_badge(&item.status)),
        ]),
        Line::styled(format!("  {}", item.description), theme::dimmed()),
        Line::from(vec![
            Span::styled(format!("  {created}"), theme::timestamp()),
            Span::raw("  "),
            Span::styled(format!("#{}", short_id(&item.id)), theme::timestamp()),
            Span::raw("  "),
            Span::styled(item.url.as_str(), theme::timestamp()),
        ]),
    ])
}

/// Last eight characters of an id.
fn short_id(id: &str) -> &str {
    let start = id
        .char_indices()
        .rev()
        .nth(7)
        .map_or(0, |(i, _)| i);
    &id[start..]
}
