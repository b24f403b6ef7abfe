//! Results panel - the extracted numbers list
//!
//! Shows one row per detected number with its inferred country and, right
//! after a copy action, a transient "copied" marker on that row only.

use crate::tui::app::{App, AppStatus};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, List, ListItem, ListState},
    Frame,
};

pub fn render(f: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .title(format!(" Results ({}) ", app.results.len()));

    if app.results.is_empty() {
        let placeholder = match app.status {
            AppStatus::Loading => "Analyzing image...",
            AppStatus::Success => "No numbers to show",
            AppStatus::Error => "Extraction failed - see message below",
            AppStatus::Idle => "Capture an image to get started",
        };
        let item = ListItem::new(Line::from(Span::styled(
            placeholder,
            Style::default().fg(Color::DarkGray),
        )));
        f.render_widget(List::new([item]).block(block), area);
        return;
    }

    let items: Vec<ListItem> = app
        .results
        .iter()
        .enumerate()
        .map(|(i, row)| {
            let mut spans = vec![
                Span::styled(
                    format!("{:>2}. ", i + 1),
                    Style::default().fg(Color::DarkGray),
                ),
                Span::styled(
                    row.entry.number.clone(),
                    Style::default().add_modifier(Modifier::BOLD),
                ),
                Span::raw("  "),
                Span::styled(
                    row.entry.country.clone(),
                    Style::default().fg(Color::Blue),
                ),
            ];
            if row.is_copied() {
                spans.push(Span::styled(
                    "  ✓ copied",
                    Style::default().fg(Color::Green),
                ));
            }
            ListItem::new(Line::from(spans))
        })
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().bg(Color::DarkGray))
        .highlight_symbol("> ");

    let mut state = ListState::default();
    state.select(Some(app.selected));
    f.render_stateful_widget(list, area, &mut state);
}
