//! Logs panel - recent tracing output captured by the TUI layer

use crate::logging::LogLevel;
use crate::tui::app::App;
use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, List, ListItem},
    Frame,
};

fn level_color(level: LogLevel) -> Color {
    match level {
        LogLevel::Error => Color::Red,
        LogLevel::Warn => Color::Yellow,
        LogLevel::Info => Color::Green,
        LogLevel::Debug => Color::Blue,
        LogLevel::Trace => Color::DarkGray,
    }
}

pub fn render(f: &mut Frame, app: &App, area: Rect) {
    let entries = app.log_buffer.entries();
    let visible = area.height.saturating_sub(2) as usize;

    // Most recent entries, oldest first within the window
    let items: Vec<ListItem> = entries
        .iter()
        .rev()
        .take(visible)
        .rev()
        .map(|entry| {
            ListItem::new(Line::from(vec![
                Span::styled(
                    entry.timestamp.format("%H:%M:%S ").to_string(),
                    Style::default().fg(Color::DarkGray),
                ),
                Span::styled(
                    format!("{:5} ", entry.level.as_str()),
                    Style::default().fg(level_color(entry.level)),
                ),
                Span::raw(entry.message.clone()),
            ]))
        })
        .collect();

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .title(" Logs ");

    f.render_widget(List::new(items).block(block), area);
}
