//! Status bar - current state and key hints

use crate::tui::app::{App, AppStatus};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

const SPINNER_FRAMES: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

pub fn render(f: &mut Frame, app: &App, area: Rect) {
    let (status_color, status_text) = match app.status {
        AppStatus::Idle => (Color::DarkGray, app.status.name().to_string()),
        AppStatus::Loading => (
            Color::Yellow,
            format!(
                "{} {}",
                SPINNER_FRAMES[app.spinner_frame % SPINNER_FRAMES.len()],
                app.status.name()
            ),
        ),
        AppStatus::Success => (Color::Green, app.status.name().to_string()),
        AppStatus::Error => (Color::Red, app.status.name().to_string()),
    };

    let hints = if app.path_input.is_some() {
        "Enter: analyze · Esc: cancel"
    } else if app.results.is_empty() {
        "v: clipboard · o: file · paste a path · l: logs · q: quit"
    } else {
        "↑/↓: select · y: copy · r: reset · v/o: new image · q: quit"
    };

    let line = Line::from(vec![
        Span::styled(
            format!(" {} ", status_text),
            Style::default()
                .fg(status_color)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("│ "),
        Span::styled(hints, Style::default().fg(Color::DarkGray)),
    ]);

    f.render_widget(Paragraph::new(line), area);
}
