// UI rendering - composes the frame from components
//
// Layout, top to bottom: title line, capture summary block, results list
// (optionally split with the logs panel), status bar. The path prompt and
// toast render as overlays on top.

use super::app::App;
use super::components::{logs_panel, results_panel, status_bar};
use crate::config::VERSION;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
    Frame,
};

pub fn draw(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // title
            Constraint::Length(4), // capture summary
            Constraint::Min(3),    // results / logs
            Constraint::Length(1), // status bar
        ])
        .split(f.area());

    draw_title(f, chunks[0]);
    draw_capture_block(f, app, chunks[1]);

    if app.show_logs {
        let panes = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(chunks[2]);
        results_panel::render(f, app, panes[0]);
        logs_panel::render(f, app, panes[1]);
    } else {
        results_panel::render(f, app, chunks[2]);
    }

    status_bar::render(f, app, chunks[3]);

    if let Some(input) = &app.path_input {
        draw_path_prompt(f, input, f.area());
    }

    if let Some(toast) = &app.toast {
        toast.render(f, f.area());
    }
}

fn draw_title(f: &mut Frame, area: Rect) {
    let line = Line::from(vec![
        Span::styled(
            " numlens ",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("v{} · phone numbers from images", VERSION),
            Style::default().fg(Color::DarkGray),
        ),
    ]);
    f.render_widget(Paragraph::new(line), area);
}

/// The capture summary stands in for the browser's image thumbnail
fn draw_capture_block(f: &mut Frame, app: &App, area: Rect) {
    let preview = app
        .preview
        .as_deref()
        .unwrap_or("no image captured · press v for clipboard, o for a file, or paste a path");

    // Advisory (error or "no numbers") takes precedence over the model summary
    let second_line = match (&app.advisory, app.summary.is_empty()) {
        (Some(advisory), _) => Line::from(Span::styled(
            advisory.clone(),
            Style::default().fg(Color::Yellow),
        )),
        (None, false) => Line::from(Span::styled(
            app.summary.clone(),
            Style::default().fg(Color::DarkGray),
        )),
        (None, true) => Line::default(),
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .title(" Image ");

    let text = vec![Line::from(preview.to_string()), second_line];
    f.render_widget(Paragraph::new(text).block(block), area);
}

fn draw_path_prompt(f: &mut Frame, input: &str, area: Rect) {
    let width = 60.min(area.width.saturating_sub(4));
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + area.height / 2;
    let prompt_area = Rect::new(x, y.saturating_sub(1), width, 3);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(Color::Cyan))
        .title(" Image file path ");

    let text = Paragraph::new(format!("{}█", input))
        .alignment(Alignment::Left)
        .block(block);

    f.render_widget(Clear, prompt_area);
    f.render_widget(text, prompt_area);
}
