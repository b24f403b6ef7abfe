// TUI module - Terminal User Interface
//
// This module manages the terminal UI using ratatui. It handles:
// - Terminal initialization and cleanup
// - Event loop (keyboard input, paste events, timer ticks)
// - Dispatching extraction attempts and applying their outcomes
//
// The extraction call is the only suspending operation: it runs in a
// spawned task and reports back over an mpsc channel, stamped with the
// attempt's generation number so stale outcomes can be dropped.

pub mod app;
pub mod clipboard;
pub mod components;
pub mod ui;

use crate::capture::CapturedImage;
use crate::config::Config;
use crate::extract::{ExtractError, ExtractionResponse, GeminiExtractor};
use crate::logging::LogBuffer;
use anyhow::{Context, Result};
use app::App;
use crossterm::{
    event::{
        self, DisableBracketedPaste, EnableBracketedPaste, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

/// Outcome of one extraction attempt, tagged with its generation
pub struct ExtractionOutcome {
    pub generation: u64,
    pub result: Result<ExtractionResponse, ExtractError>,
}

/// Run the TUI
///
/// Sets up the terminal, runs the event loop, and restores the terminal
/// when done. Blocks until the user quits.
pub async fn run_tui(config: Config, log_buffer: LogBuffer) -> Result<()> {
    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableBracketedPaste)
        .context("Failed to setup terminal")?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;

    let extractor = Arc::new(GeminiExtractor::from_config(&config)?);
    let mut app = App::new(log_buffer);

    if config.api_key.as_deref().map(str::trim).unwrap_or("").is_empty() {
        tracing::warn!("No API key configured; set GEMINI_API_KEY before capturing");
    }

    let result = run_event_loop(&mut terminal, &mut app, extractor).await;

    disable_raw_mode().context("Failed to disable raw mode")?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableBracketedPaste
    )
    .context("Failed to restore terminal")?;
    terminal.show_cursor().context("Failed to show cursor")?;

    result
}

/// Main event loop
///
/// tokio::select! multiplexes three sources: terminal input, a periodic
/// redraw tick (spinner frames, marker/toast expiry), and completed
/// extraction outcomes.
async fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    extractor: Arc<GeminiExtractor>,
) -> Result<()> {
    let (outcome_tx, mut outcome_rx) = mpsc::channel::<ExtractionOutcome>(8);
    let mut tick_interval = tokio::time::interval(Duration::from_millis(100));

    loop {
        terminal
            .draw(|f| ui::draw(f, app))
            .context("Failed to draw terminal")?;

        tokio::select! {
            // Keyboard input and paste gestures
            _ = async {
                if event::poll(Duration::from_millis(10)).unwrap_or(false) {
                    match event::read() {
                        Ok(Event::Key(key_event)) => {
                            handle_key_event(app, &extractor, &outcome_tx, key_event);
                        }
                        Ok(Event::Paste(text)) => {
                            start_capture(app, &extractor, &outcome_tx, CapturedImage::from_pasted(&text));
                        }
                        _ => {}
                    }
                }
            } => {}

            // Periodic tick: animations, copied-marker and toast expiry
            _ = tick_interval.tick() => {
                app.tick();
            }

            // Extraction outcomes from spawned tasks
            Some(outcome) = outcome_rx.recv() => {
                app.finish_attempt(outcome.generation, outcome.result);
            }
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}

/// Dispatch a capture through the single "image acquired" entry point
///
/// Capture failures (unreadable file, empty clipboard) surface as a toast
/// and leave the state machine untouched. A successful capture starts an
/// attempt unless one is already in flight.
fn start_capture(
    app: &mut App,
    extractor: &Arc<GeminiExtractor>,
    outcome_tx: &mpsc::Sender<ExtractionOutcome>,
    capture: Result<CapturedImage>,
) {
    let image = match capture {
        Ok(image) => image,
        Err(e) => {
            tracing::warn!("Capture failed: {:#}", e);
            app.show_toast(format!("✗ {}", e));
            return;
        }
    };

    let Some(generation) = app.begin_attempt(image.preview_label()) else {
        return; // already loading; capture ignored
    };

    tracing::info!("Starting extraction attempt {} ({})", generation, image.source);
    let extractor = extractor.clone();
    let outcome_tx = outcome_tx.clone();
    tokio::spawn(async move {
        let result = extractor.extract(&image.data_url).await;
        // Receiver gone means the TUI is shutting down
        let _ = outcome_tx
            .send(ExtractionOutcome { generation, result })
            .await;
    });
}

/// Handle keyboard input
///
/// The path prompt captures all input while open; otherwise keys act on
/// the main view.
fn handle_key_event(
    app: &mut App,
    extractor: &Arc<GeminiExtractor>,
    outcome_tx: &mpsc::Sender<ExtractionOutcome>,
    key_event: KeyEvent,
) {
    if key_event.kind != KeyEventKind::Press {
        return;
    }

    // Path prompt layer
    if app.path_input.is_some() {
        handle_prompt_key(app, extractor, outcome_tx, key_event.code);
        return;
    }

    let ctrl = key_event.modifiers.contains(KeyModifiers::CONTROL);

    match key_event.code {
        KeyCode::Char('c') if ctrl => app.should_quit = true,
        KeyCode::Char('q') | KeyCode::Char('Q') => app.should_quit = true,

        // Capture triggers
        KeyCode::Char('v') | KeyCode::Char('V') => {
            start_capture(app, extractor, outcome_tx, clipboard::read_image());
        }
        KeyCode::Char('o') | KeyCode::Char('O') => {
            app.path_input = Some(String::new());
        }

        // Reset
        KeyCode::Char('r') | KeyCode::Char('R') | KeyCode::Esc => app.reset(),

        // Selection
        KeyCode::Down | KeyCode::Char('j') => app.select_next(),
        KeyCode::Up | KeyCode::Char('k') => app.select_prev(),

        // Copy the selected number
        KeyCode::Char('y') | KeyCode::Char('c') | KeyCode::Enter => {
            copy_selected(app);
        }

        // Logs panel
        KeyCode::Char('l') | KeyCode::Char('L') => app.show_logs = !app.show_logs,

        _ => {}
    }
}

/// Handle input while the path prompt is open
fn handle_prompt_key(
    app: &mut App,
    extractor: &Arc<GeminiExtractor>,
    outcome_tx: &mpsc::Sender<ExtractionOutcome>,
    key: KeyCode,
) {
    match key {
        KeyCode::Esc => {
            app.path_input = None;
        }
        KeyCode::Enter => {
            if let Some(path) = app.path_input.take() {
                let path = path.trim().to_string();
                if !path.is_empty() {
                    start_capture(
                        app,
                        extractor,
                        outcome_tx,
                        CapturedImage::from_file(Path::new(&path)),
                    );
                }
            }
        }
        KeyCode::Backspace => {
            if let Some(input) = app.path_input.as_mut() {
                input.pop();
            }
        }
        KeyCode::Char(c) => {
            if let Some(input) = app.path_input.as_mut() {
                input.push(c);
            }
        }
        _ => {}
    }
}

/// Copy the selected number and stamp its transient marker
fn copy_selected(app: &mut App) {
    let Some(number) = app.selected_number().map(str::to_string) else {
        return;
    };

    match clipboard::copy_text(&number) {
        Ok(()) => {
            app.mark_selected_copied();
            app.show_toast(format!("✓ Copied {}", number));
        }
        Err(e) => {
            tracing::warn!("Clipboard copy failed: {:#}", e);
            app.show_toast("✗ Failed to copy");
        }
    }
}
