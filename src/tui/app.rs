// TUI application state
//
// This module holds the extraction attempt state machine and the result
// list. Transitions are driven only by capture actions, adapter outcomes,
// and explicit resets; everything flows through this one struct so the
// lifecycle stays auditable.
//
// Stale-response guard: every attempt gets a generation number. An adapter
// outcome is applied only if its generation matches the current one, so a
// response that arrives after a reset (or after a newer attempt started)
// cannot resurrect old results.

use super::components::toast::Toast;
use crate::extract::{ExtractError, ExtractedNumber, ExtractionResponse};
use crate::logging::LogBuffer;
use std::time::{Duration, Instant};

/// How long the per-result "copied" marker stays visible
pub const COPIED_MARKER_TTL: Duration = Duration::from_secs(2);

/// Lifecycle phase of a single extraction attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AppStatus {
    #[default]
    Idle,
    Loading,
    Success,
    Error,
}

impl AppStatus {
    /// Display name for the status bar
    pub fn name(&self) -> &'static str {
        match self {
            AppStatus::Idle => "Idle",
            AppStatus::Loading => "Analyzing",
            AppStatus::Success => "Done",
            AppStatus::Error => "Error",
        }
    }
}

/// One displayed result with its transient copied marker
#[derive(Debug, Clone)]
pub struct ResultRow {
    pub entry: ExtractedNumber,
    copied_at: Option<Instant>,
}

impl ResultRow {
    fn new(entry: ExtractedNumber) -> Self {
        Self {
            entry,
            copied_at: None,
        }
    }

    /// Whether the "just copied" marker is currently set
    pub fn is_copied(&self) -> bool {
        self.copied_at.is_some()
    }
}

/// Main application state for the TUI
pub struct App {
    /// Current lifecycle phase
    pub status: AppStatus,

    /// Extraction results in model output order
    pub results: Vec<ResultRow>,

    /// Index of the selected result row
    pub selected: usize,

    /// Capture summary shown where a browser would show a thumbnail
    pub preview: Option<String>,

    /// Advisory or error text below the results
    pub advisory: Option<String>,

    /// Model-provided summary of the last successful extraction
    pub summary: String,

    /// Whether the app should quit
    pub should_quit: bool,

    /// Whether the logs panel is visible
    pub show_logs: bool,

    /// Path prompt contents while the user is typing one (None = closed)
    pub path_input: Option<String>,

    /// Log buffer for the logs panel
    pub log_buffer: LogBuffer,

    /// Transient notification overlay
    pub toast: Option<Toast>,

    /// Animation frame for the loading spinner
    pub spinner_frame: usize,

    /// Generation of the current attempt; bumped on capture and reset
    generation: u64,
}

impl App {
    pub fn new(log_buffer: LogBuffer) -> Self {
        Self {
            status: AppStatus::default(),
            results: Vec::new(),
            selected: 0,
            preview: None,
            advisory: None,
            summary: String::new(),
            should_quit: false,
            show_logs: false,
            path_input: None,
            log_buffer,
            toast: None,
            spinner_frame: 0,
            generation: 0,
        }
    }

    /// Start a new extraction attempt
    ///
    /// Returns the attempt's generation number, or None when an attempt is
    /// already in flight (captures while loading are ignored).
    pub fn begin_attempt(&mut self, preview: String) -> Option<u64> {
        if self.status == AppStatus::Loading {
            tracing::debug!("Capture ignored: extraction already in flight");
            return None;
        }

        self.generation += 1;
        self.status = AppStatus::Loading;
        self.results.clear();
        self.selected = 0;
        self.advisory = None;
        self.summary.clear();
        self.preview = Some(preview);
        Some(self.generation)
    }

    /// Apply an adapter outcome, dropping it if stale
    pub fn finish_attempt(
        &mut self,
        generation: u64,
        outcome: Result<ExtractionResponse, ExtractError>,
    ) {
        if generation != self.generation || self.status != AppStatus::Loading {
            tracing::debug!(
                "Dropping stale extraction outcome (generation {} vs {})",
                generation,
                self.generation
            );
            return;
        }

        match outcome {
            Ok(response) => {
                self.status = AppStatus::Success;
                self.summary = response.summary;
                self.results = response.numbers.into_iter().map(ResultRow::new).collect();
                self.selected = 0;
                if self.results.is_empty() {
                    // Zero detections is informational, not a failure
                    self.advisory = Some("No phone numbers detected in this image".to_string());
                }
                tracing::info!("Extraction finished: {} number(s)", self.results.len());
            }
            Err(err) => {
                self.status = AppStatus::Error;
                self.advisory = Some(err.to_string());
                tracing::warn!("Extraction failed: {}", err);
            }
        }
    }

    /// Discard everything and return to idle
    ///
    /// Bumping the generation here is what invalidates an in-flight call;
    /// the request itself is not aborted, its result is just dropped.
    pub fn reset(&mut self) {
        self.generation += 1;
        self.status = AppStatus::Idle;
        self.results.clear();
        self.selected = 0;
        self.preview = None;
        self.advisory = None;
        self.summary.clear();
    }

    /// Move selection down
    pub fn select_next(&mut self) {
        if !self.results.is_empty() {
            self.selected = (self.selected + 1).min(self.results.len() - 1);
        }
    }

    /// Move selection up
    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    /// The number string of the selected row, if any
    pub fn selected_number(&self) -> Option<&str> {
        self.results
            .get(self.selected)
            .map(|row| row.entry.number.as_str())
    }

    /// Stamp the copied marker on the selected row only
    pub fn mark_selected_copied(&mut self) {
        self.mark_selected_copied_at(Instant::now());
    }

    fn mark_selected_copied_at(&mut self, now: Instant) {
        if let Some(row) = self.results.get_mut(self.selected) {
            row.copied_at = Some(now);
        }
    }

    /// Clear copied markers older than the fixed delay; called on tick
    pub fn clear_expired_markers(&mut self) {
        self.clear_expired_markers_at(Instant::now());
    }

    fn clear_expired_markers_at(&mut self, now: Instant) {
        for row in &mut self.results {
            if let Some(at) = row.copied_at {
                if now.saturating_duration_since(at) >= COPIED_MARKER_TTL {
                    row.copied_at = None;
                }
            }
        }
    }

    /// Show a transient notification
    pub fn show_toast(&mut self, message: impl Into<String>) {
        self.toast = Some(Toast::new(message));
    }

    /// Advance animations and expire transient state; called on tick
    pub fn tick(&mut self) {
        self.spinner_frame = self.spinner_frame.wrapping_add(1);
        self.clear_expired_markers();
        if self.toast.as_ref().is_some_and(|t| t.is_expired()) {
            self.toast = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app() -> App {
        App::new(LogBuffer::new())
    }

    fn response(numbers: &[(&str, &str)]) -> ExtractionResponse {
        ExtractionResponse {
            numbers: numbers
                .iter()
                .map(|(number, country)| ExtractedNumber {
                    number: number.to_string(),
                    country: country.to_string(),
                })
                .collect(),
            summary: String::new(),
        }
    }

    #[test]
    fn test_capture_moves_to_loading() {
        let mut app = app();
        let generation = app.begin_attempt("clipboard · image/png · 1.0 KB".to_string());
        assert!(generation.is_some());
        assert_eq!(app.status, AppStatus::Loading);
        assert!(app.preview.is_some());
    }

    #[test]
    fn test_capture_ignored_while_loading() {
        let mut app = app();
        let first = app.begin_attempt("first".to_string()).unwrap();
        assert!(app.begin_attempt("second".to_string()).is_none());
        // The in-flight attempt is untouched
        assert_eq!(app.preview.as_deref(), Some("first"));

        app.finish_attempt(first, Ok(response(&[("+1 555-0100", "USA")])));
        assert_eq!(app.status, AppStatus::Success);
    }

    #[test]
    fn test_success_with_results() {
        let mut app = app();
        let generation = app.begin_attempt("file a.png".to_string()).unwrap();
        app.finish_attempt(generation, Ok(response(&[("+1 555-0100", "USA")])));

        assert_eq!(app.status, AppStatus::Success);
        assert_eq!(app.results.len(), 1);
        assert_eq!(app.results[0].entry.country, "USA");
        assert!(app.advisory.is_none());
    }

    #[test]
    fn test_empty_result_is_success_with_advisory() {
        let mut app = app();
        let generation = app.begin_attempt("file a.png".to_string()).unwrap();
        app.finish_attempt(generation, Ok(response(&[])));

        assert_eq!(app.status, AppStatus::Success);
        assert!(app.results.is_empty());
        assert!(app
            .advisory
            .as_deref()
            .is_some_and(|msg| msg.contains("No phone numbers")));
    }

    #[test]
    fn test_failure_moves_to_error() {
        let mut app = app();
        let generation = app.begin_attempt("file a.png".to_string()).unwrap();
        app.finish_attempt(generation, Err(ExtractError::SetupRequired));

        assert_eq!(app.status, AppStatus::Error);
        assert!(app
            .advisory
            .as_deref()
            .is_some_and(|msg| msg.contains("GEMINI_API_KEY")));
    }

    #[test]
    fn test_reset_discards_everything() {
        let mut app = app();
        let generation = app.begin_attempt("file a.png".to_string()).unwrap();
        app.finish_attempt(generation, Ok(response(&[("+1 555-0100", "USA")])));

        app.reset();
        assert_eq!(app.status, AppStatus::Idle);
        assert!(app.results.is_empty());
        assert!(app.preview.is_none());
        assert!(app.advisory.is_none());
    }

    #[test]
    fn test_stale_outcome_after_reset_is_dropped() {
        let mut app = app();
        let stale = app.begin_attempt("file a.png".to_string()).unwrap();
        app.reset();

        app.finish_attempt(stale, Ok(response(&[("+1 555-0100", "USA")])));
        // The late response must not resurrect results
        assert_eq!(app.status, AppStatus::Idle);
        assert!(app.results.is_empty());
    }

    #[test]
    fn test_stale_outcome_after_newer_attempt_is_dropped() {
        let mut app = app();
        let stale = app.begin_attempt("first".to_string()).unwrap();
        app.reset();
        let current = app.begin_attempt("second".to_string()).unwrap();

        app.finish_attempt(stale, Ok(response(&[("+1 111", "USA")])));
        assert_eq!(app.status, AppStatus::Loading);

        app.finish_attempt(current, Ok(response(&[("+1 222", "USA")])));
        assert_eq!(app.status, AppStatus::Success);
        assert_eq!(app.results[0].entry.number, "+1 222");
    }

    #[test]
    fn test_copied_marker_is_per_row_and_expires() {
        let mut app = app();
        let generation = app.begin_attempt("file a.png".to_string()).unwrap();
        app.finish_attempt(
            generation,
            Ok(response(&[("+1 555-0100", "USA"), ("+1 555-0101", "USA")])),
        );

        let t0 = Instant::now();
        app.selected = 1;
        app.mark_selected_copied_at(t0);
        assert!(!app.results[0].is_copied());
        assert!(app.results[1].is_copied());

        // Before the delay the marker stays
        app.clear_expired_markers_at(t0 + COPIED_MARKER_TTL / 2);
        assert!(app.results[1].is_copied());

        // After the delay it clears, without touching the other row
        app.clear_expired_markers_at(t0 + COPIED_MARKER_TTL);
        assert!(!app.results[1].is_copied());
        assert!(!app.results[0].is_copied());
        // Copy state never affects the extraction state machine
        assert_eq!(app.status, AppStatus::Success);
    }

    #[test]
    fn test_selection_bounds() {
        let mut app = app();
        let generation = app.begin_attempt("file a.png".to_string()).unwrap();
        app.finish_attempt(
            generation,
            Ok(response(&[("+1 111", "USA"), ("+1 222", "USA")])),
        );

        app.select_prev();
        assert_eq!(app.selected, 0);
        app.select_next();
        app.select_next();
        assert_eq!(app.selected, 1);
        assert_eq!(app.selected_number(), Some("+1 222"));
    }
}
