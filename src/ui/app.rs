//! Main TUI application state and logic

use crate::validate::{validate, ValidationReport};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout},
    Frame, Terminal,
};
use std::fs;
use std::io;
use std::path::PathBuf;
use std::time::Duration;

/// Lines moved by PageUp/PageDown
const PAGE_SIZE: usize = 10;

/// Which pane is currently focused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusedPane {
    Source,
    Report,
}

impl FocusedPane {
    /// Move focus to the other pane
    pub fn next(self) -> Self {
        match self {
            FocusedPane::Source => FocusedPane::Report,
            FocusedPane::Report => FocusedPane::Source,
        }
    }
}

/// The main application state
pub struct App {
    /// File the source was read from
    pub source_path: PathBuf,

    /// The source code being validated
    pub source_code: String,

    /// Report of the latest validation run
    pub report: ValidationReport,

    /// Currently focused pane
    pub focused_pane: FocusedPane,

    /// Per-pane scroll offsets
    pub source_scroll: usize,
    pub report_scroll: usize,

    /// Whether the app should quit
    pub should_quit: bool,

    /// Status message to display
    pub status_message: String,
}

impl App {
    /// Create a new app showing `source_code` and its validation report
    pub fn new(source_path: PathBuf, source_code: String, report: ValidationReport) -> Self {
        let status_message = report.summary();
        App {
            source_path,
            source_code,
            report,
            focused_pane: FocusedPane::Source,
            source_scroll: 0,
            report_scroll: 0,
            should_quit: false,
            status_message,
        }
    }

    /// Run the TUI application
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        loop {
            terminal.draw(|f| self.render(f))?;

            if self.should_quit {
                break;
            }

            if event::poll(Duration::from_millis(250))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key_event(key);
                    }
                }
            }
        }

        Ok(())
    }

    /// Render the UI
    fn render(&mut self, frame: &mut Frame) {
        let size = frame.area();

        // Panes on top, status bar at the bottom
        let main_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(1)])
            .split(size);

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(main_chunks[0]);

        let title = self.source_path.display().to_string();
        super::panes::render_source_pane(
            frame,
            columns[0],
            &title,
            &self.source_code,
            &self.report.flagged_lines(),
            self.focused_pane == FocusedPane::Source,
            &mut self.source_scroll,
        );

        super::panes::render_report_pane(
            frame,
            columns[1],
            &self.report,
            self.focused_pane == FocusedPane::Report,
            &mut self.report_scroll,
        );

        super::panes::render_status_bar(frame, main_chunks[1], &self.status_message, &self.report);
    }

    /// Handle keyboard events
    pub fn handle_key_event(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') => {
                self.should_quit = true;
            }
            KeyCode::Tab | KeyCode::BackTab => {
                self.focused_pane = self.focused_pane.next();
            }
            KeyCode::Up => self.scroll_up(1),
            KeyCode::Down => self.scroll_down(1),
            KeyCode::PageUp => self.scroll_up(PAGE_SIZE),
            KeyCode::PageDown => self.scroll_down(PAGE_SIZE),
            KeyCode::Char('v') => {
                self.revalidate();
            }
            KeyCode::Char('r') => {
                self.reload();
            }
            _ => {}
        }
    }

    fn focused_scroll(&mut self) -> &mut usize {
        match self.focused_pane {
            FocusedPane::Source => &mut self.source_scroll,
            FocusedPane::Report => &mut self.report_scroll,
        }
    }

    fn scroll_up(&mut self, lines: usize) {
        let scroll = self.focused_scroll();
        *scroll = scroll.saturating_sub(lines);
    }

    // Upper bound is applied while rendering, once the pane height is known
    fn scroll_down(&mut self, lines: usize) {
        let scroll = self.focused_scroll();
        *scroll = scroll.saturating_add(lines);
    }

    /// Validate the current buffer again
    fn revalidate(&mut self) {
        self.report = validate(&self.source_code);
        self.report_scroll = 0;
        self.status_message = self.report.summary();
    }

    /// Re-read the file from disk, then validate it
    fn reload(&mut self) {
        match fs::read_to_string(&self.source_path) {
            Ok(source) => {
                self.source_code = source;
                self.revalidate();
                self.status_message = format!("Reloaded. {}", self.report.summary());
            }
            Err(e) => {
                self.status_message = format!(
                    "Cannot reload {}: {}",
                    self.source_path.display(),
                    e
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn app_for(source: &str) -> App {
        App::new(
            PathBuf::from("does-not-exist.cpp"),
            source.to_string(),
            validate(source),
        )
    }

    fn press(app: &mut App, code: KeyCode) {
        app.handle_key_event(KeyEvent::new(code, KeyModifiers::NONE));
    }

    #[test]
    fn test_quit_and_focus() {
        let mut app = app_for("int a = 1;");
        assert_eq!(app.status_message, "Validation completed successfully");

        press(&mut app, KeyCode::Tab);
        assert_eq!(app.focused_pane, FocusedPane::Report);
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.focused_pane, FocusedPane::Source);

        press(&mut app, KeyCode::Char('q'));
        assert!(app.should_quit);
    }

    #[test]
    fn test_scrolling_targets_focused_pane() {
        let mut app = app_for("int a = 1;");

        press(&mut app, KeyCode::PageDown);
        press(&mut app, KeyCode::Up);
        assert_eq!(app.source_scroll, PAGE_SIZE - 1);
        assert_eq!(app.report_scroll, 0);

        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Up);
        assert_eq!(app.report_scroll, 0);
    }

    #[test]
    fn test_revalidate_uses_buffer() {
        let mut app = app_for("int a = 1;");
        app.source_code = "int a; int a;".to_string();

        press(&mut app, KeyCode::Char('v'));

        assert!(!app.report.succeeded);
        assert_eq!(app.status_message, "Validation failed at semantic analysis");
    }

    #[test]
    fn test_reload_missing_file_keeps_report() {
        let mut app = app_for("int a = 1;");

        press(&mut app, KeyCode::Char('r'));

        assert!(app.report.succeeded);
        assert!(app.status_message.starts_with("Cannot reload does-not-exist.cpp"));
    }
}
